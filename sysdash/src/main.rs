//! Entry point for the sysdash TUI. Parses args, resolves a profile and runs the App.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use sysdash::config::{
    load_profiles, parse_base_url, save_profiles, DashboardConfig, ProfileEntry, ProfileRequest,
    ProfilesFile, ResolveProfile,
};
use sysdash::views::metrics::LabelZone;
use sysdash::{app, logging};

const USAGE: &str =
    "[--profile NAME|-P NAME] [--save] [--tls-ca CERT_PEM|-t CERT_PEM] [--utc] [--dry-run] [http://HOST:PORT]";

#[derive(Debug, Default)]
struct ParsedArgs {
    url: Option<String>,
    tls_ca: Option<String>,
    profile: Option<String>,
    save: bool,
    utc: bool,
    dry_run: bool,
}

enum ArgsError {
    Help(String),
    Invalid(String),
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, ArgsError> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "sysdash".into());
    let mut parsed = ParsedArgs::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(ArgsError::Help(format!("Usage: {prog} {USAGE}"))),
            "--tls-ca" | "-t" => parsed.tls_ca = it.next(),
            "--profile" | "-P" => parsed.profile = it.next(),
            "--save" => parsed.save = true,
            "--utc" => parsed.utc = true,
            "--dry-run" => parsed.dry_run = true,
            _ if arg.starts_with("--tls-ca=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        parsed.tls_ca = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--profile=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        parsed.profile = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with('-') => {
                return Err(ArgsError::Invalid(format!(
                    "Unknown option {arg}. Usage: {prog} {USAGE}"
                )))
            }
            _ => {
                if parsed.url.is_none() {
                    parsed.url = Some(arg);
                } else {
                    return Err(ArgsError::Invalid(format!(
                        "Unexpected argument. Usage: {prog} {USAGE}"
                    )));
                }
            }
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(ArgsError::Help(msg)) => {
            println!("{msg}");
            return Ok(ExitCode::SUCCESS);
        }
        Err(ArgsError::Invalid(msg)) => {
            eprintln!("{msg}");
            return Ok(ExitCode::from(2));
        }
    };

    let Some((url, tls_ca)) = resolve_connection(&parsed)? else {
        return Ok(ExitCode::SUCCESS);
    };
    let base_url = parse_base_url(&url).with_context(|| format!("invalid backend url {url:?}"))?;

    if parsed.dry_run {
        println!("backend: {base_url}");
        return Ok(ExitCode::SUCCESS);
    }

    match logging::init() {
        Ok(path) => eprintln!("logging to {}", path.display()),
        Err(e) => eprintln!("logging disabled: {e:#}"),
    }

    let mut config = DashboardConfig::new(base_url);
    config.tls_ca = tls_ca.map(PathBuf::from);
    if parsed.utc {
        config.label_zone = LabelZone::Utc;
    }
    app::run(config).await?;
    Ok(ExitCode::SUCCESS)
}

/// Works out (url, tls_ca) from args and saved profiles, persisting new or
/// changed profiles. `None` means the user aborted or there was nothing to use.
fn resolve_connection(parsed: &ParsedArgs) -> anyhow::Result<Option<(String, Option<String>)>> {
    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        tls_ca: parsed.tls_ca.clone(),
    };

    let mut profiles_mut = profiles_file.clone();
    let resolved = match req.resolve(&profiles_file) {
        ResolveProfile::Direct(u, t) => {
            if let Some(name) = parsed.profile.as_ref() {
                let entry = ProfileEntry {
                    url: u.clone(),
                    tls_ca: t.clone(),
                };
                match profiles_mut.profiles.get(name) {
                    None => store(&mut profiles_mut, name, entry)?,
                    Some(existing) if *existing != entry => {
                        let overwrite = parsed.save
                            || prompt_yes_no(&format!("Overwrite existing profile '{name}'? [y/N]: "));
                        if overwrite {
                            store(&mut profiles_mut, name, entry)?;
                        }
                    }
                    Some(_) => {}
                }
            }
            (u, t)
        }
        ResolveProfile::Loaded(u, t) => (u, t),
        ResolveProfile::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let picked = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| names.get(idx))
                .and_then(|name| profiles_mut.profiles.get(name));
            match picked {
                Some(entry) => (entry.url.clone(), entry.tls_ca.clone()),
                None => return Ok(None),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter backend URL (http://HOST:PORT): ")?;
            let url = url.trim().to_string();
            if url.is_empty() {
                return Ok(None);
            }
            let ca = prompt_string("Enter TLS CA path (or leave blank): ")?;
            let ca = Some(ca.trim().to_string()).filter(|s| !s.is_empty());
            store(
                &mut profiles_mut,
                &name,
                ProfileEntry {
                    url: url.clone(),
                    tls_ca: ca.clone(),
                },
            )?;
            (url, ca)
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            return Ok(None);
        }
    };
    Ok(Some(resolved))
}

fn store(pf: &mut ProfilesFile, name: &str, entry: ProfileEntry) -> anyhow::Result<()> {
    pf.profiles.insert(name.to_string(), entry);
    save_profiles(pf).context("saving profiles")
}

fn prompt_yes_no(prompt: &str) -> bool {
    match prompt_string(prompt) {
        Ok(line) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<ParsedArgs, ArgsError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn long_short_and_equals_forms() {
        let p = args(&["sysdash", "-P", "lab", "-t", "/ca.pem", "--utc", "http://h:1"]).ok().unwrap();
        assert_eq!(p.profile.as_deref(), Some("lab"));
        assert_eq!(p.tls_ca.as_deref(), Some("/ca.pem"));
        assert_eq!(p.url.as_deref(), Some("http://h:1"));
        assert!(p.utc && !p.save && !p.dry_run);

        let p = args(&["sysdash", "--profile=prod", "--tls-ca=/x.pem", "--save", "--dry-run"]).ok().unwrap();
        assert_eq!(p.profile.as_deref(), Some("prod"));
        assert_eq!(p.tls_ca.as_deref(), Some("/x.pem"));
        assert!(p.save && p.dry_run);
    }

    #[test]
    fn help_and_errors() {
        assert!(matches!(args(&["sysdash", "-P", "x", "--help"]), Err(ArgsError::Help(_))));
        assert!(matches!(args(&["sysdash", "a", "b"]), Err(ArgsError::Invalid(_))));
        assert!(matches!(args(&["sysdash", "--bogus"]), Err(ArgsError::Invalid(_))));
    }
}
