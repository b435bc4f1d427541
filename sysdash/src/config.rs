//! Connection profiles and runtime settings.
//!
//! Profiles are a simple JSON mapping of profile name -> { url, tls_ca },
//! stored under $XDG_CONFIG_HOME/sysdash/profiles.json (fallback: the
//! platform config dir).

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io, path::PathBuf, time::Duration};
use tracing::warn;

use crate::views::metrics::LabelZone;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileEntry {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_ca: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub version: u32,
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("sysdash")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sysdash")
    }
}

pub fn profiles_path() -> PathBuf {
    config_dir().join("profiles.json")
}

/// Missing or unreadable profile files load as empty.
pub fn load_profiles() -> ProfilesFile {
    let path = profiles_path();
    match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring malformed profiles file");
            ProfilesFile::default()
        }),
        Err(_) => ProfilesFile::default(),
    }
}

pub fn save_profiles(p: &ProfilesFile) -> io::Result<()> {
    let path = profiles_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(p).map_err(io::Error::other)?;
    fs::write(path, data)
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResolveProfile {
    /// Use the provided runtime inputs (not persisted). (url, tls_ca)
    Direct(String, Option<String>),
    /// Loaded from existing profile entry (url, tls_ca)
    Loaded(String, Option<String>),
    /// Should prompt user to select among profile names
    PromptSelect(Vec<String>),
    /// Should prompt user to create a new profile (name)
    PromptCreate(String),
    /// Nothing given and nothing saved
    None,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
    pub tls_ca: Option<String>,
}

impl ProfileRequest {
    pub fn resolve(self, pf: &ProfilesFile) -> ResolveProfile {
        match (self.profile_name, self.url) {
            (_, Some(url)) => ResolveProfile::Direct(url, self.tls_ca),
            (Some(name), None) => match pf.profiles.get(&name) {
                Some(entry) => ResolveProfile::Loaded(entry.url.clone(), entry.tls_ca.clone()),
                None => ResolveProfile::PromptCreate(name),
            },
            (None, None) if pf.profiles.is_empty() => ResolveProfile::None,
            (None, None) => ResolveProfile::PromptSelect(pf.profiles.keys().cloned().collect()),
        }
    }
}

/// Backend base url; a bare `host:port` means plain http.
pub fn parse_base_url(s: &str) -> Result<url::Url, url::ParseError> {
    let s = s.trim();
    if s.contains("://") {
        url::Url::parse(s)
    } else {
        url::Url::parse(&format!("http://{s}"))
    }
}

/// How many items each view asks the backend for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub metrics: usize,
    pub logs: usize,
    pub snapshots: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            metrics: 30,
            logs: 15,
            snapshots: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub base_url: url::Url,
    pub tls_ca: Option<PathBuf>,
    pub limits: Limits,
    pub request_timeout: Duration,
    pub reconnect_delay: Duration,
    pub auto_reconnect: bool,
    /// Consecutive failed push connects before giving up; 0 = never.
    pub max_reconnect_attempts: u32,
    pub label_zone: LabelZone,
}

impl DashboardConfig {
    pub fn new(base_url: url::Url) -> Self {
        Self {
            base_url,
            tls_ca: None,
            limits: Limits::default(),
            request_timeout: Duration::from_secs(10),
            reconnect_delay: Duration::from_secs(2),
            auto_reconnect: true,
            max_reconnect_attempts: 0,
            label_zone: LabelZone::Local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved() -> ProfilesFile {
        let mut pf = ProfilesFile::default();
        pf.profiles.insert(
            "lab".into(),
            ProfileEntry {
                url: "http://lab:5000".into(),
                tls_ca: Some("/etc/ca.pem".into()),
            },
        );
        pf
    }

    fn req(name: Option<&str>, url: Option<&str>) -> ProfileRequest {
        ProfileRequest {
            profile_name: name.map(str::to_owned),
            url: url.map(str::to_owned),
            tls_ca: None,
        }
    }

    #[test]
    fn resolution_rules() {
        let pf = saved();
        assert_eq!(
            req(Some("lab"), None).resolve(&pf),
            ResolveProfile::Loaded("http://lab:5000".into(), Some("/etc/ca.pem".into()))
        );
        assert_eq!(
            req(Some("new"), None).resolve(&pf),
            ResolveProfile::PromptCreate("new".into())
        );
        assert_eq!(
            req(Some("lab"), Some("http://x")).resolve(&pf),
            ResolveProfile::Direct("http://x".into(), None)
        );
        assert_eq!(
            req(None, None).resolve(&pf),
            ResolveProfile::PromptSelect(vec!["lab".into()])
        );
        assert_eq!(req(None, None).resolve(&ProfilesFile::default()), ResolveProfile::None);
    }

    #[test]
    fn bare_host_defaults_to_http() {
        assert_eq!(
            parse_base_url("mon.lan:5000").unwrap().as_str(),
            "http://mon.lan:5000/"
        );
        assert_eq!(
            parse_base_url(" https://mon.lan/dash ").unwrap().as_str(),
            "https://mon.lan/dash"
        );
        assert!(parse_base_url("http://").is_err());
    }

    #[test]
    fn default_limits_match_endpoints() {
        let l = Limits::default();
        assert_eq!((l.metrics, l.logs, l.snapshots), (30, 15, 1));
    }
}
