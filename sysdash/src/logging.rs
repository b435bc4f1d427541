//! tracing setup. The terminal belongs to the UI, so logs go to a file.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::config_dir;

const DEFAULT_FILTER: &str = "sysdash=info";

pub fn log_path() -> PathBuf {
    std::env::var_os("SYSDASH_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir().join("sysdash.log"))
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env("SYSDASH_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init() -> anyhow::Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(path)
}
