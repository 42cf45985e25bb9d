//! Configuration loading from `.env` files.

use std::{env, path::PathBuf};

use anyhow::{Context, Result};

/// Runtime settings derived from environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    /// SQLite database URL, e.g. `sqlite://marquee.db`.
    pub database_url: String,
    /// HTTP bind address, e.g. `127.0.0.1:7780`.
    pub bind_http: String,
    /// Directory holding file-backed identity records.
    pub identity_root: PathBuf,
}

impl Settings {
    /// Load settings from the specified `.env` file.
    pub fn from_env(path: &str) -> Result<Self> {
        dotenvy::from_filename(path).context("reading env file")?;
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL")?;
        let bind_http = env::var("BIND_HTTP").context("BIND_HTTP")?;
        let identity_root = PathBuf::from(env::var("IDENTITY_ROOT").context("IDENTITY_ROOT")?);
        Ok(Self {
            database_url,
            bind_http,
            identity_root,
        })
    }
}

/// Environment variables read by [`Settings::from_env`]. Tests clear these
/// under [`ENV_MUTEX`] because dotenvy never overrides variables already set
/// in the process environment.
#[cfg(test)]
pub(crate) const ENV_VARS: [&str; 3] = ["DATABASE_URL", "BIND_HTTP", "IDENTITY_ROOT"];

#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
