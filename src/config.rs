//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! the `CHROME_PATH` environment variable and CLI flags (applied in
//! [`crate::cli`]), and finally per-request query parameters when serving
//! over HTTP (applied in [`crate::api`]).
//!
//! # Example file
//!
//! ```yaml
//! url: https://www.globo.com/
//! column_id: column-jornalismo
//! timeout_secs: 30
//! headless: true
//! engine: chrome
//! bind: 127.0.0.1:5000
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

pub const DEFAULT_URL: &str = "https://www.globo.com/";
pub const DEFAULT_COLUMN_ID: &str = "column-jornalismo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_SUBTITLE_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_USER_AGENT: &str = concat!("globo_cards/", env!("CARGO_PKG_VERSION"));
/// Upper bound for any timeout taken from a file, flag or query parameter.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Convert a user-supplied number of seconds to a timeout, clamped to
/// [`MAX_TIMEOUT_SECS`].
pub fn timeout_from_secs(secs: u64) -> Duration {
    Duration::from_secs(secs.min(MAX_TIMEOUT_SECS))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Which browser surface drives the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Headless Chrome over the DevTools protocol. Runs page scripts.
    #[default]
    Chrome,
    /// Plain HTTP fetch of the server-rendered markup. No scripts.
    Http,
}

/// Process-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub url: String,
    pub column_id: String,
    pub timeout_secs: u64,
    pub subtitle_timeout_secs: u64,
    pub headless: bool,
    pub engine: Engine,
    pub browser_path: Option<PathBuf>,
    pub bind: String,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            column_id: DEFAULT_COLUMN_ID.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            subtitle_timeout_secs: DEFAULT_SUBTITLE_TIMEOUT_SECS,
            headless: true,
            engine: Engine::default(),
            browser_path: None,
            bind: DEFAULT_BIND.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file. Keys missing from the file keep their
    /// defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration");
        Ok(settings)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to a mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Load from `path` when given, otherwise return the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Resolve the options for a single fetch from these settings.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            url: self.url.clone(),
            column_id: self.column_id.clone(),
            limit: None,
            timeout: timeout_from_secs(self.timeout_secs),
            subtitle_timeout: timeout_from_secs(self.subtitle_timeout_secs),
            headless: self.headless,
            engine: self.engine,
            browser_path: self.browser_path.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Fully resolved options for one invocation of
/// [`fetch_articles`](crate::scrapers::fetch_articles).
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    /// Listing page to load.
    pub url: String,
    /// Id of the container that scopes discovery.
    pub column_id: String,
    /// Cap on listing entries, applied before filtering. `None` or `0`
    /// means no cap.
    pub limit: Option<usize>,
    /// Bound for every presence and readiness wait.
    pub timeout: Duration,
    /// Bound for the subtitle heading wait on detail pages.
    pub subtitle_timeout: Duration,
    pub headless: bool,
    pub engine: Engine,
    pub browser_path: Option<PathBuf>,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Settings::default().fetch_options()
    }
}
