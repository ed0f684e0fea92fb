//! Headless Chrome surface.
//!
//! Launches a private Chrome/Chromium process through `headless_chrome` and
//! drives a single tab over the DevTools protocol. The process is terminated
//! when the [`ChromeNavigator`] is dropped.
//!
//! # Executable lookup
//!
//! 1. `browser_path` from the options (`--browser-path`, `CHROME_PATH` or the
//!    config file), if it points at an existing file
//! 2. The platform's usual install locations

use super::{wait_until, Navigator, POLL_INTERVAL};
use crate::config::FetchOptions;
use crate::error::{NavError, ScrapeError};
use headless_chrome::browser::default_executable;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Headroom on top of the operation timeout before an idle browser
/// connection is considered dead.
const IDLE_HEADROOM: Duration = Duration::from_secs(60);

pub struct ChromeNavigator {
    // Declared before `_browser` so the tab is released first.
    tab: Arc<Tab>,
    _browser: Browser,
}

impl ChromeNavigator {
    /// Launch a browser process and open the tab used for the whole fetch.
    #[instrument(level = "info", skip_all, fields(headless = options.headless))]
    pub fn launch(options: &FetchOptions) -> Result<Self, ScrapeError> {
        let executable = resolve_executable(options.browser_path.as_deref())?;
        info!(path = %executable.display(), "Launching Chrome");

        let launch = LaunchOptions::default_builder()
            .headless(options.headless)
            .sandbox(false)
            .path(Some(executable))
            .args(vec![OsStr::new("--disable-dev-shm-usage")])
            .idle_browser_timeout(idle_timeout(options.timeout))
            .build()
            .map_err(|e| ScrapeError::SurfaceAcquisition(e.to_string()))?;

        let browser =
            Browser::new(launch).map_err(|e| ScrapeError::SurfaceAcquisition(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::SurfaceAcquisition(e.to_string()))?;
        tab.set_default_timeout(options.timeout);

        debug!("Chrome tab ready");
        Ok(Self {
            tab,
            _browser: browser,
        })
    }

    fn ready_state(&self) -> Result<bool, NavError> {
        let state = self
            .tab
            .evaluate("document.readyState", false)
            .map_err(|e| NavError::Snapshot(e.to_string()))?;
        Ok(state.value.as_ref().and_then(|v| v.as_str()) == Some("complete"))
    }
}

impl std::fmt::Debug for ChromeNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromeNavigator")
            .field("url", &self.tab.get_url())
            .finish()
    }
}

impl Navigator for ChromeNavigator {
    fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), NavError> {
        self.tab.set_default_timeout(timeout);
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| NavError::Navigation(e.to_string()))?;
        wait_until("document.readyState == complete", timeout, POLL_INTERVAL, || {
            self.ready_state()
        })
    }

    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), NavError> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map(|_| ())
            .map_err(|_| NavError::Timeout {
                what: selector.to_string(),
                after: timeout,
            })
    }

    fn html(&mut self) -> Result<String, NavError> {
        self.tab
            .get_content()
            .map_err(|e| NavError::Snapshot(e.to_string()))
    }

    fn current_url(&self) -> String {
        self.tab.get_url()
    }
}

/// How long the browser connection may stay idle before it is dropped.
fn idle_timeout(timeout: Duration) -> Duration {
    timeout.saturating_add(IDLE_HEADROOM)
}

/// Pick the browser executable, preferring an explicit override.
///
/// An override that does not exist is ignored with a warning rather than
/// failing outright; only a complete absence of a usable executable is an
/// error.
pub fn resolve_executable(override_path: Option<&Path>) -> Result<PathBuf, ScrapeError> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        warn!(path = %path.display(), "Browser override not found; falling back to auto-detection");
    }
    default_executable().map_err(|e| {
        ScrapeError::SurfaceAcquisition(format!(
            "no Chrome/Chromium executable found ({e}); install one or set CHROME_PATH"
        ))
    })
}
