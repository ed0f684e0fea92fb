//! Browser surfaces the pipeline drives.
//!
//! A surface is anything that can load a page, wait for it to settle and
//! hand back its current DOM. The extraction code never talks to a browser
//! directly; it goes through [`Navigator`] and parses snapshots with
//! `scraper`.
//!
//! | Engine | Module | Scripts | Notes |
//! |--------|--------|---------|-------|
//! | Chrome | [`chrome`] | yes | Headless Chrome over CDP |
//! | HTTP | [`http`] | no | Server-rendered markup only |
//!
//! Surfaces are owned values. Dropping one releases it, so the browser
//! process never outlives the fetch that started it.

pub mod chrome;
#[cfg(test)]
pub mod fixture;
pub mod http;

use crate::config::{Engine, FetchOptions};
use crate::error::{NavError, ScrapeError};
use std::time::{Duration, Instant};

/// Interval between checks of a polled condition.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A controllable page-rendering session.
pub trait Navigator {
    /// Load `url` and block until the document reports ready, or until
    /// `timeout` elapses.
    fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), NavError>;

    /// Block until an element matching `selector` is present in the current
    /// page, or until `timeout` elapses.
    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), NavError>;

    /// Serialized HTML of the current DOM.
    fn html(&mut self) -> Result<String, NavError>;

    /// URL of the current page after redirects.
    fn current_url(&self) -> String;
}

impl<N: Navigator + ?Sized> Navigator for Box<N> {
    fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), NavError> {
        (**self).goto(url, timeout)
    }

    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), NavError> {
        (**self).wait_for(selector, timeout)
    }

    fn html(&mut self) -> Result<String, NavError> {
        (**self).html()
    }

    fn current_url(&self) -> String {
        (**self).current_url()
    }
}

/// Poll `condition` every `interval` until it returns `Ok(true)` or
/// `timeout` elapses.
///
/// Errors from `condition` are treated as "not yet" so that transient
/// failures during page transitions do not end the wait early. The
/// condition is always evaluated at least once.
pub fn wait_until<F>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    mut condition: F,
) -> Result<(), NavError>
where
    F: FnMut() -> Result<bool, NavError>,
{
    let started = Instant::now();
    loop {
        if let Ok(true) = condition() {
            return Ok(());
        }
        let elapsed = started.elapsed();
        if elapsed >= timeout {
            return Err(NavError::Timeout {
                what: what.to_string(),
                after: timeout,
            });
        }
        std::thread::sleep(interval.min(timeout - elapsed));
    }
}

/// Start the surface selected by `options.engine`.
pub fn acquire(options: &FetchOptions) -> Result<Box<dyn Navigator>, ScrapeError> {
    Ok(match options.engine {
        Engine::Chrome => Box::new(chrome::ChromeNavigator::launch(options)?),
        Engine::Http => Box::new(http::HttpNavigator::new(options)?),
    })
}
