//! In-memory surface for tests.
//!
//! Serves canned HTML per URL, fails navigation for configured URLs and
//! records every visit so tests can assert on ordering.

use super::Navigator;
use crate::error::NavError;
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct FixtureNavigator {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    current: Option<String>,
    pub visits: Vec<String>,
    pub waits: Vec<String>,
}

impl FixtureNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    fn body(&self) -> Option<&String> {
        self.current.as_ref().and_then(|url| self.pages.get(url))
    }
}

impl Navigator for FixtureNavigator {
    fn goto(&mut self, url: &str, _timeout: Duration) -> Result<(), NavError> {
        self.visits.push(url.to_string());
        self.current = None;
        if self.failing.contains(url) {
            return Err(NavError::Navigation(format!(
                "unknown error: net::ERR_CONNECTION_RESET loading {url}"
            )));
        }
        if !self.pages.contains_key(url) {
            return Err(NavError::Navigation(format!("404 Not Found: {url}")));
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), NavError> {
        self.waits.push(selector.to_string());
        let found = match (self.body(), Selector::parse(selector)) {
            (Some(body), Ok(sel)) => Html::parse_document(body).select(&sel).next().is_some(),
            _ => false,
        };
        if found {
            Ok(())
        } else {
            Err(NavError::Timeout {
                what: selector.to_string(),
                after: timeout,
            })
        }
    }

    fn html(&mut self) -> Result<String, NavError> {
        self.body()
            .cloned()
            .ok_or_else(|| NavError::Snapshot("no page loaded".to_string()))
    }

    fn current_url(&self) -> String {
        self.current.clone().unwrap_or_default()
    }
}
