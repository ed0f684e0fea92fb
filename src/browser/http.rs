//! Static HTTP surface.
//!
//! Fetches pages with a blocking `reqwest` client and answers presence checks
//! against the downloaded markup. No scripts run, so this only sees what the
//! server renders; the portal's listing and article pages are
//! server-rendered, which makes this a lightweight alternative to Chrome.
//!
//! Because the markup never changes after download, [`HttpNavigator::wait_for`]
//! answers immediately instead of polling.

use super::Navigator;
use crate::config::FetchOptions;
use crate::error::{NavError, ScrapeError};
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug)]
struct Page {
    url: String,
    body: String,
}

#[derive(Debug)]
pub struct HttpNavigator {
    client: Client,
    page: Option<Page>,
}

impl HttpNavigator {
    pub fn new(options: &FetchOptions) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.timeout)
            .build()
            .map_err(|e| ScrapeError::SurfaceAcquisition(e.to_string()))?;
        Ok(Self { client, page: None })
    }

    #[cfg(test)]
    pub(crate) fn with_page(url: &str, body: &str) -> Self {
        Self {
            client: Client::new(),
            page: Some(Page {
                url: url.to_string(),
                body: body.to_string(),
            }),
        }
    }

    fn current(&self) -> Result<&Page, NavError> {
        self.page
            .as_ref()
            .ok_or_else(|| NavError::Snapshot("no page loaded".to_string()))
    }
}

impl Navigator for HttpNavigator {
    #[instrument(level = "debug", skip(self))]
    fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), NavError> {
        self.page = None;
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| NavError::Navigation(e.to_string()))?;
        let final_url = response.url().to_string();
        let body = response
            .text()
            .map_err(|e| NavError::Navigation(e.to_string()))?;

        debug!(bytes = body.len(), %final_url, "Fetched page");
        self.page = Some(Page {
            url: final_url,
            body,
        });
        Ok(())
    }

    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), NavError> {
        let timed_out = || NavError::Timeout {
            what: selector.to_string(),
            after: timeout,
        };
        let page = self.current().map_err(|_| timed_out())?;
        let parsed = Selector::parse(selector).map_err(|_| timed_out())?;
        let document = Html::parse_document(&page.body);
        if document.select(&parsed).next().is_some() {
            Ok(())
        } else {
            Err(timed_out())
        }
    }

    fn html(&mut self) -> Result<String, NavError> {
        Ok(self.current()?.body.clone())
    }

    fn current_url(&self) -> String {
        self.page.as_ref().map(|p| p.url.clone()).unwrap_or_default()
    }
}
