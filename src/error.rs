//! Error types for the browser surface and the fetch operation.
//!
//! Only [`ScrapeError`] ever reaches a caller. Per-card navigation failures
//! are recorded on the card itself and missing fields are absorbed by the
//! field extractor, so neither has a variant here.

use std::time::Duration;
use thiserror::Error;

/// Failures reported by a [`Navigator`](crate::browser::Navigator).
#[derive(Debug, Error)]
pub enum NavError {
    /// A bounded wait elapsed before its condition held.
    #[error("timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    /// The surface could not load the requested page.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// The current DOM could not be read back.
    #[error("failed to read page content: {0}")]
    Snapshot(String),
}

/// Failures that abort a whole fetch.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("could not start browser surface: {0}")]
    SurfaceAcquisition(String),

    #[error("listing page {url} unavailable: {source}")]
    ListingUnavailable {
        url: String,
        #[source]
        source: NavError,
    },

    #[error("timed out after {after:?} waiting for {what}")]
    DiscoveryTimeout { what: String, after: Duration },

    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    #[error("fetch task failed: {0}")]
    Task(String),
}
