//! The card extraction pipeline.
//!
//! A fetch runs in two sequential phases against a single browser surface:
//!
//! 1. **Discovery** ([`discover`]): load the listing page, wait for the
//!    headline container and collect one [`Card`] per article entry
//! 2. **Enrichment** ([`enrich`]): visit each card's article page and read
//!    its subtitle and publication date
//!
//! # Submodules
//!
//! | Module | Role |
//! |--------|------|
//! | [`extract`] | Ordered fallback strategies over a DOM node |
//! | [`discover`] | Listing entries → cards |
//! | [`enrich`] | Detail pages → subtitle and date |
//! | [`dates`] | Raw date text → `YYYY/MM/DD` |
//!
//! Only a missing surface, an unreachable listing page or a listing that
//! never renders its entries fails the fetch. Everything past discovery is
//! best effort and recorded per card.

pub mod dates;
pub mod discover;
pub mod enrich;
pub mod extract;

use crate::browser::{self, Navigator};
use crate::config::FetchOptions;
use crate::error::ScrapeError;
use crate::models::Card;
use enrich::Timeouts;
use std::time::Instant;
use tracing::{error, info, instrument};

/// Run a complete fetch on a freshly acquired surface.
///
/// The surface lives only for the duration of this call and is released on
/// every return path, including errors.
#[instrument(level = "info", skip_all, fields(url = %options.url, engine = ?options.engine))]
pub fn fetch_articles(options: &FetchOptions) -> Result<Vec<Card>, ScrapeError> {
    fetch_with(options, browser::acquire)
}

/// Like [`fetch_articles`], with the surface obtained from `acquire`.
pub fn fetch_with<N, F>(options: &FetchOptions, acquire: F) -> Result<Vec<Card>, ScrapeError>
where
    N: Navigator,
    F: FnOnce(&FetchOptions) -> Result<N, ScrapeError>,
{
    let started = Instant::now();
    let mut navigator = acquire(options).inspect_err(|e| {
        error!(error = %e, "Could not acquire browser surface");
    })?;

    let result = run(&mut navigator, options);
    drop(navigator);

    match &result {
        Ok(cards) => info!(
            count = cards.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetch complete"
        ),
        Err(e) => error!(error = %e, "Fetch failed"),
    }
    result
}

/// Load the listing page, discover its cards and enrich them using a
/// caller-supplied surface.
pub fn run<N: Navigator + ?Sized>(
    navigator: &mut N,
    options: &FetchOptions,
) -> Result<Vec<Card>, ScrapeError> {
    navigator
        .goto(&options.url, options.timeout)
        .map_err(|source| ScrapeError::ListingUnavailable {
            url: options.url.clone(),
            source,
        })?;

    let mut cards = discover::discover(
        navigator,
        &options.column_id,
        options.limit,
        options.timeout,
    )?;

    enrich::enrich(
        &mut cards,
        navigator,
        Timeouts {
            page: options.timeout,
            subtitle: options.subtitle_timeout,
        },
    );
    Ok(cards)
}
