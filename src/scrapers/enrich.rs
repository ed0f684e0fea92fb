//! Detail-page enrichment.
//!
//! Every discovered card is visited in order. The subtitle and publication
//! date are read through fallback chains so a card still gets whatever the
//! page exposes when the preferred markup is missing. A card whose page
//! cannot be loaded gets an `error` marker instead; the remaining cards are
//! processed regardless.

use super::dates::normalize_date;
use super::extract::{extract, extract_with, Strategy};
use crate::browser::Navigator;
use crate::models::Card;
use crate::utils::{truncate_chars, truncate_for_log, ERROR_MAX_CHARS};
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Heading that carries the subtitle on article pages.
pub const SUBTITLE_HEADING: &str = "h2.content-head__subtitle";

/// Tried in order when [`SUBTITLE_HEADING`] never shows up.
pub const SUBTITLE_FALLBACKS: &[Strategy] = &[
    Strategy::attr("meta[property='og:description']", "content"),
    Strategy::text(".content-head__subtitle"),
    Strategy::attr("meta[name='description']", "content"),
];

const PUBLISHED_TIME: &str = "time[itemprop='datePublished']";

/// Readings of the structured `<time>` element, most precise first.
pub const PUBLISHED_TIME_READS: &[Strategy] = &[
    Strategy::attr(PUBLISHED_TIME, "datetime"),
    Strategy::attr(PUBLISHED_TIME, "content"),
    Strategy::text(PUBLISHED_TIME),
];

/// Meta tags tried when the `<time>` element is missing or unparsable.
pub const PUBLISHED_META_FALLBACKS: &[Strategy] = &[
    Strategy::attr("meta[itemprop='datePublished']", "content"),
    Strategy::attr("meta[property='article:published_time']", "content"),
    Strategy::attr("meta[name='article:published_time']", "content"),
];

/// Bounds for the waits performed on each detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Page readiness.
    pub page: Duration,
    /// Appearance of [`SUBTITLE_HEADING`]; kept short so a page without it
    /// moves on to the fallbacks quickly.
    pub subtitle: Duration,
}

/// Fill `subtitle` and `created_at` for every card, in order.
///
/// Never fails as a whole: a card whose page cannot be loaded keeps empty
/// fields and carries the failure (truncated to 180 characters) in `error`.
#[instrument(level = "info", skip_all, fields(count = cards.len()))]
pub fn enrich<N: Navigator + ?Sized>(cards: &mut [Card], navigator: &mut N, timeouts: Timeouts) {
    let mut failed = 0usize;

    for (index, card) in cards.iter_mut().enumerate() {
        if let Err(e) = navigator.goto(&card.href, timeouts.page) {
            failed += 1;
            let message = e.to_string();
            warn!(index, href = %card.href, error = %truncate_for_log(&message, 300), "Detail page failed");
            card.subtitle.clear();
            card.created_at.clear();
            card.error = Some(truncate_chars(&message, ERROR_MAX_CHARS));
            continue;
        }

        card.subtitle = read_subtitle(navigator, timeouts.subtitle);
        card.created_at = read_created_at(navigator);
        debug!(
            index,
            href = %card.href,
            subtitle = !card.subtitle.is_empty(),
            created_at = %card.created_at,
            "Enriched card"
        );
    }

    info!(enriched = cards.len() - failed, failed, "Enrichment complete");
}

fn snapshot<N: Navigator + ?Sized>(navigator: &mut N) -> Option<Html> {
    match navigator.html() {
        Ok(html) => Some(Html::parse_document(&html)),
        Err(e) => {
            warn!(error = %e, "Could not read detail page");
            None
        }
    }
}

/// Subtitle from the dedicated heading when it appears in time, otherwise
/// from [`SUBTITLE_FALLBACKS`].
fn read_subtitle<N: Navigator + ?Sized>(navigator: &mut N, wait: Duration) -> String {
    let heading_present = navigator.wait_for(SUBTITLE_HEADING, wait).is_ok();
    let Some(document) = snapshot(navigator) else {
        return String::new();
    };
    let root = document.root_element();

    if heading_present {
        // The heading wins even when empty.
        extract(&root, &[Strategy::text(SUBTITLE_HEADING)])
    } else {
        extract(&root, SUBTITLE_FALLBACKS)
    }
}

/// Canonical publication date, or empty when the page exposes none.
fn read_created_at<N: Navigator + ?Sized>(navigator: &mut N) -> String {
    let Some(document) = snapshot(navigator) else {
        return String::new();
    };
    let root = document.root_element();

    let structured = normalize_date(&extract(&root, PUBLISHED_TIME_READS));
    if !structured.is_empty() {
        return structured;
    }
    extract_with(&root, PUBLISHED_META_FALLBACKS, normalize_date)
}
