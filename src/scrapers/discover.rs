//! Card discovery on the listing page.
//!
//! The portal groups its headline column inside a container such as
//! `#column-jornalismo`. Each story in it is a `.wrapper.theme-jornalismo`
//! block whose `a.post__link` points at the article; the lead story carries
//! an extra `first` class.
//!
//! ```html
//! <div id="column-jornalismo">
//!   <div class="wrapper theme-jornalismo first">
//!     <a class="post__link" href="https://g1.globo.com/.../materia.ghtml" title="Manchete">
//!       <h2 class="post__title">Manchete</h2>
//!     </a>
//!   </div>
//!   ...
//! </div>
//! ```

use super::extract::{extract, DomNode, Strategy};
use crate::browser::Navigator;
use crate::error::{NavError, ScrapeError};
use crate::models::Card;
use crate::utils::is_article_link;
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Classes every listing entry carries.
pub const ENTRY_CLASSES: &str = ".wrapper.theme-jornalismo";
/// Class token marking the lead story.
pub const FEATURED_CLASS: &str = "first";
pub const ANCHOR_SELECTOR: &str = "a.post__link";
/// Heading used when the anchor has no `title` attribute.
pub const TITLE_FALLBACK: &[Strategy] = &[Strategy::text("h2.post__title")];

/// Discover the cards listed inside `#column_id` on the current page.
///
/// `limit` caps the number of listing entries considered; it is applied
/// before link filtering and deduplication, so fewer than `limit` cards may
/// come back. `None` or `Some(0)` means no cap.
///
/// # Errors
///
/// [`ScrapeError::DiscoveryTimeout`] if the container or its entries do not
/// appear within `timeout`, [`ScrapeError::InvalidSelector`] if `column_id`
/// cannot be used in a CSS selector.
#[instrument(level = "info", skip(navigator))]
pub fn discover<N: Navigator + ?Sized>(
    navigator: &mut N,
    column_id: &str,
    limit: Option<usize>,
    timeout: Duration,
) -> Result<Vec<Card>, ScrapeError> {
    let container = format!("#{column_id}");
    let entries = format!("{container} {ENTRY_CLASSES}");
    let entry_selector =
        Selector::parse(&entries).map_err(|_| ScrapeError::InvalidSelector(entries.clone()))?;

    navigator
        .wait_for(&container, timeout)
        .map_err(discovery_timeout)?;
    navigator
        .wait_for(&entries, timeout)
        .map_err(discovery_timeout)?;

    let html = navigator
        .html()
        .map_err(|source| ScrapeError::ListingUnavailable {
            url: navigator.current_url(),
            source,
        })?;
    let base = Url::parse(&navigator.current_url()).ok();
    let document = Html::parse_document(&html);

    let found = document.select(&entry_selector).count();
    let cap = match limit {
        Some(n) if n > 0 => n,
        _ => usize::MAX,
    };

    let cards: Vec<Card> = document
        .select(&entry_selector)
        .take(cap)
        .filter_map(|entry| card_from_entry(entry, base.as_ref()))
        .unique_by(Card::dedup_key)
        .collect();

    info!(found, count = cards.len(), "Discovered cards");
    Ok(cards)
}

/// Build a card from one listing entry, or `None` if the entry does not link
/// to an article.
fn card_from_entry(entry: ElementRef<'_>, base: Option<&Url>) -> Option<Card> {
    let featured = entry
        .value()
        .attr("class")
        .unwrap_or_default()
        .split_whitespace()
        .any(|token| token == FEATURED_CLASS);

    let Some(anchor) = entry.find(ANCHOR_SELECTOR) else {
        debug!("Entry without post link; skipping");
        return None;
    };

    let href = resolve_href(anchor.attr("href").unwrap_or_default().trim(), base);
    if !is_article_link(&href) {
        debug!(%href, "Not an article link; skipping");
        return None;
    }

    let mut title = anchor.attr("title").unwrap_or_default().trim().to_string();
    if title.is_empty() {
        title = extract(&entry, TITLE_FALLBACK);
    }

    Some(Card::new(title, href, featured))
}

/// Resolve `href` against the page URL the way a browser reports an
/// anchor's `href` property.
fn resolve_href(href: &str, base: Option<&Url>) -> String {
    if href.is_empty() {
        return String::new();
    }
    match base.map(|b| b.join(href)) {
        Some(Ok(absolute)) => absolute.to_string(),
        _ => href.to_string(),
    }
}

fn discovery_timeout(err: NavError) -> ScrapeError {
    match err {
        NavError::Timeout { what, after } => ScrapeError::DiscoveryTimeout { what, after },
        other => ScrapeError::DiscoveryTimeout {
            what: other.to_string(),
            after: Duration::ZERO,
        },
    }
}
