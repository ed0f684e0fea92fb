//! Data models for discovered article cards and the top-level error body.
//!
//! This module defines the records that leave the pipeline:
//! - [`Card`]: one article summary discovered on the listing page and
//!   enriched from its detail page
//! - [`ErrorBody`]: the object returned instead of a card list when the
//!   whole operation fails
//!
//! Field names are serialized in camelCase to match the JSON consumed by the
//! portal front-end (`createdAt`).

use serde::{Deserialize, Serialize};

/// A single article card.
///
/// Cards are created fully allocated during discovery with `title`, `href`
/// and `featured` populated. Enrichment later fills `subtitle` and
/// `created_at`, or records a truncated failure description in `error`.
///
/// # JSON
///
/// ```json
/// {
///   "title": "Título da matéria",
///   "href": "https://g1.globo.com/politica/noticia/2024/05/01/materia.ghtml",
///   "featured": true,
///   "subtitle": "Linha fina",
///   "createdAt": "2024/05/01"
/// }
/// ```
///
/// `error` is omitted from the output unless enrichment failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Headline as read from the listing entry (may be empty).
    pub title: String,
    /// Absolute article URL.
    pub href: String,
    /// Whether the listing entry carried the `first` (lead story) marker.
    pub featured: bool,
    /// Subtitle recovered from the detail page.
    #[serde(default)]
    pub subtitle: String,
    /// Publication date as `YYYY/MM/DD`, or empty.
    #[serde(default)]
    pub created_at: String,
    /// Failure description when the detail page could not be loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Card {
    /// Build a freshly discovered card with empty enrichment fields.
    pub fn new(title: impl Into<String>, href: impl Into<String>, featured: bool) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            featured,
            subtitle: String::new(),
            created_at: String::new(),
            error: None,
        }
    }

    /// The `(href, title)` pair used to suppress duplicate listing entries.
    pub fn dedup_key(&self) -> (String, String) {
        (self.href.clone(), self.title.clone())
    }
}

/// Body returned when the whole fetch fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
