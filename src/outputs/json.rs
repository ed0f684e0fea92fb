//! JSON output for fetched cards.
//!
//! The same rendering backs the CLI's stdout, the optional `--output` file
//! and the HTTP endpoint body: a pretty-printed array with two-space
//! indentation and non-ASCII characters left unescaped.
//!
//! # Output Shape
//!
//! ```json
//! [
//!   {
//!     "title": "Câmara aprova projeto",
//!     "href": "https://g1.globo.com/politica/noticia/2024/05/01/a.ghtml",
//!     "featured": true,
//!     "subtitle": "Texto segue para o Senado",
//!     "createdAt": "2024/05/01"
//!   }
//! ]
//! ```
//!
//! A failed fetch renders as `{"error": "..."}` instead.

use crate::models::{Card, ErrorBody};
use std::error::Error;
use std::fmt::Display;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Render cards as a pretty-printed JSON array.
pub fn render_cards(cards: &[Card]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(cards)
}

/// Render a top-level failure as `{"error": "..."}`.
pub fn render_error(err: &impl Display) -> String {
    let body = ErrorBody::new(err);
    serde_json::to_string_pretty(&body)
        .unwrap_or_else(|_| format!("{{\"error\": {:?}}}", body.error))
}

/// Write rendered JSON to `path`, creating parent directories as needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_json(json: &str, path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!(bytes = json.len(), "Wrote JSON output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Card {
        let mut card = Card::new(
            "Câmara aprova reforma",
            "https://g1.globo.com/politica/a.ghtml",
            true,
        );
        card.subtitle = "Votação termina às 23h".to_string();
        card.created_at = "2024/05/01".to_string();
        card
    }

    #[test]
    fn test_render_keeps_non_ascii() {
        let json = render_cards(&[card()]).unwrap();
        assert!(json.contains("Câmara aprova reforma"));
        assert!(json.contains("Votação"));
        assert!(!json.contains("\\u00e2"));
    }

    #[test]
    fn test_render_is_pretty_array() {
        let json = render_cards(&[card()]).unwrap();
        assert!(json.starts_with("[\n  {"));
        assert!(json.contains(r#""createdAt": "2024/05/01""#));
        assert!(!json.contains("\"error\""));

        let parsed: Vec<Card> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![card()]);
    }

    #[test]
    fn test_render_empty_list() {
        assert_eq!(render_cards(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_render_error() {
        let json = render_error(&"timed out after 20s waiting for #column-jornalismo");
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            v["error"],
            "timed out after 20s waiting for #column-jornalismo"
        );
    }

    #[tokio::test]
    async fn test_write_json_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/cards.json");

        write_json("[]", &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
