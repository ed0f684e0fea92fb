//! Output rendering for fetched cards.
//!
//! # Submodules
//!
//! - [`json`]: Renders cards (or the top-level error) as the JSON returned
//!   by both the CLI and the HTTP endpoint, and optionally writes it to disk

pub mod json;
