//! Command-line interface definitions for globo_cards.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Flags override values from the optional YAML config file; see
//! [`crate::config`] for the full precedence order.

use crate::config::{timeout_from_secs, Engine, FetchOptions, Settings};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for globo_cards.
///
/// # Examples
///
/// ```sh
/// # Print the headline cards of the portal home page
/// globo_cards fetch
///
/// # First five entries of another column, using plain HTTP instead of Chrome
/// globo_cards fetch --column-id column-esporte --limit 5 --engine http
///
/// # Serve GET /noticias on port 5000
/// globo_cards serve --bind 0.0.0.0:5000
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true, env = "GLOBO_CARDS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Browser executable to launch instead of the auto-detected one
    #[arg(long, global = true, env = "CHROME_PATH")]
    pub browser_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch cards once and print them as JSON
    Fetch(FetchArgs),
    /// Serve the HTTP endpoint
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct FetchArgs {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Also write the JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Defaults for requests that leave parameters out
    #[command(flatten)]
    pub overrides: Overrides,
}

/// Per-fetch overrides shared by both subcommands.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Listing page to load
    #[arg(long)]
    pub url: Option<String>,

    /// Id of the container holding the listing entries
    #[arg(long)]
    pub column_id: Option<String>,

    /// Consider only the first N listing entries
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Seconds to wait for pages and elements
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Run the browser without a visible window (`--headless false` to show it)
    #[arg(long, action = ArgAction::Set)]
    pub headless: Option<bool>,

    /// Browser surface to drive
    #[arg(long, value_enum)]
    pub engine: Option<Engine>,
}

impl Cli {
    /// Apply global flags on top of file settings.
    pub fn apply_globals(&self, settings: &mut Settings) {
        if let Some(path) = &self.browser_path {
            settings.browser_path = Some(path.clone());
        }
    }
}

impl Overrides {
    /// Resolve the options for a fetch: settings first, then these flags.
    pub fn resolve(&self, settings: &Settings) -> FetchOptions {
        let mut options = settings.fetch_options();
        if let Some(url) = &self.url {
            options.url = url.clone();
        }
        if let Some(column_id) = &self.column_id {
            options.column_id = column_id.clone();
        }
        options.limit = self.limit.filter(|n| *n > 0);
        if let Some(secs) = self.timeout {
            options.timeout = timeout_from_secs(secs);
        }
        if let Some(headless) = self.headless {
            options.headless = headless;
        }
        if let Some(engine) = self.engine {
            options.engine = engine;
        }
        options
    }
}
