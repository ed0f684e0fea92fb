//! # globo_cards
//!
//! Extracts the headline cards of a news portal listing page and enriches
//! each one with the subtitle and publication date found on its article
//! page. Results are returned as a JSON array, either once from the command
//! line or on demand over HTTP.
//!
//! ## Usage
//!
//! ```sh
//! globo_cards fetch --limit 10 > cards.json
//! globo_cards serve --bind 0.0.0.0:5000
//! curl 'http://localhost:5000/noticias?limit=5'
//! ```
//!
//! ## Architecture
//!
//! A fetch is strictly sequential on one browser surface:
//! 1. **Discovery**: load the listing page and collect article cards
//! 2. **Enrichment**: visit each article page for subtitle and date
//! 3. **Output**: render the cards (or the failure) as JSON
//!
//! The surface (headless Chrome by default) is started per fetch and shut
//! down when the fetch returns, whatever the outcome.

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod browser;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod scrapers;
mod utils;

use api::{AppState, BrowserSource};
use cli::{Cli, Command, FetchArgs, ServeArgs};
use config::Settings;
use outputs::json;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr so stdout stays pure JSON.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply_globals(&mut settings);

    match args.command {
        Command::Fetch(fetch) => run_fetch(&settings, fetch).await,
        Command::Serve(serve) => run_serve(&settings, serve).await,
    }
}

/// Fetch once and print the result.
///
/// Exit status is non-zero when the fetch as a whole failed; per-card
/// failures are reported inside the JSON and still exit successfully.
#[instrument(level = "info", skip_all)]
async fn run_fetch(settings: &Settings, args: FetchArgs) -> Result<ExitCode, Box<dyn Error>> {
    let start_time = std::time::Instant::now();
    let options = args.overrides.resolve(settings);
    info!(url = %options.url, column_id = %options.column_id, engine = ?options.engine, "Fetching cards");

    let result = tokio::task::spawn_blocking(move || scrapers::fetch_articles(&options)).await?;

    let (rendered, status) = match result {
        Ok(cards) => (json::render_cards(&cards)?, ExitCode::SUCCESS),
        Err(e) => {
            error!(error = %e, "Fetch failed");
            (json::render_error(&e), ExitCode::FAILURE)
        }
    };

    println!("{rendered}");
    if let Some(path) = &args.output {
        json::write_json(&rendered, path).await?;
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(status)
}

/// Serve `GET /noticias` until the process is stopped.
#[instrument(level = "info", skip_all)]
async fn run_serve(settings: &Settings, args: ServeArgs) -> Result<ExitCode, Box<dyn Error>> {
    let bind = args.bind.clone().unwrap_or_else(|| settings.bind.clone());
    let defaults = args.overrides.resolve(settings);
    let router = api::create_router(AppState::new(defaults, BrowserSource));

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(addr = %listener.local_addr()?, "Serving /noticias");
    axum::serve(listener, router).await?;
    Ok(ExitCode::SUCCESS)
}
