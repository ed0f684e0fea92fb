//! HTTP endpoint for on-demand fetches.
//!
//! # Routes
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET | `/health` | `200 ok` |
//! | GET | `/noticias` | `200` JSON card array, or `500 {"error": ...}` |
//!
//! `/noticias` accepts `url`, `column_id` (or `columnId`), `limit`,
//! `timeout` and `headless` query parameters. Values that do not parse fall
//! back to the server defaults instead of rejecting the request. CORS is
//! fully permissive so the portal front-end can call it from any origin.
//!
//! Each request acquires its own browser surface and runs the pipeline on
//! the blocking thread pool.

use crate::config::{timeout_from_secs, FetchOptions};
use crate::error::ScrapeError;
use crate::models::{Card, ErrorBody};
use crate::outputs::json::render_cards;
use crate::scrapers;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info, instrument};

/// Where cards come from. The server uses [`BrowserSource`]; tests swap in a
/// stub.
pub trait CardSource: Send + Sync + 'static {
    fn fetch(&self, options: &FetchOptions) -> Result<Vec<Card>, ScrapeError>;
}

/// Runs the full pipeline on a fresh browser surface per call.
#[derive(Debug, Default)]
pub struct BrowserSource;

impl CardSource for BrowserSource {
    fn fetch(&self, options: &FetchOptions) -> Result<Vec<Card>, ScrapeError> {
        scrapers::fetch_articles(options)
    }
}

#[derive(Clone)]
pub struct AppState {
    /// Options used for any parameter the request leaves out.
    pub defaults: FetchOptions,
    pub source: Arc<dyn CardSource>,
}

impl AppState {
    pub fn new(defaults: FetchOptions, source: impl CardSource) -> Self {
        Self {
            defaults,
            source: Arc::new(source),
        }
    }
}

/// Raw query parameters of `/noticias`, kept as strings so malformed values
/// degrade to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct NoticiasQuery {
    pub url: Option<String>,
    #[serde(alias = "columnId")]
    pub column_id: Option<String>,
    pub limit: Option<String>,
    pub timeout: Option<String>,
    pub headless: Option<String>,
}

impl NoticiasQuery {
    /// Overlay the request parameters on `defaults`.
    pub fn apply(&self, defaults: &FetchOptions) -> FetchOptions {
        let mut options = defaults.clone();
        if let Some(url) = self.url.as_deref().filter(|s| !s.is_empty()) {
            options.url = url.to_string();
        }
        if let Some(column_id) = self.column_id.as_deref().filter(|s| !s.is_empty()) {
            options.column_id = column_id.to_string();
        }
        if let Some(limit) = self.limit.as_deref() {
            options.limit = limit.trim().parse::<usize>().ok().filter(|n| *n > 0);
        }
        if let Some(secs) = self.timeout.as_deref().and_then(|t| t.trim().parse::<u64>().ok()) {
            options.timeout = timeout_from_secs(secs);
        }
        if let Some(headless) = self.headless.as_deref() {
            options.headless = headless.eq_ignore_ascii_case("true");
        }
        options
    }
}

/// Build the router served by `globo_cards serve`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/noticias", get(noticias))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[instrument(level = "info", skip_all)]
async fn noticias(State(state): State<AppState>, Query(query): Query<NoticiasQuery>) -> Response {
    let options = query.apply(&state.defaults);
    info!(url = %options.url, column_id = %options.column_id, limit = ?options.limit, "Fetch requested");

    let source = Arc::clone(&state.source);
    let result = tokio::task::spawn_blocking(move || source.fetch(&options))
        .await
        .unwrap_or_else(|e| Err(ScrapeError::Task(e.to_string())));

    match result {
        Ok(cards) => match render_cards(&cards) {
            Ok(json) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
                json,
            )
                .into_response(),
            Err(e) => failure(&e),
        },
        Err(e) => failure(&e),
    }
}

fn failure(err: &dyn std::error::Error) -> Response {
    error!(error = %err, "Fetch request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(err)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{self, Body};
    use axum::http::Request;
    use crate::config::MAX_TIMEOUT_SECS;
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt as _;

    const BODY_LIMIT: usize = 1024 * 1024;

    /// Returns canned cards (or a discovery timeout) and records the options
    /// each request resolved to.
    #[derive(Default)]
    struct StubSource {
        cards: Option<Vec<Card>>,
        seen: Arc<Mutex<Vec<FetchOptions>>>,
    }

    impl CardSource for StubSource {
        fn fetch(&self, options: &FetchOptions) -> Result<Vec<Card>, ScrapeError> {
            self.seen.lock().unwrap().push(options.clone());
            self.cards.clone().ok_or(ScrapeError::DiscoveryTimeout {
                what: format!("#{}", options.column_id),
                after: options.timeout,
            })
        }
    }

    fn router(cards: Option<Vec<Card>>) -> (Router, Arc<Mutex<Vec<FetchOptions>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let source = StubSource {
            cards,
            seen: Arc::clone(&seen),
        };
        (create_router(AppState::new(FetchOptions::default(), source)), seen)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String, Option<String>) {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .header("origin", "http://localhost:8080")
            .body(Body::empty())
            .expect("build request");
        let resp = app.oneshot(req).await.expect("oneshot");
        let status = resp.status();
        let cors = resp
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
            .await
            .expect("read body");
        (status, String::from_utf8(bytes.to_vec()).expect("utf8"), cors)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = router(Some(vec![]));
        let (status, body, _) = get(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_noticias_returns_cards() {
        let cards = vec![Card::new("Eleições 2026", "https://g1.globo.com/a.ghtml", true)];
        let (app, _) = router(Some(cards));

        let (status, body, cors) = get(app, "/noticias").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Eleições 2026"));
        assert_eq!(cors.as_deref(), Some("*"));

        let parsed: Vec<Card> = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].featured);
    }

    #[tokio::test]
    async fn test_noticias_failure_is_500_error_object() {
        let (app, _) = router(None);
        let (status, body, _) = get(app, "/noticias").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(v["error"].as_str().unwrap().contains("#column-jornalismo"));
    }

    #[tokio::test]
    async fn test_noticias_query_overrides() {
        let (app, seen) = router(Some(vec![]));
        let (status, _, _) = get(
            app,
            "/noticias?limit=3&timeout=5&headless=FALSE&columnId=column-esporte&url=https%3A%2F%2Fge.globo.com%2F",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let seen = seen.lock().unwrap();
        let opts = &seen[0];
        assert_eq!(opts.limit, Some(3));
        assert_eq!(opts.timeout, Duration::from_secs(5));
        assert!(!opts.headless);
        assert_eq!(opts.column_id, "column-esporte");
        assert_eq!(opts.url, "https://ge.globo.com/");
    }

    #[tokio::test]
    async fn test_noticias_huge_timeout_is_clamped() {
        let (app, seen) = router(Some(vec![]));
        let (status, _, _) = get(app, "/noticias?timeout=18446744073709551615").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            seen.lock().unwrap()[0].timeout,
            Duration::from_secs(MAX_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_malformed_params_fall_back_to_defaults() {
        let defaults = FetchOptions::default();
        let query = NoticiasQuery {
            limit: Some("dez".to_string()),
            timeout: Some("-1".to_string()),
            ..NoticiasQuery::default()
        };
        let opts = query.apply(&defaults);
        assert_eq!(opts.limit, None);
        assert_eq!(opts.timeout, defaults.timeout);
        assert!(opts.headless);
    }

    #[test]
    fn test_zero_limit_means_no_cap() {
        let query = NoticiasQuery {
            limit: Some("0".to_string()),
            ..NoticiasQuery::default()
        };
        assert_eq!(query.apply(&FetchOptions::default()).limit, None);
    }
}
