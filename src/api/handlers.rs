use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Json,
};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::api::page::{self, PageModel};
use crate::api::state::AppState;
use crate::application::{snippets, TickerView};
use crate::domain::{Direction, Headline, Quote};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// "active" while the quote poller is running
    pub poller: String,
}

/// A quote with its derived display values.
#[derive(Serialize, ToSchema, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TickerQuote {
    #[serde(flatten)]
    pub quote: Quote,
    /// Signed percentage change
    #[schema(example = 2.0)]
    pub percent: f64,
    pub direction: Direction,
}

impl From<Quote> for TickerQuote {
    fn from(quote: Quote) -> Self {
        Self {
            percent: quote.percent_change(),
            direction: quote.direction(),
            quote,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TickerResponse {
    pub quotes: Vec<TickerQuote>,
    /// `quotes` followed by `quotes` again, for marquee rendering
    pub loop_quotes: Vec<TickerQuote>,
    pub loading: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<TickerView> for TickerResponse {
    fn from(view: TickerView) -> Self {
        let loop_quotes = view.loop_quotes().into_iter().map(TickerQuote::from).collect();
        Self {
            quotes: view.quotes.into_iter().map(TickerQuote::from).collect(),
            loop_quotes,
            loading: view.loading,
            updated_at: view.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let poller = if state.ticker.is_active() {
        "active"
    } else {
        "stopped"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
        poller: poller.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "system",
    responses(
        (status = 200, description = "Prometheus metrics", content_type = "text/plain")
    )
)]
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.render()
}

/// Resolve the top headline, degrading through every strategy to the fallback.
#[utoipa::path(
    get,
    path = "/v1/headline",
    tag = "launchpad",
    responses(
        (status = 200, description = "Headline resolved (never fails)", body = Headline,
            example = json!({
                "title": "Latest from TLDR Tech",
                "url": "https://tldr.tech/",
                "summary": "Visit TLDR for today’s top startup/tech stories.",
                "source": "fallback"
            })
        )
    )
)]
#[instrument(skip(state))]
pub async fn headline_handler(State(state): State<AppState>) -> Json<Headline> {
    Json(state.resolver.resolve().await)
}

/// Current ticker view as maintained by the background poller.
#[utoipa::path(
    get,
    path = "/v1/ticker",
    tag = "launchpad",
    responses(
        (status = 200, description = "Current quotes", body = TickerResponse,
            example = json!({
                "quotes": [{"symbol": "AAPL", "price": 150.0, "change": 3.0, "changesPercentage": 2.0, "percent": 2.0, "direction": "up"}],
                "loopQuotes": [
                    {"symbol": "AAPL", "price": 150.0, "change": 3.0, "changesPercentage": 2.0, "percent": 2.0, "direction": "up"},
                    {"symbol": "AAPL", "price": 150.0, "change": 3.0, "changesPercentage": 2.0, "percent": 2.0, "direction": "up"}
                ],
                "loading": false,
                "updatedAt": "2026-10-18T09:30:00Z"
            })
        )
    )
)]
pub async fn ticker_handler(State(state): State<AppState>) -> Json<TickerResponse> {
    Json(TickerResponse::from(state.ticker.snapshot()))
}

/// Ticker marquee markup, polled by the page to refresh in place.
pub async fn ticker_fragment_handler(State(state): State<AppState>) -> Html<String> {
    Html(page::render_ticker(&state.ticker.snapshot()))
}

/// The Launchpad page. The headline is resolved once per request.
#[instrument(skip(state))]
pub async fn page_handler(State(state): State<AppState>) -> Html<String> {
    metrics::counter!("page_views_total").increment(1);

    let headline = state.resolver.resolve().await;
    let ticker = state.ticker.snapshot();

    Html(page::render_page(&PageModel {
        headline: &headline,
        source_home: state.resolver.home_url(),
        ticker: &ticker,
        snippets: snippets::pick_random(),
        year: Utc::now().year(),
        refresh_secs: state.refresh_secs,
    }))
}
