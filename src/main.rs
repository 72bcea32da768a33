//! Launchpad
//!
//! Serves a single informational page for budding engineers: the top tech
//! headline, a scrolling stock ticker and a couple of educational snippets.
//!
//! # Architecture
//!
//! - **Domain**: headline and quote entities, the outbound fetch seam
//! - **Application**: headline strategy chain, quote poller, snippet catalog
//! - **Infrastructure**: reqwest-backed fetcher
//! - **API**: page rendering, JSON endpoints, middleware
//!
//! The headline is resolved once per page request. Quotes are polled in the
//! background on a fixed interval and every render reads the latest view.
//!
//! # Configuration
//!
//! `config.yaml` (or the file named by `LAUNCHPAD_CONFIG`) plus environment:
//! - `QUOTES_API_KEY`: quote endpoint key (default: demo)
//! - `RUST_LOG`: logging level (default: info)
//!
//! # Quick Start
//!
//! ```bash
//! cargo run --release
//! curl http://localhost:3010/
//! curl http://localhost:3010/v1/headline
//! curl http://localhost:3010/v1/ticker
//! ```

mod api;
mod application;
mod config;
mod domain;
mod infrastructure;

use crate::api::routes::create_router;
use crate::api::state::AppState;
use crate::application::{HeadlineResolver, QuotePoller, TickerFeed};
use crate::config::Config;
use crate::infrastructure::HttpFetcher;
use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = env::var("LAUNCHPAD_CONFIG").unwrap_or_else(|_| "config.yaml".into());
    let config = Config::load(&config_path)?;

    let api_key = env::var("QUOTES_API_KEY").unwrap_or_else(|_| {
        tracing::warn!("QUOTES_API_KEY not set, using the public demo key");
        "demo".into()
    });

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    // Infrastructure
    let timeout = config.http.request_timeout_secs.map(Duration::from_secs);
    let fetcher = Arc::new(HttpFetcher::new(timeout)?);

    // Application
    let resolver = Arc::new(HeadlineResolver::new(fetcher.clone(), &config.headline)?);
    let ticker = Arc::new(TickerFeed::new());
    let poller = QuotePoller::new(fetcher, &config.quotes, api_key)?;
    let poller_handle = poller.start(ticker.clone(), config.quotes.symbols.clone());

    let state = AppState {
        resolver,
        ticker,
        metrics,
        refresh_secs: poller.interval().as_secs(),
    };

    let app = create_router(state, &config.server.allowed_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", addr))?;
    tracing::info!("Launchpad running at http://{}", addr);
    tracing::info!("Headline source: {}", config.headline.origin);

    // Graceful shutdown handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error during operation")?;

    poller_handle.stop();
    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C) to initiate graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
