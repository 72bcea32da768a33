use crate::api::doc::ApiDoc;
use crate::api::handlers::{
    headline_handler, health_handler, metrics_handler, page_handler, ticker_fragment_handler,
    ticker_handler,
};
use crate::api::state::AppState;
use axum::http::HeaderValue;
use axum::{routing::get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn cors_layer(allowed_origins: &str) -> CorsLayer {
    if allowed_origins == "*" {
        return CorsLayer::permissive();
    }

    // Parse comma-separated origins, skipping ones that are not valid header values
    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", s);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_router(state: AppState, allowed_origins: &str) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(60),
        ))
        .layer(cors_layer(allowed_origins));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(page_handler))
        .route("/fragments/ticker", get(ticker_fragment_handler))
        // System endpoints (no versioning)
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        // V1 API endpoints
        .route("/v1/headline", get(headline_handler))
        .route("/v1/ticker", get(ticker_handler))
        .layer(middleware)
        .with_state(state)
}
