use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health_handler,
        crate::api::handlers::metrics_handler,
        crate::api::handlers::headline_handler,
        crate::api::handlers::ticker_handler
    ),
    components(
        schemas(
            crate::api::handlers::HealthResponse,
            crate::api::handlers::TickerResponse,
            crate::api::handlers::TickerQuote,
            crate::domain::Headline,
            crate::domain::HeadlineSource,
            crate::domain::Quote,
            crate::domain::Direction
        )
    ),
    tags(
        (name = "system", description = "System endpoints for health checks and metrics"),
        (name = "launchpad", description = "Headline and market ticker data behind the Launchpad page")
    ),
    info(
        title = "Launchpad",
        version = "0.1.0",
        description = "A daily starting page for budding engineers: top tech headline, a live stock ticker and a bit of learning."
    )
)]
pub struct ApiDoc;
