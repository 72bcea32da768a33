use crate::application::{HeadlineResolver, TickerFeed};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<HeadlineResolver>,
    pub ticker: Arc<TickerFeed>,
    pub metrics: PrometheusHandle,
    /// Poll interval, reused as the page's ticker refresh period
    pub refresh_secs: u64,
}
