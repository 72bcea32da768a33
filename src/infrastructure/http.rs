//! reqwest-backed [`SourceFetcher`].
//!
//! One pooled client serves the headline strategies and the quote poller.
//! No retries are attempted; callers treat any failure as soft.

use crate::domain::{FetchRequest, FetchResponse, SourceFetcher};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("launchpad/", env!("CARGO_PKG_VERSION"));

/// HTTP client for third-party sources.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build the shared client.
    ///
    /// `timeout` bounds each whole request; `None` leaves the network stack
    /// defaults in place.
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, request: FetchRequest) -> anyhow::Result<FetchResponse> {
        let mut req = self.client.get(request.url.clone());
        if let Some(accept) = request.accept {
            req = req.header(ACCEPT, accept);
        }

        let resp = req
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Request to {} failed", redact(&request.url)))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to read body from {}", redact(&request.url)))?;

        debug!(url = %redact(&request.url), status, bytes = body.len(), "Fetched");
        Ok(FetchResponse { status, body })
    }
}

/// Drop the query string and any credentials so API keys never reach the logs.
fn redact(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    let _ = url.set_password(None);
    let _ = url.set_username("");
    url
}
