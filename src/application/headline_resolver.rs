//! Best-effort resolution of the top headline.
//!
//! Three strategies are tried strictly in sequence against the same site:
//! the structured JSON endpoint, the feed document, then the raw homepage.
//! The first one that yields a complete headline wins; if none does, the
//! constant fallback record is returned. Network failures, non-2xx statuses
//! and unusable payloads are all soft failures: logged, then skipped.

use crate::application::extract::{self, NewsAnchorMatcher};
use crate::config::HeadlineConfig;
use crate::domain::{FetchRequest, Headline, SourceFetcher};
use anyhow::Context;
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

const ACCEPT_JSON: &str = "application/json";
const ACCEPT_FEED: &str = "application/rss+xml,application/xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Api,
    Feed,
    Scrape,
}

impl Strategy {
    const CHAIN: [Strategy; 3] = [Strategy::Api, Strategy::Feed, Strategy::Scrape];

    fn name(self) -> &'static str {
        match self {
            Strategy::Api => "api",
            Strategy::Feed => "feed",
            Strategy::Scrape => "scrape",
        }
    }
}

/// Produces one [`Headline`] per call and never fails.
pub struct HeadlineResolver {
    fetcher: Arc<dyn SourceFetcher>,
    api_url: Url,
    feed_url: Url,
    home_url: Url,
    anchors: NewsAnchorMatcher,
}

impl HeadlineResolver {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, config: &HeadlineConfig) -> anyhow::Result<Self> {
        let anchors = NewsAnchorMatcher::new(&config.origin).with_context(|| {
            format!("Failed to build news anchor pattern for {}", config.origin)
        })?;
        Ok(Self {
            fetcher,
            api_url: config.api_url().context("Invalid headline api_path")?,
            feed_url: config.feed_url().context("Invalid headline feed_path")?,
            home_url: config.home_url().context("Invalid headline origin")?,
            anchors,
        })
    }

    /// The source's home page, also the fallback headline's link.
    pub fn home_url(&self) -> &Url {
        &self.home_url
    }

    /// Run the strategy chain; later strategies only run after earlier ones fail.
    pub async fn resolve(&self) -> Headline {
        let attempts = futures::stream::iter(Strategy::CHAIN).filter_map(|s| self.attempt(s));
        let mut attempts = std::pin::pin!(attempts);

        let headline = match attempts.next().await {
            Some(headline) => headline,
            None => {
                info!("All headline strategies failed, using fallback");
                Headline::fallback(&self.home_url)
            }
        };

        metrics::counter!("headline_resolutions_total", "source" => headline.source.as_str())
            .increment(1);
        headline
    }

    async fn attempt(&self, strategy: Strategy) -> Option<Headline> {
        match self.run(strategy).await {
            Ok(Some(headline)) => {
                debug!(strategy = strategy.name(), url = %headline.url, "Headline resolved");
                Some(headline)
            }
            Ok(None) => {
                debug!(strategy = strategy.name(), "No usable headline in payload");
                None
            }
            Err(e) => {
                warn!(strategy = strategy.name(), "Headline strategy failed: {:#}", e);
                None
            }
        }
    }

    async fn run(&self, strategy: Strategy) -> anyhow::Result<Option<Headline>> {
        match strategy {
            Strategy::Api => {
                let body = self
                    .get(FetchRequest::get(self.api_url.clone()).accept(ACCEPT_JSON))
                    .await?;
                let data: Value =
                    serde_json::from_str(&body).context("Headline API returned invalid JSON")?;
                Ok(extract::from_api_payload(&data))
            }
            Strategy::Feed => {
                let body = self
                    .get(FetchRequest::get(self.feed_url.clone()).accept(ACCEPT_FEED))
                    .await?;
                Ok(extract::from_feed(&body))
            }
            Strategy::Scrape => {
                let body = self.get(FetchRequest::get(self.home_url.clone())).await?;
                Ok(self.anchors.scan_homepage(&body))
            }
        }
    }

    async fn get(&self, request: FetchRequest) -> anyhow::Result<String> {
        let url = request.url.clone();
        let resp = self.fetcher.fetch(request).await?;
        if !resp.is_success() {
            anyhow::bail!("{} returned status {}", url, resp.status);
        }
        Ok(resp.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fetcher::MockSourceFetcher;
    use crate::domain::{FetchResponse, HeadlineSource};

    const API: &str = "https://tldr.tech/api/latest/tech";
    const FEED: &str = "https://tldr.tech/tech.rss";
    const HOME: &str = "https://tldr.tech/";

    fn ok(body: &str) -> anyhow::Result<FetchResponse> {
        Ok(FetchResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn status(code: u16) -> anyhow::Result<FetchResponse> {
        Ok(FetchResponse {
            status: code,
            body: String::new(),
        })
    }

    fn resolver(mock: MockSourceFetcher) -> HeadlineResolver {
        HeadlineResolver::new(Arc::new(mock), &HeadlineConfig::default()).unwrap()
    }

    fn expect(
        mock: &mut MockSourceFetcher,
        url: &'static str,
        reply: fn() -> anyhow::Result<FetchResponse>,
    ) {
        mock.expect_fetch()
            .withf(move |req| req.url.as_str() == url)
            .times(1)
            .returning(move |_| reply());
    }

    #[tokio::test]
    async fn api_success_short_circuits() {
        let mut mock = MockSourceFetcher::new();
        mock.expect_fetch()
            .withf(|req| req.url.as_str() == API && req.accept == Some(ACCEPT_JSON))
            .times(1)
            .returning(|_| {
                ok(r#"{"items":[
                    {"title":"Rust 2.0","url":"https://tldr.tech/r","summary":"big"}
                ]}"#)
            });

        let h = resolver(mock).resolve().await;
        assert_eq!(
            h,
            Headline {
                title: "Rust 2.0".into(),
                url: "https://tldr.tech/r".into(),
                summary: Some("big".into()),
                source: HeadlineSource::Api,
            }
        );
    }

    #[tokio::test]
    async fn feed_used_when_api_errors() {
        let mut mock = MockSourceFetcher::new();
        expect(&mut mock, API, || Err(anyhow::anyhow!("connection refused")));
        mock.expect_fetch()
            .withf(|req| req.url.as_str() == FEED && req.accept == Some(ACCEPT_FEED))
            .times(1)
            .returning(|_| {
                ok("<item><title>From feed</title><link>https://tldr.tech/f</link></item>")
            });

        let h = resolver(mock).resolve().await;
        assert_eq!(h.source, HeadlineSource::Feed);
        assert_eq!(h.title, "From feed");
        assert_eq!(h.summary, None);
    }

    #[tokio::test]
    async fn scrape_used_when_api_and_feed_unusable() {
        let mut mock = MockSourceFetcher::new();
        expect(&mut mock, API, || ok(r#"{"items":[{"title":"no url"}]}"#));
        expect(&mut mock, FEED, || status(404));
        mock.expect_fetch()
            .withf(|req| req.url.as_str() == HOME && req.accept.is_none())
            .times(1)
            .returning(|_| ok(r#"<nav><a href="/news/today"><span>Scraped</span></a></nav>"#));

        let h = resolver(mock).resolve().await;
        assert_eq!(h.source, HeadlineSource::Scrape);
        assert_eq!(h.url, "https://tldr.tech/news/today");
        assert_eq!(h.title, "Scraped");
    }

    #[tokio::test]
    async fn non_success_status_is_a_soft_failure_even_with_body() {
        let mut mock = MockSourceFetcher::new();
        expect(&mut mock, API, || {
            Ok(FetchResponse {
                status: 500,
                body: r#"{"title":"t","link":"https://tldr.tech/x"}"#.into(),
            })
        });
        expect(&mut mock, FEED, || {
            ok("<item><title>Feed</title><link>https://tldr.tech/f</link></item>")
        });

        assert_eq!(resolver(mock).resolve().await.source, HeadlineSource::Feed);
    }

    #[tokio::test]
    async fn everything_failing_returns_exact_fallback() {
        let mut mock = MockSourceFetcher::new();
        expect(&mut mock, API, || ok("not json"));
        expect(&mut mock, FEED, || Err(anyhow::anyhow!("dns failure")));
        expect(&mut mock, HOME, || ok("<html><a href=\"/about\">About</a></html>"));

        let h = resolver(mock).resolve().await;
        assert_eq!(h, Headline::fallback(&Url::parse(HOME).unwrap()));
        assert!(!h.title.is_empty());
        assert!(!h.url.is_empty());
    }
}
