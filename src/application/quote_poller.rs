//! Periodic batched quote polling.
//!
//! A [`QuotePoller`] issues one request for the whole symbol set right away
//! and again on every tick of a fixed interval. Each response replaces the
//! list held in a [`TickerFeed`] wholesale, or blanks it on failure.
//!
//! Every poll belongs to a generation. Starting a poller opens a new
//! generation and stopping it closes that generation; a response is applied
//! only while its generation is the current, active one. Requests are not
//! cancelled: a late response after a stop (or after a restart with another
//! symbol set) is simply dropped.
//!
//! Ticks are not paced by responses, so a request slower than the interval
//! can overlap the next one and its late response overwrites the newer list.
//! This last-write-wins race is a known limitation.

use crate::config::QuotesConfig;
use crate::domain::{FetchRequest, Quote, SourceFetcher};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use url::Url;

/// What the ticker currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerView {
    pub quotes: Vec<Quote>,
    pub loading: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TickerView {
    fn loading() -> Self {
        Self {
            quotes: Vec::new(),
            loading: true,
            updated_at: None,
        }
    }

    /// The quotes followed by themselves again, for a seamless marquee.
    pub fn loop_quotes(&self) -> Vec<Quote> {
        self.quotes
            .iter()
            .chain(self.quotes.iter())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone)]
struct FeedState {
    generation: u64,
    active: bool,
    view: TickerView,
}

/// Guarded store for the ticker view.
///
/// All check-then-mutate steps run inside the watch channel's write lock.
pub struct TickerFeed {
    tx: watch::Sender<FeedState>,
}

impl Default for TickerFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl TickerFeed {
    pub fn new() -> Self {
        Self {
            tx: watch::Sender::new(FeedState {
                generation: 0,
                active: false,
                view: TickerView::loading(),
            }),
        }
    }

    /// Open a new generation, superseding any previous one.
    pub fn begin(&self) -> u64 {
        let mut generation = 0;
        self.tx.send_modify(|state| {
            state.generation += 1;
            state.active = true;
            state.view = TickerView::loading();
            generation = state.generation;
        });
        generation
    }

    /// Close `generation` if it is still current. Returns whether it was.
    pub fn deactivate(&self, generation: u64) -> bool {
        self.tx.send_if_modified(|state| {
            if state.generation == generation && state.active {
                state.active = false;
                true
            } else {
                false
            }
        })
    }

    /// Replace the quotes on behalf of `generation`.
    ///
    /// A no-op returning `false` when that generation is stale or stopped.
    pub fn apply(&self, generation: u64, quotes: Vec<Quote>) -> bool {
        self.tx.send_if_modified(|state| {
            if state.generation != generation || !state.active {
                return false;
            }
            state.view = TickerView {
                quotes,
                loading: false,
                updated_at: Some(Utc::now()),
            };
            true
        })
    }

    pub fn snapshot(&self) -> TickerView {
        self.tx.borrow().view.clone()
    }

    pub fn is_active(&self) -> bool {
        self.tx.borrow().active
    }

    /// Whether `generation` is the current, active one.
    pub fn is_current(&self, generation: u64) -> bool {
        let state = self.tx.borrow();
        state.generation == generation && state.active
    }
}

/// Fetch and normalize one batch of quotes.
///
/// The response status is not consulted; only a JSON array counts as data.
pub async fn fetch_quotes(fetcher: &dyn SourceFetcher, url: &Url) -> anyhow::Result<Vec<Quote>> {
    let resp = fetcher.fetch(FetchRequest::get(url.clone())).await?;
    let data: Value = serde_json::from_str(&resp.body)
        .with_context(|| format!("Quote response (status {}) is not JSON", resp.status))?;
    match data {
        Value::Array(items) => Ok(items.iter().map(Quote::from_value).collect()),
        other => anyhow::bail!(
            "Quote response (status {}) is not an array: {}",
            resp.status,
            kind(&other)
        ),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Starts polling loops that feed a [`TickerFeed`].
pub struct QuotePoller {
    fetcher: Arc<dyn SourceFetcher>,
    endpoint: Url,
    api_key: String,
    interval: Duration,
}

impl QuotePoller {
    pub fn new(
        fetcher: Arc<dyn SourceFetcher>,
        config: &QuotesConfig,
        api_key: impl Into<String>,
    ) -> anyhow::Result<Self> {
        if config.endpoint.cannot_be_a_base() {
            anyhow::bail!("Quote endpoint {} cannot take path segments", config.endpoint);
        }
        Ok(Self {
            fetcher,
            endpoint: config.endpoint.clone(),
            api_key: api_key.into(),
            interval: Duration::from_secs(config.poll_interval_secs),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Batched request URL: symbols comma-joined into one path segment.
    pub fn quote_url(&self, symbols: &[String]) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&symbols.join(","));
        }
        url.query_pairs_mut().append_pair("apikey", &self.api_key);
        url
    }

    /// Begin polling `symbols` into `feed` until the handle is stopped or dropped.
    pub fn start(&self, feed: Arc<TickerFeed>, symbols: Vec<String>) -> PollerHandle {
        let generation = feed.begin();
        let url = self.quote_url(&symbols);
        let fetcher = self.fetcher.clone();
        let period = self.interval;
        let loop_feed = feed.clone();
        let label = symbols.join(",");

        info!(generation, symbols = %label, every = ?period, "Starting quote poller");

        let task = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if !loop_feed.is_current(generation) {
                    debug!(generation, "Quote poller superseded, ending loop");
                    break;
                }
                // Detached so a slow response never delays the next tick.
                tokio::spawn(poll_once(
                    fetcher.clone(),
                    loop_feed.clone(),
                    generation,
                    url.clone(),
                ));
            }
        });

        PollerHandle {
            feed,
            generation,
            task,
        }
    }
}

async fn poll_once(
    fetcher: Arc<dyn SourceFetcher>,
    feed: Arc<TickerFeed>,
    generation: u64,
    url: Url,
) {
    let quotes = match fetch_quotes(fetcher.as_ref(), &url).await {
        Ok(quotes) => {
            let outcome = if quotes.is_empty() { "empty" } else { "ok" };
            metrics::counter!("quote_polls_total", "outcome" => outcome).increment(1);
            debug!(generation, count = quotes.len(), "Fetched quotes");
            quotes
        }
        Err(e) => {
            metrics::counter!("quote_polls_total", "outcome" => "error").increment(1);
            warn!(generation, "Quote poll failed: {:#}", e);
            Vec::new()
        }
    };

    if !feed.apply(generation, quotes) {
        debug!(generation, "Dropping quote response for inactive poller");
    }
}

/// Owns one running poll loop. Dropping it stops the loop.
pub struct PollerHandle {
    feed: Arc<TickerFeed>,
    generation: u64,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the interval and ignore any response still in flight.
    pub fn stop(&self) {
        self.task.abort();
        if self.feed.deactivate(self.generation) {
            info!(generation = self.generation, "Quote poller stopped");
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
