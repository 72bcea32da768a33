//! Pure headline extraction from the three payload shapes the source serves.
//!
//! Nothing here touches the network; each function takes the body text (or
//! parsed JSON) and returns a headline only when the required fields exist
//! and its link is an absolute http(s) URL.

use crate::domain::headline::PLACEHOLDER_TITLE;
use crate::domain::{Headline, HeadlineSource};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use url::Url;

static FEED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<item>.*?</item>").expect("valid item pattern"));
static FEED_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<title><!\[CDATA\[(.*?)\]\]></title>|<title>(.*?)</title>")
        .expect("valid title pattern")
});
static FEED_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<link>(.*?)</link>").expect("valid link pattern"));
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

/// Loose-JSON truthiness: empty strings, zero, `false` and `null` are falsy.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First truthy candidate, coerced to text.
fn first_text<'a>(candidates: impl IntoIterator<Item = Option<&'a Value>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|v| truthy(v))
        .map(as_text)
        .filter(|s| !s.is_empty())
}

/// Links end up in an `href`, so anything but http(s) is rejected.
fn is_web_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
}

/// Read a headline out of the structured "latest items" payload.
///
/// The item is looked for in `items[0]`, `stories[0]`, `sections[0].items[0]`
/// and finally the root object, in that order.
pub fn from_api_payload(data: &Value) -> Option<Headline> {
    let first = [
        data.pointer("/items/0"),
        data.pointer("/stories/0"),
        data.pointer("/sections/0/items/0"),
    ]
    .into_iter()
    .flatten()
    .find(|v| truthy(v))
    .unwrap_or(data);

    let title = first_text([first.get("title"), data.get("title")])?;
    let url = first_text([first.get("url"), first.get("link"), data.get("link")])
        .filter(|u| is_web_url(u))?;
    let summary = first_text([first.get("summary"), first.get("tldr"), data.get("summary")]);

    Some(Headline {
        title,
        url,
        summary,
        source: HeadlineSource::Api,
    })
}

/// Read the first `<item>` of a feed document.
pub fn from_feed(xml: &str) -> Option<Headline> {
    let item = FEED_ITEM.find(xml)?.as_str();

    let title = FEED_TITLE
        .captures(item)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str())
        .filter(|t| !t.is_empty())?;
    let link = FEED_LINK
        .captures(item)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|l| is_web_url(l))?;

    Some(Headline {
        title: title.to_string(),
        url: link.to_string(),
        summary: None,
        source: HeadlineSource::Feed,
    })
}

/// Finds news anchors on a site's homepage.
#[derive(Debug, Clone)]
pub struct NewsAnchorMatcher {
    origin: Url,
    anchor: Regex,
}

impl NewsAnchorMatcher {
    /// Only the origin's host and port take part in matching.
    pub fn new(origin: &Url) -> anyhow::Result<Self> {
        let host = origin
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("{} has no host", origin))?;
        let authority = match origin.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let pattern = format!(
            r#"(?i)<a[^>]+href="((?:https?://{}/|/)news[^"]*)"[^>]*>(.*?)</a>"#,
            regex::escape(&authority)
        );
        let anchor = Regex::new(&pattern)?;
        Ok(Self {
            origin: origin.clone(),
            anchor,
        })
    }

    /// Read the first news anchor of the homepage.
    pub fn scan_homepage(&self, html: &str) -> Option<Headline> {
        let caps = self.anchor.captures(html)?;
        let href = caps.get(1)?.as_str();

        // Site-relative targets resolve against the root, whatever the origin's path.
        let url = if href.starts_with('/') {
            self.origin.join(href).ok()?.to_string()
        } else if is_web_url(href) {
            href.to_string()
        } else {
            return None;
        };

        let inner = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        let stripped = TAG.replace_all(inner, "");
        let text = stripped.trim();
        let title = if text.is_empty() {
            PLACEHOLDER_TITLE.to_string()
        } else {
            text.to_string()
        };

        Some(Headline {
            title,
            url,
            summary: None,
            source: HeadlineSource::Scrape,
        })
    }
}
