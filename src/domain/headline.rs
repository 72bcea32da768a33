use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

/// Title used when no better one can be extracted.
pub const PLACEHOLDER_TITLE: &str = "Latest from TLDR Tech";

const FALLBACK_SUMMARY: &str = "Visit TLDR for today’s top startup/tech stories.";

/// Which extraction strategy produced a [`Headline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HeadlineSource {
    Api,
    Feed,
    Scrape,
    Fallback,
}

impl HeadlineSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadlineSource::Api => "api",
            HeadlineSource::Feed => "feed",
            HeadlineSource::Scrape => "scrape",
            HeadlineSource::Fallback => "fallback",
        }
    }
}

/// The single top news item shown on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Headline {
    #[schema(example = "OpenAI ships a new model")]
    pub title: String,
    #[schema(example = "https://tldr.tech/tech/2026-10-18")]
    pub url: String,
    pub summary: Option<String>,
    pub source: HeadlineSource,
}

impl Headline {
    /// The constant record returned when every strategy fails, pointing at
    /// the site's home page.
    pub fn fallback(home: &Url) -> Self {
        Self {
            title: PLACEHOLDER_TITLE.to_string(),
            url: home.to_string(),
            summary: Some(FALLBACK_SUMMARY.to_string()),
            source: HeadlineSource::Fallback,
        }
    }
}
