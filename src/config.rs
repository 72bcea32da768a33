//! Application configuration loaded from `config.yaml`.
//!
//! Every field has a serde default, so an empty or missing file yields the
//! stock Launchpad setup. Secrets come from the environment instead.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use url::Url;
use validator::{Validate, ValidationError};

/// Top-level application configuration.
#[derive(Deserialize, Debug, Clone, Default, Validate)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    #[validate(nested)]
    pub headline: HeadlineConfig,
    #[serde(default)]
    #[validate(nested)]
    pub quotes: QuotesConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Server configuration settings.
#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on (default: 3010)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Comma-separated list of allowed CORS origins (default: "*")
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
}

/// Where the headline comes from.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct HeadlineConfig {
    /// Site origin; only its scheme, host and port are used
    #[serde(default = "default_origin")]
    #[validate(custom(function = "validate_web_url"))]
    pub origin: Url,
    /// Path of the structured "latest items" endpoint
    #[serde(default = "default_api_path")]
    pub api_path: String,
    /// Path of the feed document
    #[serde(default = "default_feed_path")]
    pub feed_path: String,
}

/// Quote endpoint and polling cadence.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct QuotesConfig {
    /// Base URL; the comma-joined symbols are appended as a path segment
    #[serde(default = "default_quotes_endpoint")]
    #[validate(custom(function = "validate_web_url"))]
    pub endpoint: Url,
    #[serde(default = "default_symbols")]
    #[validate(length(min = 1, message = "at least one symbol is required"))]
    pub symbols: Vec<String>,
    #[serde(default = "default_poll_interval")]
    #[validate(range(min = 1, max = 86400))]
    pub poll_interval_secs: u64,
}

/// Outbound HTTP client settings.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct HttpConfig {
    /// Per-request timeout; unset leaves the network stack defaults
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3010
}
fn default_allowed_origins() -> String {
    "*".to_string()
}
fn default_origin() -> Url {
    Url::parse("https://tldr.tech").expect("valid default origin")
}
fn default_api_path() -> String {
    "/api/latest/tech".to_string()
}
fn default_feed_path() -> String {
    "/tech.rss".to_string()
}
fn default_quotes_endpoint() -> Url {
    Url::parse("https://financialmodelingprep.com/api/v3/quote").expect("valid default endpoint")
}
fn default_symbols() -> Vec<String> {
    ["AAPL", "MSFT", "GOOGL", "NVDA"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_poll_interval() -> u64 {
    60
}

/// Only absolute http(s) URLs with a host can be fetched.
fn validate_web_url(url: &Url) -> Result<(), ValidationError> {
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        _ => Err(ValidationError::new("web_url").with_message("must be an http(s) URL".into())),
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for HeadlineConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            api_path: default_api_path(),
            feed_path: default_feed_path(),
        }
    }
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_quotes_endpoint(),
            symbols: default_symbols(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl HeadlineConfig {
    /// Paths are resolved against the site root, not the origin's own path.
    fn resolve(&self, path: &str) -> Result<Url, url::ParseError> {
        self.origin.join(&format!("/{}", path.trim_start_matches('/')))
    }

    pub fn api_url(&self) -> Result<Url, url::ParseError> {
        self.resolve(&self.api_path)
    }

    pub fn feed_url(&self) -> Result<Url, url::ParseError> {
        self.resolve(&self.feed_path)
    }

    pub fn home_url(&self) -> Result<Url, url::ParseError> {
        self.resolve("")
    }
}

impl Config {
    /// Parse and validate YAML text.
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not a mapping.
        let config: Config = if text.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(text)
                .context("Failed to parse config.yaml - check YAML syntax and structure")?
        };
        config.validate().context("Invalid configuration values")?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_yaml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("{} not found, using built-in defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.server.port, 3010);
        assert_eq!(config.quotes.symbols, vec!["AAPL", "MSFT", "GOOGL", "NVDA"]);
        assert_eq!(config.quotes.poll_interval_secs, 60);
        assert!(config.http.request_timeout_secs.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config =
            Config::from_yaml("server:\n  port: 8080\nquotes:\n  symbols: [TSLA]\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.quotes.symbols, vec!["TSLA"]);
        assert_eq!(config.headline.origin.as_str(), "https://tldr.tech/");
    }

    #[test]
    fn empty_symbol_list_is_rejected() {
        let err = Config::from_yaml("quotes:\n  symbols: []\n").unwrap_err();
        assert!(format!("{:#}", err).contains("symbol"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(Config::from_yaml("quotes:\n  poll_interval_secs: 0\n").is_err());
    }

    #[test]
    fn headline_urls_resolve_against_site_root() {
        let headline = HeadlineConfig::default();
        assert_eq!(headline.api_url().unwrap().as_str(), "https://tldr.tech/api/latest/tech");
        assert_eq!(headline.feed_url().unwrap().as_str(), "https://tldr.tech/tech.rss");
        assert_eq!(headline.home_url().unwrap().as_str(), "https://tldr.tech/");
    }

    #[test]
    fn origin_path_is_ignored_when_joining() {
        let config = Config::from_yaml(
            "headline:\n  origin: \"https://example.com/tech\"\n  feed_path: \"feed.xml\"\n",
        )
        .unwrap();
        let headline = config.headline;
        assert_eq!(headline.api_url().unwrap().as_str(), "https://example.com/api/latest/tech");
        assert_eq!(headline.feed_url().unwrap().as_str(), "https://example.com/feed.xml");
        assert_eq!(headline.home_url().unwrap().as_str(), "https://example.com/");
    }

    #[test]
    fn non_web_urls_are_rejected() {
        assert!(Config::from_yaml("headline:\n  origin: \"ftp://tldr.tech\"\n").is_err());
        assert!(Config::from_yaml("quotes:\n  endpoint: \"mailto:a@b.c\"\n").is_err());
        assert!(Config::from_yaml("quotes:\n  endpoint: \"not a url\"\n").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load("/nonexistent/launchpad/config.yaml").unwrap();
        assert_eq!(config.server.allowed_origins, "*");
    }
}
