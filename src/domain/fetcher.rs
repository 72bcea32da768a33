//! The seam between the application layer and the network.

use async_trait::async_trait;
use url::Url;

/// A single outbound GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: Url,
    /// Value for the `Accept` header, if any.
    pub accept: Option<&'static str>,
}

impl FetchRequest {
    pub fn get(url: Url) -> Self {
        Self {
            url,
            accept: None,
        }
    }

    pub fn accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }
}

/// Status and body text of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs outbound requests for the resolver and the poller.
///
/// `Err` means the request never produced a response (DNS, connect, body
/// read). Non-2xx statuses are returned as-is for the caller to judge.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> anyhow::Result<FetchResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_2xx_only() {
        let ok = FetchResponse {
            status: 204,
            body: String::new(),
        };
        let redirect = FetchResponse {
            status: 301,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }

    #[test]
    fn builder_sets_accept() {
        let url = Url::parse("https://tldr.tech/").unwrap();
        let req = FetchRequest::get(url).accept("application/json");
        assert_eq!(req.accept, Some("application/json"));
    }
}
