//! Core entities shared by the resolver, the poller and the HTTP layer.

pub mod fetcher;
pub mod headline;
pub mod quote;

pub use fetcher::{FetchRequest, FetchResponse, SourceFetcher};
pub use headline::{Headline, HeadlineSource};
pub use quote::{Direction, Quote};
