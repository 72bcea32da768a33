pub mod extract;
pub mod headline_resolver;
pub mod quote_poller;
pub mod snippets;

pub use headline_resolver::HeadlineResolver;
pub use quote_poller::{PollerHandle, QuotePoller, TickerFeed, TickerView};
