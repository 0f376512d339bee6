pub mod aggregator;
pub mod collector;
pub mod error;
pub mod feed;
pub mod parse;
pub(crate) mod retry;

pub use aggregator::CollectorAggregator;
pub use collector::{FallbackCollector, PlatformCollector};
pub use error::CollectorError;
pub use feed::FeedClient;
pub use parse::{is_listable_title, parse_heat, parse_heat_text};
