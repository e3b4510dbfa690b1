//! Market data collaborators
//!
//! Thin HTTP clients behind the agent tools. All public snapshot methods
//! degrade: on any upstream failure they log a warning and return an
//! empty/default snapshot instead of propagating the error, so a single
//! flaky provider never kills an analysis run.

pub mod indices;
pub mod market;
pub mod news;

pub use indices::{FearGreed, IndexQuote, MarketClient, MarketSnapshot};
pub use market::{FundamentalSnapshot, MarketDataClient, TechnicalSnapshot};
pub use news::{Headline, NewsClient, NewsDigest};
