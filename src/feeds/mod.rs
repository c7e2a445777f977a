pub mod fallback;
pub mod fetcher;
pub mod scheduler;
pub mod service;

pub use fetcher::{
    fetch_with_fallback, CrossValidated, SourceId, FALLBACK_CONFIDENCE, LIVE_CONFIDENCE,
};
pub use scheduler::{FeedCache, FeedScheduler};
pub use service::{FeedService, STRATEGY_FEED};
