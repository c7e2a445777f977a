pub mod client;
pub mod types;

pub use client::{FetchError, MarketAction, MarketSource, UpstreamClient};
pub use types::*;
