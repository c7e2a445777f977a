use futures::future;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::api::MarketAction;
use crate::core::PollingConfig;
use crate::feeds::fetcher::CrossValidated;
use crate::feeds::service::{FeedService, STRATEGY_FEED};

/// Latest cross-validated value per feed, as served by the status endpoint.
pub type FeedCache = Arc<RwLock<HashMap<String, Value>>>;

/// Drives every feed at its own cadence. The health core does not depend on
/// this; it reacts to whatever rhythm the owner of the scheduler picks.
pub struct FeedScheduler {
    cache: FeedCache,
    handles: Vec<JoinHandle<()>>,
}

impl FeedScheduler {
    pub fn start(service: Arc<FeedService>, config: &PollingConfig) -> Self {
        let cache: FeedCache = Arc::new(RwLock::new(HashMap::new()));
        let mut handles = Vec::new();

        let svc = service.clone();
        handles.push(spawn_poller(
            MarketAction::Overview.feed(),
            config.overview_secs,
            cache.clone(),
            move || {
                let svc = svc.clone();
                async move { cache_entry(&svc.market_overview().await) }
            },
        ));

        let svc = service.clone();
        let codes = config.watch_codes.clone();
        handles.push(spawn_poller(
            MarketAction::Quotes.feed(),
            config.quotes_secs,
            cache.clone(),
            move || {
                let svc = svc.clone();
                let codes = codes.clone();
                async move {
                    let codes = (!codes.is_empty()).then_some(codes.as_slice());
                    cache_entry(&svc.quotes(codes).await)
                }
            },
        ));

        let svc = service.clone();
        handles.push(spawn_poller(
            MarketAction::Events.feed(),
            config.events_secs,
            cache.clone(),
            move || {
                let svc = svc.clone();
                async move { cache_entry(&svc.market_events().await) }
            },
        ));

        let svc = service.clone();
        let code = config.kline_code.clone();
        handles.push(spawn_poller(
            MarketAction::Kline.feed(),
            config.kline_secs,
            cache.clone(),
            move || {
                let svc = svc.clone();
                let code = code.clone();
                async move { cache_entry(&svc.kline(&code).await) }
            },
        ));

        let svc = service.clone();
        handles.push(spawn_poller(
            MarketAction::Sectors.feed(),
            config.sectors_secs,
            cache.clone(),
            move || {
                let svc = svc.clone();
                async move { cache_entry(&svc.sector_flows().await) }
            },
        ));

        let svc = service.clone();
        handles.push(spawn_poller(
            MarketAction::Scanner.feed(),
            config.scanner_secs,
            cache.clone(),
            move || {
                let svc = svc.clone();
                async move { cache_entry(&svc.scanner().await) }
            },
        ));

        let svc = service.clone();
        handles.push(spawn_poller(
            MarketAction::SwSectors.feed(),
            config.sw_sectors_secs,
            cache.clone(),
            move || {
                let svc = svc.clone();
                async move { cache_entry(&svc.sw_sectors().await) }
            },
        ));

        let svc = service;
        handles.push(spawn_poller(
            STRATEGY_FEED,
            config.strategy_secs,
            cache.clone(),
            move || {
                let svc = svc.clone();
                async move { cache_entry(&svc.strategy_signals().await) }
            },
        ));

        tracing::info!("📡 {} feed pollers started", handles.len());
        Self { cache, handles }
    }

    pub fn cache(&self) -> FeedCache {
        self.cache.clone()
    }

    /// Abort every poller and wait for them to wind down.
    pub async fn shutdown(self) {
        for handle in &self.handles {
            handle.abort();
        }
        let _ = future::join_all(self.handles).await;
        tracing::info!("feed pollers stopped");
    }
}

fn spawn_poller<F, Fut>(
    feed: &'static str,
    period_secs: u64,
    cache: FeedCache,
    op: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Value> + Send,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(period_secs.max(1)));
        loop {
            ticker.tick().await;
            let value = op().await;
            cache.write().await.insert(feed.to_string(), value);
        }
    })
}

fn cache_entry<T: serde::Serialize>(result: &CrossValidated<T>) -> Value {
    serde_json::to_value(result).unwrap_or(Value::Null)
}
