use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::api::types::*;
use crate::api::{FetchError, MarketAction, MarketSource};
use crate::feeds::fallback;
use crate::feeds::fetcher::{fetch_with_fallback, CrossValidated};
use crate::health::HealthMonitor;

/// Ledger key for the strategy feed, which lives on its own endpoint path
/// rather than behind a `market?action=` request.
pub const STRATEGY_FEED: &str = "strategy";

/// The named feed operations. Each attempts the live source under the
/// configured deadline and substitutes the synthetic payload on any failure,
/// reporting the outcome to the health monitor either way.
pub struct FeedService {
    source: Arc<dyn MarketSource>,
    monitor: HealthMonitor,
    deadline: Duration,
}

impl FeedService {
    pub fn new(source: Arc<dyn MarketSource>, monitor: HealthMonitor, deadline: Duration) -> Self {
        Self {
            source,
            monitor,
            deadline,
        }
    }

    pub fn monitor(&self) -> &HealthMonitor {
        &self.monitor
    }

    async fn market<T: DeserializeOwned>(
        &self,
        action: MarketAction,
        params: Vec<(String, String)>,
        fallback: T,
    ) -> CrossValidated<T> {
        let live = async {
            let body = self.source.fetch_market(action, &params).await?;
            serde_json::from_value(body).map_err(FetchError::Parse)
        };
        fetch_with_fallback(&self.monitor, action.feed(), self.deadline, live, fallback).await
    }

    pub async fn market_overview(&self) -> CrossValidated<MarketOverview> {
        self.market(MarketAction::Overview, Vec::new(), fallback::overview())
            .await
    }

    pub async fn quotes(&self, codes: Option<&[String]>) -> CrossValidated<Vec<Quote>> {
        let params = match codes {
            Some(codes) if !codes.is_empty() => {
                vec![("codes".to_string(), codes.join(","))]
            }
            _ => Vec::new(),
        };
        self.market(MarketAction::Quotes, params, fallback::quotes())
            .await
    }

    pub async fn market_events(&self) -> CrossValidated<Vec<MarketEvent>> {
        self.market(MarketAction::Events, Vec::new(), fallback::events())
            .await
    }

    pub async fn kline(&self, code: &str) -> CrossValidated<Vec<KlineBar>> {
        let params = vec![("code".to_string(), code.to_string())];
        self.market(MarketAction::Kline, params, fallback::kline(code))
            .await
    }

    pub async fn sector_flows(&self) -> CrossValidated<Vec<SectorFlow>> {
        self.market(MarketAction::Sectors, Vec::new(), fallback::sector_flows())
            .await
    }

    pub async fn scanner(&self) -> CrossValidated<Vec<ScannerEntry>> {
        self.market(MarketAction::Scanner, Vec::new(), fallback::scanner())
            .await
    }

    pub async fn sw_sectors(&self) -> CrossValidated<Vec<SwSector>> {
        self.market(MarketAction::SwSectors, Vec::new(), fallback::sw_sectors())
            .await
    }

    pub async fn strategy_signals(&self) -> CrossValidated<Vec<StrategySignal>> {
        let live = async {
            let body = self.source.fetch_strategy().await?;
            let decoded: StrategyResponse =
                serde_json::from_value(body).map_err(FetchError::Parse)?;
            // Zero open signals is a healthy answer, not a failure.
            Ok(decoded.signals)
        };
        fetch_with_fallback(
            &self.monitor,
            STRATEGY_FEED,
            self.deadline,
            live,
            fallback::strategy_signals(),
        )
        .await
    }
}
