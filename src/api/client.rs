use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::core::UpstreamConfig;

/// The named requests the market endpoint understands. The wire value is the
/// `action` query parameter; the ledger key is [`MarketAction::feed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketAction {
    Overview,
    Quotes,
    Kline,
    Sectors,
    Events,
    Scanner,
    SwSectors,
}

impl MarketAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketAction::Overview => "overview",
            MarketAction::Quotes => "quotes",
            MarketAction::Kline => "kline",
            MarketAction::Sectors => "sectors",
            MarketAction::Events => "events",
            MarketAction::Scanner => "scanner",
            MarketAction::SwSectors => "swsectors",
        }
    }

    /// Ledger key for this action. Matches the wire value except for
    /// `swsectors`, which the status view spells `sw_sectors`.
    pub fn feed(&self) -> &'static str {
        match self {
            MarketAction::SwSectors => "sw_sectors",
            other => other.as_str(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned {0}")]
    Status(reqwest::StatusCode),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("malformed payload: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),
}

/// Seam between the feed operations and the real HTTP endpoint. Tests
/// substitute a scripted implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn fetch_market(
        &self,
        action: MarketAction,
        params: &[(String, String)],
    ) -> Result<Value, FetchError>;

    async fn fetch_strategy(&self) -> Result<Value, FetchError>;
}

pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("upstream {} returned {}", path, status);
            return Err(FetchError::Status(status));
        }

        let text = response.text().await?;
        parse_body(&text)
    }
}

/// Decode the response body and reject well-formed bodies that carry an
/// explicit error indicator, per the endpoint contract.
fn parse_body(text: &str) -> Result<Value, FetchError> {
    let body: Value = serde_json::from_str(text).map_err(FetchError::Parse)?;
    if let Some(err) = body.get("error") {
        let message = err
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(FetchError::Upstream(message));
    }
    Ok(body)
}

#[async_trait]
impl MarketSource for UpstreamClient {
    async fn fetch_market(
        &self,
        action: MarketAction,
        params: &[(String, String)],
    ) -> Result<Value, FetchError> {
        let mut query = vec![("action".to_string(), action.as_str().to_string())];
        query.extend_from_slice(params);
        self.get_json("market", &query).await
    }

    async fn fetch_strategy(&self) -> Result<Value, FetchError> {
        self.get_json("strategy", &[]).await
    }
}
