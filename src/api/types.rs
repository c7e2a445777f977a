use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOverview {
    pub sentiment_index: f64,
    pub sentiment_label: String,
    pub hot_sector: String,
    pub hot_sector_change: f64,
    pub avg_win_rate: f64,
    pub avg_win_rate_change: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub code: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: f64,
    pub amount: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub prev_close: f64,
    pub turnover_rate: f64,
    pub pe: f64,
    pub pb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    BigOrder,
    LimitUpSeal,
    LimitDownSeal,
    VolumeSpike,
    BlockTrade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketEvent {
    pub id: String,
    pub time: String,
    pub stock_code: String,
    pub stock_name: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub description: String,
    pub amount: f64,
    pub impact: Impact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KlineBar {
    pub date: String,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
    pub sharpe_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorFlow {
    pub sector: String,
    pub net_inflow: f64,
    pub change_percent: f64,
    pub leading_stock: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannerEntry {
    pub code: String,
    pub name: String,
    pub value_score: f64,
    pub trigger_reason: String,
    pub price: f64,
    pub change_percent: f64,
    pub sector: String,
    pub rank: u32,
    pub prev_rank: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwSector {
    pub name: String,
    pub net_inflow: f64,
    pub change_percent: f64,
    pub leading_stock: String,
    pub stock_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSide {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategySignal {
    pub id: String,
    pub time: String,
    pub stock_code: String,
    pub stock_name: String,
    pub strategy: String,
    pub signal: SignalSide,
    pub confidence: f64,
    pub expected_return: f64,
    pub risk_level: RiskLevel,
    pub factors: Vec<String>,
}

/// The strategy endpoint wraps its signals instead of returning a bare array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyResponse {
    pub signals: Vec<StrategySignal>,
    pub count: usize,
}
