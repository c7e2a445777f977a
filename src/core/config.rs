use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub upstream: UpstreamConfig,
    pub polling: PollingConfig,
    pub health: HealthConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    pub overview_secs: u64,
    pub quotes_secs: u64,
    pub events_secs: u64,
    pub kline_secs: u64,
    pub sectors_secs: u64,
    pub scanner_secs: u64,
    pub sw_sectors_secs: u64,
    pub strategy_secs: u64,
    pub watch_codes: Vec<String>,
    pub kline_code: String,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            overview_secs: 30,
            quotes_secs: 10,
            events_secs: 15,
            kline_secs: 60,
            sectors_secs: 30,
            scanner_secs: 15,
            sw_sectors_secs: 30,
            strategy_secs: 30,
            watch_codes: vec![
                "600519".to_string(),
                "300750".to_string(),
                "601318".to_string(),
            ],
            kline_code: "688981".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    pub warmup_grace_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub status_port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let defaults = PollingConfig::default();

        Ok(Config {
            upstream: UpstreamConfig {
                base_url: env::var("FEED_BASE_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:8000/api".to_string()),
                request_timeout_secs: env_u64("FEED_TIMEOUT_SECS", 12),
            },
            polling: PollingConfig {
                overview_secs: env_u64("OVERVIEW_POLL_SECS", defaults.overview_secs),
                quotes_secs: env_u64("QUOTES_POLL_SECS", defaults.quotes_secs),
                events_secs: env_u64("EVENTS_POLL_SECS", defaults.events_secs),
                kline_secs: env_u64("KLINE_POLL_SECS", defaults.kline_secs),
                sectors_secs: env_u64("SECTORS_POLL_SECS", defaults.sectors_secs),
                scanner_secs: env_u64("SCANNER_POLL_SECS", defaults.scanner_secs),
                sw_sectors_secs: env_u64("SW_SECTORS_POLL_SECS", defaults.sw_sectors_secs),
                strategy_secs: env_u64("STRATEGY_POLL_SECS", defaults.strategy_secs),
                watch_codes: env::var("WATCH_CODES")
                    .map(|raw| parse_codes(&raw))
                    .unwrap_or(defaults.watch_codes),
                kline_code: env::var("KLINE_CODE").unwrap_or(defaults.kline_code),
            },
            health: HealthConfig {
                warmup_grace_secs: env_u64("WARMUP_GRACE_SECS", 21),
            },
            monitoring: MonitoringConfig {
                status_port: env::var("STATUS_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(9100),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
        })
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_codes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
        .collect()
}
