//! Synthetic substitutes served when the live source is unavailable. The
//! values are plausible but static; the kline series is generated from a
//! seeded walk so the same code always yields the same shape.

use chrono::Utc;

use crate::api::types::*;

struct StockSeed {
    code: &'static str,
    name: &'static str,
    sector: &'static str,
    price: f64,
}

const STOCKS: &[StockSeed] = &[
    StockSeed { code: "600519", name: "贵州茅台", sector: "食品饮料", price: 1680.00 },
    StockSeed { code: "601318", name: "中国平安", sector: "非银金融", price: 52.80 },
    StockSeed { code: "300750", name: "宁德时代", sector: "电力设备", price: 218.50 },
    StockSeed { code: "002594", name: "比亚迪", sector: "汽车", price: 285.00 },
    StockSeed { code: "688981", name: "中芯国际", sector: "电子", price: 78.60 },
    StockSeed { code: "000725", name: "京东方A", sector: "电子", price: 4.85 },
];

pub fn overview() -> MarketOverview {
    MarketOverview {
        sentiment_index: 72.5,
        sentiment_label: "偏多".to_string(),
        hot_sector: "人工智能".to_string(),
        hot_sector_change: 3.82,
        avg_win_rate: 58.3,
        avg_win_rate_change: 1.2,
    }
}

pub fn quotes() -> Vec<Quote> {
    STOCKS
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let change_percent = [1.25, 2.10, -1.80, 3.20, 4.15, 1.68][i];
            let change = s.price * change_percent / 100.0;
            Quote {
                code: s.code.to_string(),
                name: s.name.to_string(),
                price: s.price,
                change: round2(change),
                change_percent,
                volume: 1_200_000.0 + 400_000.0 * i as f64,
                amount: round2(s.price * (1_200_000.0 + 400_000.0 * i as f64)),
                high: round2(s.price * 1.02),
                low: round2(s.price * 0.97),
                open: round2(s.price * 0.99),
                prev_close: round2(s.price - change),
                turnover_rate: 1.8 + 0.4 * i as f64,
                pe: 18.5 + 3.0 * i as f64,
                pb: 2.1 + 0.3 * i as f64,
            }
        })
        .collect()
}

pub fn events() -> Vec<MarketEvent> {
    vec![
        MarketEvent {
            id: "o1".to_string(),
            time: "14:32:15".to_string(),
            stock_code: "688981".to_string(),
            stock_name: "中芯国际".to_string(),
            kind: EventKind::BigOrder,
            description: "主力大单净买入 2.3亿".to_string(),
            amount: 23000.0,
            impact: Impact::Positive,
        },
        MarketEvent {
            id: "o2".to_string(),
            time: "14:28:03".to_string(),
            stock_code: "002594".to_string(),
            stock_name: "比亚迪".to_string(),
            kind: EventKind::VolumeSpike,
            description: "成交量突增 380%，突破5日均量".to_string(),
            amount: 18500.0,
            impact: Impact::Positive,
        },
        MarketEvent {
            id: "o3".to_string(),
            time: "14:25:41".to_string(),
            stock_code: "300750".to_string(),
            stock_name: "宁德时代".to_string(),
            kind: EventKind::LimitDownSeal,
            description: "封单减少至 1.2亿，有开板迹象".to_string(),
            amount: 12000.0,
            impact: Impact::Negative,
        },
        MarketEvent {
            id: "o4".to_string(),
            time: "14:20:18".to_string(),
            stock_code: "600519".to_string(),
            stock_name: "贵州茅台".to_string(),
            kind: EventKind::BlockTrade,
            description: "大宗交易成交 5.8亿，折价 2.1%".to_string(),
            amount: 58000.0,
            impact: Impact::Neutral,
        },
    ]
}

pub fn sector_flows() -> Vec<SectorFlow> {
    vec![
        SectorFlow { sector: "人工智能".to_string(), net_inflow: 58.2, change_percent: 3.82, leading_stock: "中芯国际".to_string() },
        SectorFlow { sector: "电力设备".to_string(), net_inflow: -12.6, change_percent: -1.15, leading_stock: "宁德时代".to_string() },
        SectorFlow { sector: "食品饮料".to_string(), net_inflow: 21.4, change_percent: 0.92, leading_stock: "贵州茅台".to_string() },
        SectorFlow { sector: "汽车".to_string(), net_inflow: 34.8, change_percent: 2.47, leading_stock: "比亚迪".to_string() },
    ]
}

pub fn scanner() -> Vec<ScannerEntry> {
    vec![
        ScannerEntry {
            code: "688981".to_string(),
            name: "中芯国际".to_string(),
            value_score: 92.5,
            trigger_reason: "机构抢筹".to_string(),
            price: 78.60,
            change_percent: 4.15,
            sector: "电子".to_string(),
            rank: 1,
            prev_rank: Some(3),
        },
        ScannerEntry {
            code: "002594".to_string(),
            name: "比亚迪".to_string(),
            value_score: 88.1,
            trigger_reason: "放量突破".to_string(),
            price: 285.00,
            change_percent: 3.20,
            sector: "汽车".to_string(),
            rank: 2,
            prev_rank: Some(2),
        },
        ScannerEntry {
            code: "000725".to_string(),
            name: "京东方A".to_string(),
            value_score: 81.7,
            trigger_reason: "涨停板".to_string(),
            price: 4.85,
            change_percent: 1.68,
            sector: "电子".to_string(),
            rank: 3,
            prev_rank: None,
        },
    ]
}

pub fn sw_sectors() -> Vec<SwSector> {
    vec![
        SwSector { name: "电子".to_string(), net_inflow: 86.3, change_percent: 3.05, leading_stock: "中芯国际".to_string(), stock_count: 482 },
        SwSector { name: "食品饮料".to_string(), net_inflow: 19.7, change_percent: 0.84, leading_stock: "贵州茅台".to_string(), stock_count: 126 },
        SwSector { name: "汽车".to_string(), net_inflow: 42.1, change_percent: 2.36, leading_stock: "比亚迪".to_string(), stock_count: 241 },
        SwSector { name: "电力设备".to_string(), net_inflow: -8.9, change_percent: -0.62, leading_stock: "宁德时代".to_string(), stock_count: 318 },
    ]
}

pub fn strategy_signals() -> Vec<StrategySignal> {
    vec![
        StrategySignal {
            id: "s1".to_string(),
            time: "14:30:00".to_string(),
            stock_code: "688981".to_string(),
            stock_name: "中芯国际".to_string(),
            strategy: "multi_factor".to_string(),
            signal: SignalSide::Buy,
            confidence: 0.85,
            expected_return: 8.2,
            risk_level: RiskLevel::High,
            factors: vec!["动量因子突破".to_string(), "资金流入加速".to_string()],
        },
        StrategySignal {
            id: "s2".to_string(),
            time: "14:28:00".to_string(),
            stock_code: "600519".to_string(),
            stock_name: "贵州茅台".to_string(),
            strategy: "dividend_low_vol".to_string(),
            signal: SignalSide::Hold,
            confidence: 0.92,
            expected_return: 3.5,
            risk_level: RiskLevel::Low,
            factors: vec!["股息率>2.5%".to_string(), "波动率历史低位".to_string()],
        },
        StrategySignal {
            id: "s3".to_string(),
            time: "14:25:00".to_string(),
            stock_code: "000725".to_string(),
            stock_name: "京东方A".to_string(),
            strategy: "t_plus_0".to_string(),
            signal: SignalSide::Buy,
            confidence: 0.78,
            expected_return: 1.2,
            risk_level: RiskLevel::Medium,
            factors: vec!["日内振幅>5%".to_string(), "支撑位确认".to_string()],
        },
    ]
}

const DEFAULT_KLINE_SEED: u64 = 688_981;
const KLINE_DAYS: i64 = 30;

/// 31-bit multiplicative congruential generator. Seeded with the stock code
/// so the same code produces the same series on every call.
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        let seed = seed % 2_147_483_647;
        Self(if seed == 0 { DEFAULT_KLINE_SEED } else { seed })
    }

    fn next_f64(&mut self) -> f64 {
        self.0 = (self.0 * 16_807) % 2_147_483_647;
        self.0 as f64 / 2_147_483_647.0
    }
}

pub fn kline(code: &str) -> Vec<KlineBar> {
    let base_price = STOCKS
        .iter()
        .find(|s| s.code == code)
        .map(|s| s.price)
        .unwrap_or(78.6);
    let mut rng = Lcg::new(code.parse::<u64>().unwrap_or(DEFAULT_KLINE_SEED));

    let swing = base_price * 0.08;
    let today = Utc::now().date_naive();
    let mut close = base_price;
    let mut bars = Vec::with_capacity(KLINE_DAYS as usize);

    for back in (0..KLINE_DAYS).rev() {
        let date = today - chrono::Duration::days(back);
        let open = close;
        let drift = (rng.next_f64() - 0.5) * swing;
        close = (open + drift).clamp(base_price - swing, base_price + swing);
        let high = open.max(close) + rng.next_f64() * swing * 0.25;
        let low = (open.min(close) - rng.next_f64() * swing * 0.25).max(0.01);
        let volume = (80_000.0 + rng.next_f64() * 220_000.0).round();
        let sharpe_ratio = round2(-0.5 + rng.next_f64() * 2.5);

        bars.push(KlineBar {
            date: date.format("%Y-%m-%d").to_string(),
            open: round2(open),
            close: round2(close),
            high: round2(high),
            low: round2(low),
            volume,
            sharpe_ratio,
        });
    }

    bars
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
