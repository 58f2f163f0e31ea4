//! Demo gateway adapter
//!
//! Synthetic-data backend for development and for rate-limited demo runs.
//! Selected explicitly by configuration and labeled through
//! `source_name()`, so demo data is always visible in the report footer —
//! it is never mixed silently into the real-data path.
//!
//! Payloads are seeded from the symbol so tests and demos are
//! reproducible.

use std::collections::BTreeMap;

use crate::error::GatewayError;
use crate::models::{
    NewsArticle, OverviewData, QuoteData, RsiRequest, SentimentData, TechnicalData,
};

use super::MarketDataGateway;

/// Known company profiles; anything else gets a generic one.
const COMPANY_CATALOG: &[(&str, &str, &str, &str)] = &[
    ("TSLA", "Tesla Inc", "Consumer Discretionary", "Auto Manufacturers"),
    ("AAPL", "Apple Inc", "Technology", "Consumer Electronics"),
    ("NVDA", "NVIDIA Corporation", "Technology", "Semiconductors"),
    ("META", "Meta Platforms Inc", "Communication Services", "Internet Content & Information"),
    ("MSFT", "Microsoft Corporation", "Technology", "Software"),
];

/// Deterministic synthetic-data gateway.
#[derive(Debug, Clone, Default)]
pub struct DemoGateway;

impl DemoGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl MarketDataGateway for DemoGateway {
    fn source_name(&self) -> &'static str {
        "Demo Data (합성 데이터)"
    }

    async fn quote(&self, symbol: &str) -> Result<QuoteData, GatewayError> {
        let seed = symbol_seed(symbol);
        let price = 100.0 + (seed % 4000) as f64 / 10.0;
        let change = ((seed % 200) as f64 - 100.0) / 10.0;
        let change_percent = change / price * 100.0;
        let volume = 1_000_000 + seed % 49_000_000;

        Ok(QuoteData {
            symbol: Some(symbol.to_string()),
            open: Some(format!("{:.2}", price - change / 2.0)),
            high: Some(format!("{:.2}", price + 5.0)),
            low: Some(format!("{:.2}", price - 5.0)),
            price: Some(format!("{:.2}", price)),
            volume: Some(volume.to_string()),
            trading_day: Some("2024-12-19".to_string()),
            previous_close: Some(format!("{:.2}", price - change)),
            change: Some(format!("{:.2}", change)),
            change_percent: Some(format!("{:.2}%", change_percent)),
        })
    }

    async fn company_overview(&self, symbol: &str) -> Result<OverviewData, GatewayError> {
        let (name, sector, industry) = COMPANY_CATALOG
            .iter()
            .find(|(sym, ..)| *sym == symbol)
            .map(|(_, name, sector, industry)| {
                (name.to_string(), sector.to_string(), industry.to_string())
            })
            .unwrap_or_else(|| {
                (
                    format!("{} Corporation", symbol),
                    "Technology".to_string(),
                    "Software".to_string(),
                )
            });

        let description = format!(
            "{}는 {} 섹터의 선도적인 기업으로, {} 분야에서 혁신적인 제품과 서비스를 \
             제공합니다. 전 세계적으로 인정받는 브랜드로서 지속적인 성장과 발전을 \
             이어가고 있습니다.",
            name, sector, industry
        );

        Ok(OverviewData {
            symbol: Some(symbol.to_string()),
            name: Some(name),
            sector: Some(sector),
            industry: Some(industry),
            country: Some("USA".to_string()),
            currency: Some("USD".to_string()),
            market_cap: Some("800000000000".to_string()),
            pe_ratio: Some("25.5".to_string()),
            peg_ratio: Some("2.1".to_string()),
            dividend_yield: Some("0.015".to_string()),
            week52_high: Some("450.00".to_string()),
            week52_low: Some("150.00".to_string()),
            day50_avg: Some("280.50".to_string()),
            day200_avg: Some("250.75".to_string()),
            description: Some(description),
        })
    }

    async fn rsi(
        &self,
        symbol: &str,
        request: &RsiRequest,
    ) -> Result<TechnicalData, GatewayError> {
        let seed = symbol_seed(symbol);
        let mut series = BTreeMap::new();
        for day in 1..=request.time_period.min(14) {
            let rsi = 30.0 + ((seed + day as u64 * 7) % 400) as f64 / 10.0;
            series.insert(format!("2024-12-{:02}", day), format!("{:.4}", rsi));
        }

        Ok(TechnicalData {
            indicator: "RSI".to_string(),
            series,
        })
    }

    async fn news_sentiment(&self, symbol: &str) -> Result<SentimentData, GatewayError> {
        let seed = symbol_seed(symbol);
        let labels = ["Bullish", "Neutral", "Bearish"];

        let articles = (0..5u64)
            .map(|i| {
                let label = labels[((seed + i) % 3) as usize];
                NewsArticle {
                    title: Some(format!("{} 관련 시장 동향 리포트 #{}", symbol, i + 1)),
                    source: Some("Demo Newswire".to_string()),
                    sentiment_label: Some(label.to_string()),
                    sentiment_score: Some(format!(
                        "{:.4}",
                        ((seed + i * 13) % 100) as f64 / 100.0 - 0.5
                    )),
                }
            })
            .collect();

        Ok(SentimentData { articles })
    }
}

fn symbol_seed(symbol: &str) -> u64 {
    symbol.bytes().fold(11_u64, |acc, byte| {
        acc.wrapping_mul(31).wrapping_add(byte as u64)
    })
}
