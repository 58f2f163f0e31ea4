//! Market data gateway trait and adapters
//!
//! The pipeline consumes market data through this boundary; it never talks
//! to a provider directly. One operation per intent, each returning a typed
//! payload or a typed failure. Retry/backoff policy, if any, belongs to the
//! adapter behind the trait, not to the pipeline.

pub mod alphavantage;
pub mod demo;

pub use alphavantage::{AlphaVantageGateway, GatewayConfig};
pub use demo::DemoGateway;

use crate::error::GatewayError;
use crate::models::{
    Intent, MarketPayload, OverviewData, QuoteData, RsiRequest, SentimentData, TechnicalData,
};

/// External collaborator interface for market data.
#[async_trait::async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Label surfaced in report footers; demo adapters must identify
    /// themselves here so synthetic data is always visible.
    fn source_name(&self) -> &'static str;

    async fn quote(&self, symbol: &str) -> Result<QuoteData, GatewayError>;

    async fn company_overview(&self, symbol: &str) -> Result<OverviewData, GatewayError>;

    async fn rsi(&self, symbol: &str, request: &RsiRequest)
        -> Result<TechnicalData, GatewayError>;

    async fn news_sentiment(&self, symbol: &str) -> Result<SentimentData, GatewayError>;

    /// Dispatch one fetch by intent.
    async fn fetch(&self, intent: Intent, symbol: &str) -> Result<MarketPayload, GatewayError> {
        match intent {
            Intent::Quote => self.quote(symbol).await.map(MarketPayload::Quote),
            Intent::Overview => self
                .company_overview(symbol)
                .await
                .map(MarketPayload::Overview),
            Intent::Technical => self
                .rsi(symbol, &RsiRequest::default())
                .await
                .map(MarketPayload::Technical),
            Intent::Sentiment => self
                .news_sentiment(symbol)
                .await
                .map(MarketPayload::Sentiment),
        }
    }
}
