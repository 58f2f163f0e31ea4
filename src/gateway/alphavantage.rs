//! AlphaVantage gateway adapter
//!
//! Real-data backend. Credentials and endpoint come in through an explicit
//! config at construction time; the adapter never reads the process
//! environment. Free-tier throttle replies ("Information"/"Note" bodies)
//! map to `RateLimited`, empty result objects to `NotFound`, everything
//! else transport-shaped to `Transport`.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::GatewayError;
use crate::models::{
    NewsArticle, OverviewData, QuoteData, RsiRequest, SentimentData, TechnicalData,
};

use super::MarketDataGateway;

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Explicit adapter configuration; the adapter holds no global state.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// AlphaVantage-backed gateway.
pub struct AlphaVantageGateway {
    client: Client,
    config: GatewayConfig,
}

impl AlphaVantageGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, config }
    }

    async fn get_json(&self, function: &str, params: &[(&str, &str)]) -> Result<Value, GatewayError> {
        let mut url = format!(
            "{}?function={}&apikey={}",
            self.config.base_url, function, self.config.api_key
        );
        for (key, value) in params {
            url.push_str(&format!("&{}={}", key, value));
        }

        info!("AlphaVantage request: function={}", function);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::transport(format!("alphavantage request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GatewayError::transport(format!(
                "alphavantage returned status {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::transport(format!("alphavantage body was not JSON: {}", e)))?;

        // Free-tier throttling comes back as 200 + an informational body
        if body.get("Information").is_some() || body.get("Note").is_some() {
            warn!("AlphaVantage rate limit reply for function={}", function);
            return Err(GatewayError::RateLimited { retry_after: None });
        }

        if body.get("Error Message").is_some() {
            return Err(GatewayError::NotFound);
        }

        Ok(body)
    }
}

#[async_trait::async_trait]
impl MarketDataGateway for AlphaVantageGateway {
    fn source_name(&self) -> &'static str {
        "AlphaVantage API"
    }

    async fn quote(&self, symbol: &str) -> Result<QuoteData, GatewayError> {
        let body = self.get_json("GLOBAL_QUOTE", &[("symbol", symbol)]).await?;

        let response: GlobalQuoteResponse = serde_json::from_value(body)
            .map_err(|e| GatewayError::transport(format!("unexpected quote shape: {}", e)))?;

        match response.quote {
            Some(raw) if raw.symbol.is_some() => Ok(raw.into()),
            // AlphaVantage answers unknown symbols with an empty object
            _ => Err(GatewayError::NotFound),
        }
    }

    async fn company_overview(&self, symbol: &str) -> Result<OverviewData, GatewayError> {
        let body = self.get_json("OVERVIEW", &[("symbol", symbol)]).await?;

        let raw: RawOverview = serde_json::from_value(body)
            .map_err(|e| GatewayError::transport(format!("unexpected overview shape: {}", e)))?;

        if raw.symbol.is_none() {
            return Err(GatewayError::NotFound);
        }
        Ok(raw.into())
    }

    async fn rsi(
        &self,
        symbol: &str,
        request: &RsiRequest,
    ) -> Result<TechnicalData, GatewayError> {
        let period = request.time_period.to_string();
        let body = self
            .get_json(
                "RSI",
                &[
                    ("symbol", symbol),
                    ("interval", &request.interval),
                    ("time_period", &period),
                    ("series_type", &request.series_type),
                ],
            )
            .await?;

        let series = body
            .get("Technical Analysis: RSI")
            .and_then(Value::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|(date, values)| {
                        let rsi = values.get("RSI").and_then(Value::as_str)?;
                        Some((date.clone(), rsi.to_string()))
                    })
                    .collect::<BTreeMap<_, _>>()
            })
            .unwrap_or_default();

        Ok(TechnicalData {
            indicator: "RSI".to_string(),
            series,
        })
    }

    async fn news_sentiment(&self, symbol: &str) -> Result<SentimentData, GatewayError> {
        let body = self
            .get_json("NEWS_SENTIMENT", &[("tickers", symbol)])
            .await?;

        let response: NewsSentimentResponse = serde_json::from_value(body)
            .map_err(|e| GatewayError::transport(format!("unexpected sentiment shape: {}", e)))?;

        let articles = response
            .feed
            .into_iter()
            .map(|raw| NewsArticle {
                title: raw.title,
                source: raw.source,
                sentiment_label: raw.overall_sentiment_label,
                sentiment_score: raw.overall_sentiment_score.map(|s| s.to_string()),
            })
            .collect();

        Ok(SentimentData { articles })
    }
}

// AlphaVantage response structures (numbered field names)

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote", default)]
    quote: Option<RawGlobalQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct RawGlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "02. open")]
    open: Option<String>,
    #[serde(rename = "03. high")]
    high: Option<String>,
    #[serde(rename = "04. low")]
    low: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
    #[serde(rename = "07. latest trading day")]
    trading_day: Option<String>,
    #[serde(rename = "08. previous close")]
    previous_close: Option<String>,
    #[serde(rename = "09. change")]
    change: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

impl From<RawGlobalQuote> for QuoteData {
    fn from(raw: RawGlobalQuote) -> Self {
        QuoteData {
            symbol: raw.symbol,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            price: raw.price,
            volume: raw.volume,
            trading_day: raw.trading_day,
            previous_close: raw.previous_close,
            change: raw.change,
            change_percent: raw.change_percent,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawOverview {
    #[serde(rename = "Symbol")]
    symbol: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Sector")]
    sector: Option<String>,
    #[serde(rename = "Industry")]
    industry: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "Currency")]
    currency: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    market_cap: Option<String>,
    #[serde(rename = "PERatio")]
    pe_ratio: Option<String>,
    #[serde(rename = "PEGRatio")]
    peg_ratio: Option<String>,
    #[serde(rename = "DividendYield")]
    dividend_yield: Option<String>,
    #[serde(rename = "52WeekHigh")]
    week52_high: Option<String>,
    #[serde(rename = "52WeekLow")]
    week52_low: Option<String>,
    #[serde(rename = "50DayMovingAverage")]
    day50_avg: Option<String>,
    #[serde(rename = "200DayMovingAverage")]
    day200_avg: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
}

impl From<RawOverview> for OverviewData {
    fn from(raw: RawOverview) -> Self {
        OverviewData {
            symbol: raw.symbol,
            name: raw.name,
            sector: raw.sector,
            industry: raw.industry,
            country: raw.country,
            currency: raw.currency,
            market_cap: raw.market_cap,
            pe_ratio: raw.pe_ratio,
            peg_ratio: raw.peg_ratio,
            dividend_yield: raw.dividend_yield,
            week52_high: raw.week52_high,
            week52_low: raw.week52_low,
            day50_avg: raw.day50_avg,
            day200_avg: raw.day200_avg,
            description: raw.description,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NewsSentimentResponse {
    #[serde(default)]
    feed: Vec<RawArticle>,
}

#[derive(Debug, Default, Deserialize)]
struct RawArticle {
    title: Option<String>,
    source: Option<String>,
    overall_sentiment_label: Option<String>,
    overall_sentiment_score: Option<f64>,
}
