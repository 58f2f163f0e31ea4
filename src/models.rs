//! Core data models for the chatbot pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::GatewayError;

//
// ================= Intent =================
//

/// Coarse category of a user query. Closed set; wire names match the
/// upstream classifier vocabulary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Intent {
    #[serde(rename = "stock_quote")]
    Quote,
    #[serde(rename = "company_overview")]
    Overview,
    #[serde(rename = "technical_analysis")]
    Technical,
    #[serde(rename = "market_sentiment")]
    Sentiment,
}

impl Intent {
    /// Parse the wire name used by the remote classifier.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "stock_quote" => Some(Intent::Quote),
            "company_overview" => Some(Intent::Overview),
            "technical_analysis" => Some(Intent::Technical),
            "market_sentiment" => Some(Intent::Sentiment),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Intent::Quote => "stock_quote",
            Intent::Overview => "company_overview",
            Intent::Technical => "technical_analysis",
            Intent::Sentiment => "market_sentiment",
        };
        write!(f, "{}", s)
    }
}

//
// ================= Classification =================
//

/// Result of one classification pass. Produced once per query, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent: Intent,
    /// Always in [0, 1]; remote values are clamped by the caller.
    pub confidence: f32,
    /// 2-5 uppercase letters.
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

//
// ================= Market Payloads =================
//

/// Raw quote fields as the provider returns them. Everything stays a string
/// until the formatter's safe-parse step; missing fields are `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteData {
    pub symbol: Option<String>,
    pub open: Option<String>,
    pub high: Option<String>,
    pub low: Option<String>,
    pub price: Option<String>,
    pub volume: Option<String>,
    pub trading_day: Option<String>,
    pub previous_close: Option<String>,
    pub change: Option<String>,
    pub change_percent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverviewData {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub market_cap: Option<String>,
    pub pe_ratio: Option<String>,
    pub peg_ratio: Option<String>,
    pub dividend_yield: Option<String>,
    pub week52_high: Option<String>,
    pub week52_low: Option<String>,
    pub day50_avg: Option<String>,
    pub day200_avg: Option<String>,
    pub description: Option<String>,
}

/// Fixed sub-parameters for the technical-indicator fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiRequest {
    pub interval: String,
    pub time_period: u32,
    pub series_type: String,
}

impl Default for RsiRequest {
    fn default() -> Self {
        Self {
            interval: "daily".to_string(),
            time_period: 14,
            series_type: "close".to_string(),
        }
    }
}

/// Indicator series keyed by date. The formatter currently renders a fixed
/// explanation and leaves the series untouched; the data is kept so that a
/// numeric rendering stays a local change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalData {
    pub indicator: String,
    pub series: std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: Option<String>,
    pub source: Option<String>,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentimentData {
    pub articles: Vec<NewsArticle>,
}

/// Tagged union over the four intents plus the collaborator failure.
///
/// The `Unavailable` variant makes the formatter total: every gateway
/// outcome, success or failure, has exactly one rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPayload {
    Quote(QuoteData),
    Overview(OverviewData),
    Technical(TechnicalData),
    Sentiment(SentimentData),
    Unavailable(GatewayError),
}

//
// ================= Session =================
//

/// One completed pipeline turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub turn_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub report: String,
    pub intent: Intent,
}

impl ConversationTurn {
    pub fn new(query: String, report: String, intent: Intent) -> Self {
        Self {
            turn_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            query,
            report,
            intent,
        }
    }
}

/// Aggregate usage counters for one session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SessionStats {
    pub conversation_count: usize,
    pub calls_made: u64,
    pub tokens_used: u64,
    pub estimated_cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_wire_names_round_trip() {
        for intent in [
            Intent::Quote,
            Intent::Overview,
            Intent::Technical,
            Intent::Sentiment,
        ] {
            assert_eq!(Intent::from_wire(&intent.to_string()), Some(intent));
        }
        assert_eq!(Intent::from_wire("portfolio_rebalance"), None);
    }

    #[test]
    fn test_payload_serialization_is_tagged() {
        let payload = MarketPayload::Quote(QuoteData {
            price: Some("150.25".to_string()),
            ..Default::default()
        });
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"quote\""));
    }
}
