//! Intent Classifier
//!
//! Maps a free-text query to one of the four market-data intents:
//! - stock_quote: 현재가/시세 조회
//! - company_overview: 회사 정보/재무지표
//! - technical_analysis: RSI 등 기술적 지표
//! - market_sentiment: 뉴스/감정 분석
//!
//! The remote LLM path is optional and single-attempt; any failure falls
//! back to the deterministic keyword rules, so classification never fails.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::extractor::{is_valid_symbol, SymbolExtractor};
use crate::gemini::GeminiClient;
use crate::models::{ClassificationResult, Intent};

/// Static keyword lists — zero allocation. Checked in order; first
/// matching category wins.
const QUOTE_KEYWORDS: &[&str] = &["현재가", "시세", "가격", "quote", "price", "주가"];

const OVERVIEW_KEYWORDS: &[&str] = &["회사", "정보", "개요", "overview", "company", "기업"];

const TECHNICAL_KEYWORDS: &[&str] = &["rsi", "macd", "sma", "기술적", "지표", "분석"];

const SENTIMENT_KEYWORDS: &[&str] = &["뉴스", "감정", "sentiment", "news", "시장", "동향"];

/// Confidence for a keyword hit on the rule path.
const RULE_CONFIDENCE: f32 = 0.85;
/// Confidence when no rule matches and we default to a quote lookup.
const DEFAULT_CONFIDENCE: f32 = 0.8;

/// Intent classifier: optional remote path plus the rule fallback.
pub struct IntentClassifier {
    llm: Option<Arc<GeminiClient>>,
    extractor: SymbolExtractor,
}

impl IntentClassifier {
    pub fn new(llm: Option<Arc<GeminiClient>>, extractor: SymbolExtractor) -> Self {
        Self { llm, extractor }
    }

    /// Rule-only classifier, for configurations with the remote path off.
    pub fn rule_based(extractor: SymbolExtractor) -> Self {
        Self {
            llm: None,
            extractor,
        }
    }

    /// Classify a query. Returns the result plus the LLM tokens consumed
    /// (zero on the rule path). Total: every input produces a result.
    pub async fn classify(&self, query: &str) -> (ClassificationResult, u64) {
        if let Some(llm) = &self.llm {
            match llm.classify(query).await {
                Ok(reply) => {
                    if let Some(result) = self.parse_remote_reply(&reply.text, query) {
                        info!(
                            intent = %result.intent,
                            confidence = result.confidence,
                            symbol = %result.symbol,
                            "Remote classification succeeded"
                        );
                        return (result, reply.tokens_used);
                    }
                    warn!("Remote classifier reply was not decodable, using rule fallback");
                    return (self.rule_classify(query), reply.tokens_used);
                }
                Err(e) => {
                    warn!("Remote classifier failed: {}, using rule fallback", e);
                }
            }
        }

        (self.rule_classify(query), 0)
    }

    /// Deterministic keyword classification. Never fails.
    pub fn rule_classify(&self, query: &str) -> ClassificationResult {
        let lower = query.to_lowercase();

        let (intent, confidence) = if QUOTE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            (Intent::Quote, RULE_CONFIDENCE)
        } else if OVERVIEW_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            (Intent::Overview, RULE_CONFIDENCE)
        } else if TECHNICAL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            (Intent::Technical, RULE_CONFIDENCE)
        } else if SENTIMENT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            (Intent::Sentiment, RULE_CONFIDENCE)
        } else {
            (Intent::Quote, DEFAULT_CONFIDENCE)
        };

        ClassificationResult {
            intent,
            confidence,
            symbol: self.extractor.extract(query),
            reasoning: Some("규칙 기반 폴백".to_string()),
        }
    }

    /// Decode the remote reply: take the substring between the first `{`
    /// and the last `}` and parse it as the structured shape. Any miss
    /// (no braces, bad JSON, unknown intent) returns None and the caller
    /// falls back to the rules.
    fn parse_remote_reply(&self, reply: &str, query: &str) -> Option<ClassificationResult> {
        let start = reply.find('{')?;
        let end = reply.rfind('}')?;
        if end < start {
            return None;
        }

        let decoded: RemoteIntentReply = serde_json::from_str(&reply[start..=end]).ok()?;
        let intent = Intent::from_wire(&decoded.intent)?;

        let symbol = match decoded.symbol {
            Some(candidate) if is_valid_symbol(&candidate) => candidate,
            _ => self.extractor.extract(query),
        };

        Some(ClassificationResult {
            intent,
            confidence: decoded.confidence.clamp(0.0, 1.0),
            symbol,
            reasoning: decoded.reasoning,
        })
    }
}

/// Structured reply shape required from the remote classifier.
#[derive(Debug, Deserialize)]
struct RemoteIntentReply {
    intent: String,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
}
