//! Conversation session
//!
//! Owns one caller's transcript and usage counters and runs the pipeline
//! end to end: classify → fetch → format → optional polish → append.
//! Sessions are independent values with single-writer discipline; nothing
//! here is shared between callers.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::classifier::IntentClassifier;
use crate::error::GatewayError;
use crate::extractor::SymbolExtractor;
use crate::formatter;
use crate::gateway::MarketDataGateway;
use crate::gemini::{GeminiClient, COST_PER_TOKEN};
use crate::models::{ClassificationResult, ConversationTurn, MarketPayload, SessionStats};

/// Stage toggles and constants for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Symbol used when extraction finds nothing.
    pub default_symbol: String,
    /// Upper bound on one data fetch; a timeout reads as a transport error.
    pub request_timeout: Duration,
    /// Remote LLM classification on/off (rule fallback always on).
    pub use_remote_classifier: bool,
    /// LLM report-polish pass on/off.
    pub polish_responses: bool,
    /// Best-effort cost estimate rate (USD per token).
    pub cost_per_token: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_symbol: "AAPL".to_string(),
            request_timeout: Duration::from_secs(10),
            use_remote_classifier: false,
            polish_responses: false,
            cost_per_token: COST_PER_TOKEN,
        }
    }
}

/// One caller's chat session.
pub struct ConversationSession {
    config: PipelineConfig,
    classifier: IntentClassifier,
    gateway: Arc<dyn MarketDataGateway>,
    llm: Option<Arc<GeminiClient>>,
    turns: VecDeque<ConversationTurn>,
    calls_made: u64,
    tokens_used: u64,
}

impl ConversationSession {
    pub fn new(
        config: PipelineConfig,
        gateway: Arc<dyn MarketDataGateway>,
        llm: Option<Arc<GeminiClient>>,
    ) -> Self {
        let extractor = SymbolExtractor::new(config.default_symbol.clone());
        let classifier_llm = if config.use_remote_classifier {
            llm.clone()
        } else {
            None
        };

        Self {
            classifier: IntentClassifier::new(classifier_llm, extractor),
            config,
            gateway,
            llm,
            turns: VecDeque::new(),
            calls_made: 0,
            tokens_used: 0,
        }
    }

    /// Run one full pipeline turn. Total: every query yields a report,
    /// worst case the apology template.
    pub async fn submit(&mut self, query: &str) -> String {
        let (classification, classify_tokens) = self.classifier.classify(query).await;
        self.tokens_used += classify_tokens;

        info!(
            intent = %classification.intent,
            symbol = %classification.symbol,
            confidence = classification.confidence,
            "Submitting pipeline turn"
        );

        let fetch = self
            .gateway
            .fetch(classification.intent, &classification.symbol);
        let payload = match timeout(self.config.request_timeout, fetch).await {
            Ok(Ok(payload)) => payload,
            Ok(Err(error)) => {
                warn!("Gateway call failed: {}", error);
                MarketPayload::Unavailable(error)
            }
            Err(_) => {
                warn!(
                    "Gateway call timed out after {:?}",
                    self.config.request_timeout
                );
                MarketPayload::Unavailable(GatewayError::transport("request timed out"))
            }
        };
        self.calls_made += 1;

        let mut report = formatter::format(&payload, &classification.symbol);

        if self.config.polish_responses {
            if let Some(llm) = &self.llm {
                match llm.polish(&report).await {
                    Ok(reply) => {
                        self.tokens_used += reply.tokens_used;
                        report = reply.text;
                    }
                    // Polish is a no-op on failure; the deterministic
                    // report stands.
                    Err(e) => warn!("Polish stage failed, keeping original report: {}", e),
                }
            }
        }

        report.push_str(&self.usage_footer(&classification));

        self.turns.push_back(ConversationTurn::new(
            query.to_string(),
            report.clone(),
            classification.intent,
        ));

        report
    }

    fn usage_footer(&self, classification: &ClassificationResult) -> String {
        format!(
            "\n📊 **분석 메타데이터:**\n\
             • AI 신뢰도: {:.0}%\n\
             • 데이터 출처: {}\n\
             • 누적 토큰 사용: ~{} tokens\n\
             • 누적 예상 비용: ~${:.6} USD\n",
            classification.confidence * 100.0,
            self.gateway.source_name(),
            self.tokens_used,
            self.estimated_cost(),
        )
    }

    /// Clear transcript and counters.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.calls_made = 0;
        self.tokens_used = 0;
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            conversation_count: self.turns.len(),
            calls_made: self.calls_made,
            tokens_used: self.tokens_used,
            estimated_cost: self.estimated_cost(),
        }
    }

    fn estimated_cost(&self) -> f64 {
        self.tokens_used as f64 * self.config.cost_per_token
    }

    /// Iterate over completed turns, oldest first.
    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Intent, OverviewData, QuoteData, RsiRequest, SentimentData, TechnicalData,
    };

    /// Fixed-payload gateway for pipeline tests.
    struct StaticGateway {
        quote: QuoteData,
        overview: OverviewData,
    }

    impl StaticGateway {
        fn with_market_fixtures() -> Self {
            Self {
                quote: QuoteData {
                    symbol: Some("AAPL".to_string()),
                    open: None,
                    high: Some("151".to_string()),
                    low: Some("149".to_string()),
                    price: Some("150.25".to_string()),
                    volume: Some("50000000".to_string()),
                    trading_day: Some("2024-06-01".to_string()),
                    previous_close: Some("147.75".to_string()),
                    change: Some("2.50".to_string()),
                    change_percent: Some("1.69%".to_string()),
                },
                overview: OverviewData {
                    symbol: Some("TSLA".to_string()),
                    name: Some("Tesla Inc".to_string()),
                    market_cap: Some("850000000000".to_string()),
                    pe_ratio: None,
                    dividend_yield: Some("0.000".to_string()),
                    ..Default::default()
                },
            }
        }
    }

    #[async_trait::async_trait]
    impl MarketDataGateway for StaticGateway {
        fn source_name(&self) -> &'static str {
            "Static Test Data"
        }

        async fn quote(&self, _symbol: &str) -> Result<QuoteData, GatewayError> {
            Ok(self.quote.clone())
        }

        async fn company_overview(&self, _symbol: &str) -> Result<OverviewData, GatewayError> {
            Ok(self.overview.clone())
        }

        async fn rsi(
            &self,
            _symbol: &str,
            _request: &RsiRequest,
        ) -> Result<TechnicalData, GatewayError> {
            Ok(TechnicalData::default())
        }

        async fn news_sentiment(&self, _symbol: &str) -> Result<SentimentData, GatewayError> {
            Ok(SentimentData::default())
        }
    }

    /// Gateway that always fails with a fixed error.
    struct FailingGateway(GatewayError);

    #[async_trait::async_trait]
    impl MarketDataGateway for FailingGateway {
        fn source_name(&self) -> &'static str {
            "Failing Test Data"
        }

        async fn quote(&self, _symbol: &str) -> Result<QuoteData, GatewayError> {
            Err(self.0.clone())
        }

        async fn company_overview(&self, _symbol: &str) -> Result<OverviewData, GatewayError> {
            Err(self.0.clone())
        }

        async fn rsi(
            &self,
            _symbol: &str,
            _request: &RsiRequest,
        ) -> Result<TechnicalData, GatewayError> {
            Err(self.0.clone())
        }

        async fn news_sentiment(&self, _symbol: &str) -> Result<SentimentData, GatewayError> {
            Err(self.0.clone())
        }
    }

    fn session_with(gateway: Arc<dyn MarketDataGateway>) -> ConversationSession {
        ConversationSession::new(PipelineConfig::default(), gateway, None)
    }

    #[tokio::test]
    async fn test_quote_scenario_end_to_end() {
        let mut session = session_with(Arc::new(StaticGateway::with_market_fixtures()));
        let report = session.submit("AAPL 현재가").await;

        assert!(report.contains("AAPL"));
        assert!(report.contains("$150.25"));
        assert!(report.contains("상승"));
        assert!(!report.contains("panicked"));
        assert!(!report.contains("Error"));

        let stats = session.stats();
        assert_eq!(stats.conversation_count, 1);
        assert_eq!(stats.calls_made, 1);
        assert_eq!(stats.tokens_used, 0);
        assert!(stats.estimated_cost.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_overview_scenario_end_to_end() {
        let mut session = session_with(Arc::new(StaticGateway::with_market_fixtures()));
        let report = session.submit("TSLA 회사 정보").await;

        assert!(report.contains("$850.0B"));
        assert!(report.contains("대형주"));
        assert!(report.contains("P/E 비율: N/A"));
        assert!(report.contains("0.00%"));
    }

    #[tokio::test]
    async fn test_gateway_failure_yields_apology_not_error() {
        for error in [
            GatewayError::RateLimited { retry_after: None },
            GatewayError::NotFound,
            GatewayError::transport("connection refused"),
        ] {
            let mut session = session_with(Arc::new(FailingGateway(error)));
            let report = session.submit("AAPL 현재가").await;
            assert!(report.contains("AAPL"));
            assert!(report.contains("다시 시도"));
        }
    }

    #[tokio::test]
    async fn test_counters_accumulate_and_reset() {
        let mut session = session_with(Arc::new(StaticGateway::with_market_fixtures()));

        session.submit("AAPL 현재가").await;
        session.submit("TSLA 회사 정보").await;
        session.submit("NVDA RSI 분석").await;

        let stats = session.stats();
        assert_eq!(stats.conversation_count, 3);
        assert_eq!(stats.calls_made, 3);

        session.reset();
        let stats = session.stats();
        assert_eq!(stats.conversation_count, 0);
        assert_eq!(stats.calls_made, 0);
        assert_eq!(stats.tokens_used, 0);
        assert_eq!(session.turns().count(), 0);
    }

    #[tokio::test]
    async fn test_transcript_keeps_query_report_pairs_in_order() {
        let mut session = session_with(Arc::new(StaticGateway::with_market_fixtures()));

        session.submit("AAPL 현재가").await;
        session.submit("META 뉴스 감정").await;

        let turns: Vec<_> = session.turns().collect();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].query, "AAPL 현재가");
        assert_eq!(turns[0].intent, Intent::Quote);
        assert_eq!(turns[1].query, "META 뉴스 감정");
        assert_eq!(turns[1].intent, Intent::Sentiment);
        assert!(turns[0].report.contains("150.25"));
    }

    #[tokio::test]
    async fn test_footer_names_the_data_source() {
        let mut session = session_with(Arc::new(StaticGateway::with_market_fixtures()));
        let report = session.submit("AAPL 현재가").await;
        assert!(report.contains("Static Test Data"));
    }

    #[tokio::test]
    async fn test_slow_gateway_times_out_to_apology() {
        struct SlowGateway;

        #[async_trait::async_trait]
        impl MarketDataGateway for SlowGateway {
            fn source_name(&self) -> &'static str {
                "Slow Test Data"
            }

            async fn quote(&self, _symbol: &str) -> Result<QuoteData, GatewayError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(QuoteData::default())
            }

            async fn company_overview(
                &self,
                _symbol: &str,
            ) -> Result<OverviewData, GatewayError> {
                unreachable!("test only issues quote queries")
            }

            async fn rsi(
                &self,
                _symbol: &str,
                _request: &RsiRequest,
            ) -> Result<TechnicalData, GatewayError> {
                unreachable!("test only issues quote queries")
            }

            async fn news_sentiment(
                &self,
                _symbol: &str,
            ) -> Result<SentimentData, GatewayError> {
                unreachable!("test only issues quote queries")
            }
        }

        let config = PipelineConfig {
            request_timeout: Duration::from_millis(50),
            ..Default::default()
        };
        let mut session = ConversationSession::new(config, Arc::new(SlowGateway), None);

        let report = session.submit("AAPL 현재가").await;
        assert!(report.contains("다시 시도"));
        assert_eq!(session.stats().calls_made, 1);
    }
}
