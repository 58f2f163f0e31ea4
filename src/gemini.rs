//! Gemini API client for the classification and polish stages
//!
//! Provides the remote-LLM legs of the pipeline: structured intent
//! classification and the optional report-improvement pass.
//! Uses a long-lived reqwest::Client for connection pooling.

use serde::{Deserialize, Serialize};
use tracing::{error, info};
use reqwest::Client;
use std::time::Duration;
use crate::error::ChatbotError;

/// Fixed per-token rate used for the best-effort cost estimate (USD).
pub const COST_PER_TOKEN: f64 = 0.000002;

/// Instruction for the classification call. The reply must be a single JSON
/// object; the caller extracts it between the first `{` and the last `}`.
const CLASSIFY_INSTRUCTION: &str = r#"당신은 금융 질문 분류 전문가입니다. 사용자의 질문을 분석하여 다음 중 하나로 분류하세요:

1. stock_quote: 주식 현재가, 시세, 가격 조회
2. company_overview: 회사 정보, 개요, 재무지표
3. technical_analysis: RSI, MACD, SMA 등 기술적 분석
4. market_sentiment: 뉴스, 감정 분석, 시장 동향

응답은 반드시 다음 JSON 형식으로만 답하세요:
{"intent": "분류결과", "confidence": 0.95, "symbol": "주식심볼", "reasoning": "분류이유"}"#;

/// Instruction for the polish call. The deterministic report is kept and
/// extended, never replaced.
const POLISH_INSTRUCTION: &str = r#"당신은 금융 분석 보고서 품질 개선 전문가입니다.
주어진 분석 결과에 다음을 추가하여 개선하세요:

1. 핵심 투자 포인트 3가지
2. 리스크 요인 분석
3. 투자 시간대별 전략 (단기/중기/장기)

기존 내용은 유지하고 마지막에 개선 분석 섹션을 추가하세요."#;

/// Raw model reply plus the token usage the call consumed.
#[derive(Debug, Clone)]
pub struct LlmReply {
    pub text: String,
    pub tokens_used: u64,
}

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent".to_string(),
        }
    }

    /// Classify a query; the reply text carries the structured JSON.
    pub async fn classify(&self, query: &str) -> crate::Result<LlmReply> {
        let prompt = format!("질문: {}", query);
        self.generate(&prompt, CLASSIFY_INSTRUCTION, 0.1).await
    }

    /// Ask the model to improve an already-formatted report.
    pub async fn polish(&self, report: &str) -> crate::Result<LlmReply> {
        let prompt = format!("분석 결과:\n{}", report);
        self.generate(&prompt, POLISH_INSTRUCTION, 0.3).await
    }

    /// Single-attempt generation. Callers own the fallback policy; no
    /// retries happen here.
    async fn generate(
        &self,
        prompt: &str,
        instruction: &str,
        temperature: f32,
    ) -> crate::Result<LlmReply> {
        if self.api_key.is_empty() {
            return Err(ChatbotError::LlmError(
                "Gemini API key not configured".to_string(),
            ));
        }

        let url = format!("{}?key={}", self.base_url, self.api_key);

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 1024,
            },
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: instruction.to_string(),
                }],
            },
        };

        info!("Calling Gemini API");

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                ChatbotError::LlmError(format!("Gemini API error: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response: {}", error_text);
            return Err(ChatbotError::LlmError(format!(
                "Gemini API error: {}",
                error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            ChatbotError::LlmError(format!("Gemini parse error: {}", e))
        })?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| {
                ChatbotError::LlmError("Empty response from Gemini".to_string())
            })?;

        let tokens_used = estimate_tokens(&gemini_response, &text);

        info!("Gemini response received ({} tokens)", tokens_used);

        Ok(LlmReply { text, tokens_used })
    }
}

/// Prefer the reported usage; fall back to the word-count heuristic when
/// the metadata block is missing.
fn estimate_tokens(response: &GeminiResponse, text: &str) -> u64 {
    match &response.usage_metadata {
        Some(usage) => {
            (usage.prompt_token_count.max(0) + usage.candidates_token_count.max(0)) as u64
        }
        None => text.split_whitespace().count() as u64 * 2,
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    system_instruction: SystemInstruction,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    prompt_token_count: i64,
    candidates_token_count: i64,
}
