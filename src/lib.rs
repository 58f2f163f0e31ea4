//! Financial Chatbot Pipeline
//!
//! A Korean-language financial chat pipeline that:
//! - Classifies queries into four market-data intents (LLM-assisted, with
//!   a deterministic rule fallback that never fails)
//! - Fetches typed payloads through a pluggable market data gateway
//! - Formats payloads into report text through pure, total formatters
//! - Optionally asks the LLM to polish the finished report
//! - Tracks per-session transcripts and usage cost
//!
//! PIPELINE:
//! QUERY → CLASSIFY → FETCH → FORMAT → (POLISH?) → TRANSCRIPT

pub mod api;
pub mod classifier;
pub mod error;
pub mod extractor;
pub mod formatter;
pub mod gateway;
pub mod gemini;
pub mod models;
pub mod numeric;
pub mod session;

pub use error::{GatewayError, Result};

// Re-export common types
pub use classifier::IntentClassifier;
pub use extractor::SymbolExtractor;
pub use gateway::{AlphaVantageGateway, DemoGateway, GatewayConfig, MarketDataGateway};
pub use models::*;
pub use session::{ConversationSession, PipelineConfig};
