use financial_chatbot_pipeline::{
    gateway::{AlphaVantageGateway, DemoGateway, GatewayConfig, MarketDataGateway},
    gemini::GeminiClient,
    session::{ConversationSession, PipelineConfig},
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables once, here; the library only sees
    // explicit config values.
    dotenv::dotenv().ok();

    info!("Financial Chatbot Pipeline starting");

    let alphavantage_key = std::env::var("ALPHAVANTAGE_API_KEY").ok();
    let gemini_key = std::env::var("GEMINI_API_KEY").ok();

    let gateway: Arc<dyn MarketDataGateway> = match alphavantage_key {
        Some(key) if !key.is_empty() => {
            info!("Using AlphaVantage gateway");
            Arc::new(AlphaVantageGateway::new(GatewayConfig::new(key)))
        }
        _ => {
            info!("ALPHAVANTAGE_API_KEY not set, using demo gateway");
            Arc::new(DemoGateway::new())
        }
    };

    let llm = gemini_key
        .filter(|key| !key.is_empty())
        .map(|key| Arc::new(GeminiClient::new(key)));

    let config = PipelineConfig {
        use_remote_classifier: llm.is_some(),
        ..Default::default()
    };

    let mut session = ConversationSession::new(config, gateway, llm);

    // Sample turns, one per intent
    let queries = [
        "TSLA 현재가",
        "AAPL 회사 정보",
        "NVDA RSI 분석",
        "META 뉴스 감정",
    ];

    for query in queries {
        info!(query = %query, "Submitting query");
        let report = session.submit(query).await;
        println!("\n=== {} ===\n{}", query, report);
    }

    let stats = session.stats();
    println!("\n=== SESSION STATS ===");
    println!("Conversations: {}", stats.conversation_count);
    println!("Gateway calls: {}", stats.calls_made);
    println!("Tokens used: {}", stats.tokens_used);
    println!("Estimated cost: ${:.6}", stats.estimated_cost);

    Ok(())
}
