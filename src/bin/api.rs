use financial_chatbot_pipeline::{
    api::{start_server, ApiState},
    gateway::{AlphaVantageGateway, DemoGateway, GatewayConfig, MarketDataGateway},
    gemini::GeminiClient,
    session::PipelineConfig,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let alphavantage_key = std::env::var("ALPHAVANTAGE_API_KEY").unwrap_or_default();
    let gemini_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("🚀 Financial Chatbot Pipeline - API Server");
    info!("📍 Port: {}", api_port);

    let gateway: Arc<dyn MarketDataGateway> = if alphavantage_key.is_empty() {
        info!("ALPHAVANTAGE_API_KEY not set, serving demo data");
        Arc::new(DemoGateway::new())
    } else {
        Arc::new(AlphaVantageGateway::new(GatewayConfig::new(
            alphavantage_key,
        )))
    };

    let llm = if gemini_key.is_empty() {
        eprintln!("⚠️  GEMINI_API_KEY not set in .env");
        eprintln!("📌 Remote classification and polish stages are disabled");
        None
    } else {
        Some(Arc::new(GeminiClient::new(gemini_key)))
    };

    let config = PipelineConfig {
        use_remote_classifier: llm.is_some(),
        polish_responses: llm.is_some(),
        ..Default::default()
    };

    let state = ApiState::new(config, gateway, llm);

    info!("✅ Pipeline initialized");
    info!("📡 Starting API server...");

    start_server(state, api_port).await?;

    Ok(())
}
