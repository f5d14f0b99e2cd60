use std::sync::Arc;
use stock_insights_bot::{api::start_server, config::BotConfig, conversational::ChatBot};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    // Load environment variables
    let config = BotConfig::from_env()?;

    info!("🚀 Stock Insights Bot - API Server");
    info!("📍 Port: {}", config.port);

    let bot = Arc::new(ChatBot::from_config(&config)?);

    info!("✅ Chat bot initialized");
    info!("📡 Starting API server...");

    start_server(bot, config.port).await?;

    Ok(())
}
