//! Interactive command-line chat with the stock insights bot

use clap::Parser;
use std::sync::Arc;
use stock_insights_bot::{
    config::BotConfig,
    conversational::{ChatBot, WELCOME_MESSAGE},
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "insights")]
#[command(about = "Stock market insights chat bot", long_about = None)]
struct Args {
    /// Answer a single question and exit
    #[arg(short, long)]
    query: Option<String>,

    /// Print provider status before chatting
    #[arg(long)]
    status: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so answers stay clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = BotConfig::from_env()?;
    let bot = Arc::new(ChatBot::from_config(&config)?);

    if args.status {
        println!("{}", bot.api_status().await);
    }

    if let Some(query) = args.query {
        println!("{}", bot.process_message(&query).await);
        return Ok(());
    }

    info!("Starting interactive session");
    println!("{}\n", WELCOME_MESSAGE);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        println!("\n{}\n", bot.process_message(line).await);
    }

    Ok(())
}
