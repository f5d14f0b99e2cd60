//! Message handling
//!
//! `ChatBot::process_message` is the single entry point for a chat turn.
//! It classifies the message, runs the matching data path, enriches the
//! result with AI insights and always returns a displayable string.

use crate::aggregation::AggregationPipeline;
use crate::cache::QuoteCache;
use crate::classifier::{Intent, IntentRouter};
use crate::config::BotConfig;
use crate::enhancer::{InsightEnhancer, HELP_MESSAGE};
use crate::error::InsightError;
use crate::fallback::FallbackSynthesizer;
use crate::gemini::GeminiClient;
use crate::market_data::MarketDataGateway;
use crate::models::{ApiStatus, Quote};
use crate::news::NewsGateway;
use crate::report;
use crate::symbols::is_valid_symbol;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub const WELCOME_MESSAGE: &str = "Hello! I'm your Stock Market Insights Bot. I can help you with stock prices, market trends, and company information for any stock symbol. How can I assist you today?";

/// Answer plus the intent that produced it
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub intent: Intent,
    pub answer: String,
}

pub struct ChatBot {
    gateway: MarketDataGateway,
    news: NewsGateway,
    enhancer: InsightEnhancer,
    cache: Arc<QuoteCache>,
}

impl ChatBot {
    pub fn new(
        gateway: MarketDataGateway,
        news: NewsGateway,
        enhancer: InsightEnhancer,
        cache: Arc<QuoteCache>,
    ) -> Self {
        Self {
            gateway,
            news,
            enhancer,
            cache,
        }
    }

    /// Production wiring: one pooled HTTP client shared by every gateway
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.http_timeout)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: &BotConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let gateway = MarketDataGateway::new(
            transport.clone(),
            config.alpha_vantage_url.clone(),
            config.alpha_vantage_api_key.clone(),
        );
        let news = NewsGateway::new(
            transport.clone(),
            config.search_url.clone(),
            config.search_api_key.clone(),
        );
        let enhancer = InsightEnhancer::new(GeminiClient::new(
            transport,
            config.gemini_url.clone(),
            config.gemini_api_key.clone(),
        ));

        Self::new(
            gateway,
            news,
            enhancer,
            Arc::new(QuoteCache::new(config.quote_cache_ttl)),
        )
    }

    /// Answer one chat message. Never fails.
    pub async fn process_message(&self, message: &str) -> String {
        self.respond(message).await.answer
    }

    pub async fn respond(&self, message: &str) -> ChatReply {
        let message = message.trim();
        let intent = IntentRouter::classify(message);

        if message.is_empty() {
            return ChatReply {
                intent,
                answer: HELP_MESSAGE.to_string(),
            };
        }

        info!(intent = intent.label(), "Handling message");
        let answer = self.dispatch(&intent, message).await;

        ChatReply { intent, answer }
    }

    /// Provider availability, for status indicators
    pub async fn api_status(&self) -> ApiStatus {
        self.gateway.check_status().await
    }

    async fn dispatch(&self, intent: &Intent, message: &str) -> String {
        match intent {
            Intent::ComprehensiveMarket => {
                let report = AggregationPipeline::new(&self.gateway).run().await;
                self.enhancer.enhance(&report.to_string(), message, None).await
            }

            Intent::SymbolQuote { symbol } => self.quote_answer(symbol, message).await,

            Intent::MarketOverview => {
                let data = self
                    .gateway
                    .market_overview()
                    .await
                    .map(|m| report::market_overview(&m));
                self.enhance_or_apologize(
                    data,
                    message,
                    None,
                    "I'm having trouble fetching market overview data. Please try again later.".to_string(),
                )
                .await
            }

            Intent::CompanyInfo { symbol } => {
                let data = self
                    .gateway
                    .company_overview(symbol)
                    .await
                    .map(|c| report::company(&c));
                self.enhance_or_apologize(
                    data,
                    message,
                    Some(symbol.as_str()),
                    format!(
                        "I'm having trouble fetching information about {}. Please try again later.",
                        symbol
                    ),
                )
                .await
            }

            Intent::News { symbol: Some(symbol) } => {
                let data = self
                    .news
                    .stock_news(symbol)
                    .await
                    .map(|items| report::headlines(Some(symbol.as_str()), &items));
                self.enhance_or_apologize(
                    data,
                    message,
                    Some(symbol.as_str()),
                    format!("I'm having trouble fetching news for {}. Please try again later.", symbol),
                )
                .await
            }

            Intent::News { symbol: None } => {
                let data = self
                    .news
                    .market_news()
                    .await
                    .map(|items| report::headlines(None, &items));
                self.enhance_or_apologize(
                    data,
                    message,
                    None,
                    "I'm having trouble fetching market news. Please try again later.".to_string(),
                )
                .await
            }

            Intent::Sector => {
                let data = self
                    .gateway
                    .sector_performance()
                    .await
                    .map(|s| report::sector_performance(&s));
                self.enhance_or_apologize(
                    data,
                    message,
                    None,
                    "I'm having trouble fetching sector performance data. Please try again later.".to_string(),
                )
                .await
            }

            Intent::TopMovers => {
                let data = self
                    .gateway
                    .top_movers()
                    .await
                    .map(|m| report::top_movers(&m));
                self.enhance_or_apologize(
                    data,
                    message,
                    None,
                    "I'm having trouble fetching top gainers and losers. Please try again later.".to_string(),
                )
                .await
            }

            Intent::FreeForm => self.enhancer.answer(message).await,
        }
    }

    async fn enhance_or_apologize(
        &self,
        data: Result<String>,
        message: &str,
        symbol: Option<&str>,
        apology: String,
    ) -> String {
        match data {
            Ok(data) => self.enhancer.enhance(&data, message, symbol).await,
            Err(e) => {
                warn!(error = %e, "Data fetch failed");
                apology
            }
        }
    }

    /// Cache, then live tiers, then synthesized data
    async fn quote_answer(&self, symbol: &str, message: &str) -> String {
        if let Err(e) = validate_symbol(symbol) {
            warn!(error = %e, "Rejected symbol");
            return format!(
                "\"{}\" doesn't appear to be a valid stock symbol. Please check the symbol and try again. Common stock symbols include AAPL (Apple), MSFT (Microsoft), GOOGL (Google), and AMZN (Amazon).",
                symbol
            );
        }

        let basic = if let Some(cached) = self.cache.get(symbol).await {
            cached_answer(&cached)
        } else {
            match self.gateway.fetch_quote(symbol).await {
                Ok(quote) => {
                    self.cache.set(symbol, quote.clone()).await;
                    live_answer(&quote)
                }
                Err(e) => {
                    warn!(symbol, error = %e, "Live quote unavailable, synthesizing fallback");
                    let quote = FallbackSynthesizer::synthesize(symbol);
                    self.cache.set(symbol, quote.clone()).await;
                    fallback_answer(&quote)
                }
            }
        };

        self.enhancer.enhance(&basic, message, Some(symbol)).await
    }
}

fn validate_symbol(symbol: &str) -> Result<()> {
    if is_valid_symbol(symbol) {
        Ok(())
    } else {
        Err(InsightError::ValidationFailure(symbol.to_string()))
    }
}

fn cached_answer(quote: &Quote) -> String {
    let mut text = quote.summary();
    if !quote.is_real_time {
        text.push_str(&format!(
            "\n\nNote: This is cached data from {}.",
            quote.timestamp.as_deref().unwrap_or("an earlier request")
        ));
    }
    text
}

fn live_answer(quote: &Quote) -> String {
    let mut text = quote.summary();
    if !quote.is_real_time {
        text.push_str(&format!(
            "\n\nNote: This is daily data from {}. Real-time data is currently unavailable.",
            quote.timestamp.as_deref().unwrap_or("the last trading day")
        ));
    }
    text
}

fn fallback_answer(quote: &Quote) -> String {
    format!(
        "{}\n\nNote: This is fallback data as the financial data service is temporarily unavailable.",
        quote.summary()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::ReportSection;
    use crate::transport::stub::StubTransport;
    use serde_json::{json, Value};

    const GEMINI: &str = "http://gemini";

    fn config() -> BotConfig {
        BotConfig {
            alpha_vantage_url: "http://av".into(),
            alpha_vantage_api_key: "av-key".into(),
            gemini_url: GEMINI.into(),
            gemini_api_key: "gemini-key".into(),
            search_url: "http://search".into(),
            search_api_key: "search-key".into(),
            ..BotConfig::default()
        }
    }

    fn bot(stub: StubTransport) -> (ChatBot, Arc<StubTransport>) {
        let stub = Arc::new(stub);
        (ChatBot::with_transport(&config(), stub.clone()), stub)
    }

    fn gemini_says(text: &str) -> Value {
        json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
    }

    fn global_quote(price: &str) -> Value {
        json!({"Global Quote": {"05. price": price, "06. volume": "1000", "10. change percent": "1.5%"}})
    }

    #[tokio::test]
    async fn test_total_outage_uses_fallback_and_never_fails() {
        let (bot, _) = bot(StubTransport::new());

        let answer = bot.process_message("ZZZZ").await;
        assert!(answer.starts_with("ZZZZ is currently trading at $460.00 (-5.00%)"));
        assert!(answer.contains("fallback data"));
    }

    #[tokio::test]
    async fn test_live_quote_enhanced_and_cached() {
        let (bot, stub) = bot(
            StubTransport::new()
                .respond("GLOBAL_QUOTE", global_quote("189.5"))
                .respond(GEMINI, gemini_says("Looks steady.")),
        );

        let answer = bot.process_message("How is AAPL doing?").await;
        assert_eq!(
            answer,
            "AAPL is currently trading at $189.50 (1.50%). Volume: 1000\n\n🤖 AI INSIGHTS:\nLooks steady."
        );

        // Second ask is served from cache: only Gemini is called again
        bot.process_message("AAPL again").await;
        let quote_calls = stub
            .calls()
            .iter()
            .filter(|c| c.starts_with("GLOBAL_QUOTE"))
            .count();
        assert_eq!(quote_calls, 1);
    }

    #[tokio::test]
    async fn test_daily_tier_note() {
        let (bot, _) = bot(StubTransport::new().respond(
            "TIME_SERIES_DAILY",
            json!({"Time Series (Daily)": {"2024-03-01": {"1. open": "100", "4. close": "101", "5. volume": "9"}}}),
        ));

        let answer = bot.process_message("IBM").await;
        assert!(answer.contains("Note: This is daily data from 2024-03-01."));
    }

    #[tokio::test]
    async fn test_cached_fallback_is_labelled() {
        let (bot, _) = bot(StubTransport::new());

        bot.process_message("ZZZZ").await;
        let second = bot.process_message("ZZZZ").await;
        assert!(second.contains("Note: This is cached data from"));
    }

    #[tokio::test]
    async fn test_comprehensive_report_survives_outage() {
        let (bot, _) = bot(StubTransport::new());

        let reply = bot.respond("How is the stock market doing?").await;
        assert_eq!(reply.intent, Intent::ComprehensiveMarket);
        for section in ReportSection::ORDER {
            assert!(reply.answer.contains(section.header()));
            assert!(reply.answer.contains(section.placeholder()));
        }
    }

    #[tokio::test]
    async fn test_branch_failures_are_apologies() {
        let (bot, _) = bot(StubTransport::new());

        assert_eq!(
            bot.process_message("show me the top gainers").await,
            "I'm having trouble fetching top gainers and losers. Please try again later."
        );
        assert_eq!(
            bot.process_message("which sector is leading").await,
            "I'm having trouble fetching sector performance data. Please try again later."
        );
        assert_eq!(
            bot.process_message("any news today").await,
            "I'm having trouble fetching market news. Please try again later."
        );
        assert_eq!(
            bot.process_message("what's the trend").await,
            "I'm having trouble fetching market overview data. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_sector_answer_without_ai() {
        let (bot, _) = bot(StubTransport::new().respond(
            "SECTOR",
            json!({"Rank A: Real-Time Performance": {"Energy": "1.2%"}}),
        ));

        assert_eq!(
            bot.process_message("sector performance").await,
            "Sector Performance:\n\nEnergy: 1.20%"
        );
    }

    #[tokio::test]
    async fn test_free_form_goes_to_ai() {
        let (online, _) = bot(StubTransport::new().respond(GEMINI, gemini_says("A dividend is a payout.")));
        assert_eq!(online.process_message("what is a dividend?").await, "A dividend is a payout.");

        let (offline, _) = bot(StubTransport::new());
        assert_eq!(offline.process_message("what is a dividend?").await, HELP_MESSAGE);
    }

    #[tokio::test]
    async fn test_blank_message_makes_no_calls() {
        let (bot, stub) = bot(StubTransport::new());
        assert_eq!(bot.process_message("   ").await, HELP_MESSAGE);
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_company_info_branch() {
        let (online, _) = bot(StubTransport::new().respond(
            "OVERVIEW:IBM",
            json!({"Name": "International Business Machines", "Sector": "TECHNOLOGY", "Description": "Makes computers."}),
        ));
        let intent = Intent::CompanyInfo { symbol: "IBM".into() };
        assert_eq!(
            online.dispatch(&intent, "about IBM").await,
            "International Business Machines (IBM) is a TECHNOLOGY company. Makes computers."
        );

        let (offline, _) = bot(StubTransport::new());
        assert_eq!(
            offline.dispatch(&intent, "about IBM").await,
            "I'm having trouble fetching information about IBM. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_symbol_news_branch() {
        let (online, stub) = bot(StubTransport::new().respond(
            "http://search",
            json!({"items": [{"snippet": {"title": "Tesla deliveries beat"}}]}),
        ));
        let intent = Intent::News { symbol: Some("TSLA".into()) };
        assert_eq!(
            online.dispatch(&intent, "news on TSLA").await,
            "Latest news for TSLA:\n\n1. Tesla deliveries beat"
        );
        assert_eq!(stub.calls()[0], "http://search");

        let (offline, _) = bot(StubTransport::new());
        assert_eq!(
            offline.dispatch(&intent, "news on TSLA").await,
            "I'm having trouble fetching news for TSLA. Please try again later."
        );
    }

    #[test]
    fn test_validation_failure() {
        assert!(matches!(
            validate_symbol("toolong"),
            Err(InsightError::ValidationFailure(_))
        ));
        assert!(validate_symbol("IBM").is_ok());
    }
}
