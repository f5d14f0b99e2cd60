//! Intent classification
//!
//! Maps a raw chat message to the data path that should answer it.
//! Checks run in a fixed priority order and the first match wins; several
//! checks can match the same message, so the order is part of the contract.

use crate::symbols::extract_symbols;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    /// Seven-section market report
    ComprehensiveMarket,
    SymbolQuote { symbol: String },
    MarketOverview,
    CompanyInfo { symbol: String },
    /// Stock news when a symbol is present, market news otherwise
    News { symbol: Option<String> },
    Sector,
    TopMovers,
    /// No market data; answered by the AI alone
    FreeForm,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::ComprehensiveMarket => "comprehensive_market",
            Intent::SymbolQuote { .. } => "symbol_quote",
            Intent::MarketOverview => "market_overview",
            Intent::CompanyInfo { .. } => "company_info",
            Intent::News { .. } => "news",
            Intent::Sector => "sector",
            Intent::TopMovers => "top_movers",
            Intent::FreeForm => "free_form",
        }
    }
}

/// Keyword lists, matched against the lowercased message
const GENERAL_MARKET_PHRASES: &[&str] = &[
    "stock market",
    "stocks",
    "how is the market",
    "market overview",
    "market summary",
    "tell me about the market",
    "what is happening in the market",
];

const MARKET_KEYWORDS: &[&str] = &["market", "trend"];
const COMPANY_KEYWORDS: &[&str] = &["company", "about"];
const NEWS_KEYWORDS: &[&str] = &["news", "latest"];
const SECTOR_KEYWORDS: &[&str] = &["sector", "industry"];
const MOVER_KEYWORDS: &[&str] = &["gainers", "losers", "top", "best", "worst"];

pub struct IntentRouter;

impl IntentRouter {
    /// Classify `message`. Keywords match case-insensitively; tickers are
    /// taken from the message as typed and only the first one is used.
    pub fn classify(message: &str) -> Intent {
        let lowered = message.to_lowercase();
        let symbols = extract_symbols(message);
        let first = symbols.first().cloned();

        let has_any = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

        if has_any(GENERAL_MARKET_PHRASES) || (lowered.contains("market") && symbols.is_empty()) {
            return Intent::ComprehensiveMarket;
        }

        if let Some(symbol) = first.clone() {
            return Intent::SymbolQuote { symbol };
        }

        if has_any(MARKET_KEYWORDS) {
            return Intent::MarketOverview;
        }

        if has_any(COMPANY_KEYWORDS) {
            if let Some(symbol) = first.clone() {
                return Intent::CompanyInfo { symbol };
            }
        }

        if has_any(NEWS_KEYWORDS) {
            return Intent::News { symbol: first };
        }

        if has_any(SECTOR_KEYWORDS) {
            return Intent::Sector;
        }

        if has_any(MOVER_KEYWORDS) {
            return Intent::TopMovers;
        }

        Intent::FreeForm
    }
}
