//! Core data models for the insights bot

use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Quote =================
//

/// A single price snapshot for one symbol.
///
/// `timestamp` is only set for non-real-time quotes (daily bars and
/// synthesized fallback data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: String,
    pub change_percent: String,
    pub volume: String,
    pub is_real_time: bool,
    pub timestamp: Option<String>,
}

impl Quote {
    /// One-line summary used as the base of every quote answer
    pub fn summary(&self) -> String {
        format!(
            "{} is currently trading at ${} ({}). Volume: {}",
            self.symbol, self.price, self.change_percent, self.volume
        )
    }
}

//
// ================= Provider Records =================
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
    pub symbol: String,
    pub name: String,
    pub sector: Option<String>,
    pub description: Option<String>,
}

/// Broad-market snapshot taken from the SPY overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub week_52_high: String,
    pub week_52_low: String,
    pub market_cap: Option<f64>,
    pub pe_ratio: String,
    pub dividend_yield: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorPerformance {
    pub sector: String,
    /// Raw provider value, e.g. "1.23%"
    pub performance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub ticker: String,
    /// Raw provider value, e.g. "45.6789%"
    pub change_percentage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopMovers {
    pub gainers: Vec<Mover>,
    pub losers: Vec<Mover>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexQuote {
    pub name: String,
    pub price: String,
    pub change_percent: String,
    pub volume: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForexRate {
    pub pair: String,
    pub rate: String,
    pub change_percent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoQuote {
    pub symbol: String,
    pub price: String,
    pub change_percent: String,
    pub volume: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsHeadline {
    pub title: String,
    pub summary: Option<String>,
}

//
// ================= Status =================
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    Online,
    RateLimited,
    Offline,
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApiStatus::Online => "Online",
            ApiStatus::RateLimited => "Online (Rate Limited)",
            ApiStatus::Offline => "Offline",
        };
        write!(f, "API Status: {}", label)
    }
}
