//! Alpha Vantage gateway
//!
//! Quotes go through a three-tier fallback chain (see `tiers`). Every other
//! endpoint is a single call: it either yields a typed record or an error,
//! and the caller decides what to show instead.

pub mod tiers;

pub use tiers::{calculate_change, QuoteTier};

use crate::error::InsightError;
use crate::models::{
    ApiStatus, CompanyOverview, CryptoQuote, ForexRate, IndexQuote, MarketSnapshot, Mover,
    NewsHeadline, Quote, SectorPerformance, TopMovers,
};
use crate::transport::{HttpTransport, Query};
use crate::Result;
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

const PROVIDER: &str = "Alpha Vantage";

/// Index symbol and display name
pub const MAJOR_INDICES: &[(&str, &str)] = &[
    ("^GSPC", "S&P 500"),
    ("^DJI", "Dow Jones"),
    ("^IXIC", "NASDAQ"),
    ("^RUT", "Russell 2000"),
];

pub const FOREX_PAIRS: &[(&str, &str)] = &[
    ("EUR", "USD"),
    ("GBP", "USD"),
    ("JPY", "USD"),
    ("AUD", "USD"),
    ("CAD", "USD"),
];

pub const CRYPTO_SYMBOLS: &[&str] = &["BTC", "ETH", "XRP", "LTC", "DOGE"];

const MARKET_PROXY_SYMBOL: &str = "SPY";
const STATUS_PROBE_SYMBOL: &str = "AAPL";
const MAX_MOVERS: usize = 5;
const MAX_NEWS_ITEMS: usize = 5;

/// Reject responses that carry a provider error or rate-limit notice.
///
/// Alpha Vantage answers HTTP 200 for both, so this must run before any
/// other field is trusted.
pub fn check_provider_response(data: &Value) -> Result<()> {
    if let Some(message) = data.get("Error Message") {
        return Err(InsightError::ProviderError(
            message.as_str().unwrap_or("unknown provider error").to_string(),
        ));
    }

    if data.get("Note").is_some() || data.get("Information").is_some() {
        return Err(InsightError::RateLimited {
            provider: PROVIDER.to_string(),
        });
    }

    Ok(())
}

/// Lenient numeric parse: tolerates whitespace and a trailing `%`
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

pub struct MarketDataGateway {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: String,
}

impl MarketDataGateway {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: String, api_key: String) -> Self {
        Self {
            transport,
            base_url,
            api_key,
        }
    }

    async fn fetch_raw(&self, mut query: Query) -> Result<Value> {
        query.push(("apikey", self.api_key.clone()));
        self.transport.get_json(&self.base_url, &query).await
    }

    /// Fetch and reject provider error payloads
    async fn call(&self, query: Query) -> Result<Value> {
        let data = self.fetch_raw(query).await?;
        check_provider_response(&data)?;
        Ok(data)
    }

    // =============================
    // Quotes
    // =============================

    /// Quote from the first tier that yields usable data.
    ///
    /// Never fabricates data: when every tier fails the caller gets
    /// `QuoteUnavailable`.
    pub async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        for tier in QuoteTier::CHAIN {
            match self.fetch_quote_tier(tier, symbol).await {
                Ok(quote) => {
                    info!(symbol, ?tier, "Quote resolved");
                    return Ok(quote);
                }
                Err(e) => {
                    warn!(
                        symbol,
                        ?tier,
                        network = e.is_network(),
                        error = %e,
                        "Quote tier failed, trying next"
                    );
                }
            }
        }

        Err(InsightError::QuoteUnavailable {
            symbol: symbol.to_string(),
        })
    }

    pub async fn fetch_quote_tier(&self, tier: QuoteTier, symbol: &str) -> Result<Quote> {
        let data = self.fetch_raw(tier.query(symbol)).await?;
        tier.parse(symbol, &data)
    }

    // =============================
    // Market-wide endpoints
    // =============================

    pub async fn top_movers(&self) -> Result<TopMovers> {
        let data = self
            .call(vec![("function", "TOP_GAINERS_LOSERS".to_string())])
            .await?;

        if data.get("top_gainers").is_none() && data.get("top_losers").is_none() {
            return Err(InsightError::EmptyData("no gainers or losers".to_string()));
        }

        Ok(TopMovers {
            gainers: parse_movers(&data, "top_gainers"),
            losers: parse_movers(&data, "top_losers"),
        })
    }

    /// Leading gainer and loser only
    pub async fn market_overview(&self) -> Result<TopMovers> {
        let movers = self.top_movers().await?;

        if movers.gainers.is_empty() && movers.losers.is_empty() {
            return Err(InsightError::EmptyData("no market movers".to_string()));
        }

        Ok(TopMovers {
            gainers: movers.gainers.into_iter().take(1).collect(),
            losers: movers.losers.into_iter().take(1).collect(),
        })
    }

    pub async fn company_overview(&self, symbol: &str) -> Result<CompanyOverview> {
        let data = self
            .call(vec![
                ("function", "OVERVIEW".to_string()),
                ("symbol", symbol.to_string()),
            ])
            .await?;

        let name = text(&data, "Name")
            .ok_or_else(|| InsightError::EmptyData(format!("no company information for {}", symbol)))?;

        Ok(CompanyOverview {
            symbol: symbol.to_string(),
            name,
            sector: text(&data, "Sector"),
            description: text(&data, "Description"),
        })
    }

    /// Broad-market figures from the SPY fund overview
    pub async fn market_snapshot(&self) -> Result<MarketSnapshot> {
        let data = self
            .call(vec![
                ("function", "OVERVIEW".to_string()),
                ("symbol", MARKET_PROXY_SYMBOL.to_string()),
            ])
            .await?;

        let week_52_high = text(&data, "52WeekHigh")
            .ok_or_else(|| InsightError::EmptyData("no market overview figures".to_string()))?;

        Ok(MarketSnapshot {
            week_52_high,
            week_52_low: text(&data, "52WeekLow").unwrap_or_else(|| "N/A".to_string()),
            market_cap: text(&data, "MarketCapitalization").and_then(|v| parse_number(&v)),
            pe_ratio: text(&data, "PERatio").unwrap_or_else(|| "N/A".to_string()),
            dividend_yield: text(&data, "DividendYield").unwrap_or_else(|| "N/A".to_string()),
        })
    }

    /// Real-time sector ranking; empty when the provider has none
    pub async fn sector_performance(&self) -> Result<Vec<SectorPerformance>> {
        let data = self.call(vec![("function", "SECTOR".to_string())]).await?;

        let sectors = data
            .get("Rank A: Real-Time Performance")
            .and_then(Value::as_object)
            .map(|ranking| {
                ranking
                    .iter()
                    .filter_map(|(sector, value)| {
                        value.as_str().map(|performance| SectorPerformance {
                            sector: sector.clone(),
                            performance: performance.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(sectors)
    }

    pub async fn market_news(&self) -> Result<Vec<NewsHeadline>> {
        let data = self
            .call(vec![
                ("function", "NEWS_SENTIMENT".to_string()),
                ("topics", "financial_markets".to_string()),
            ])
            .await?;

        let feed = data
            .get("feed")
            .and_then(Value::as_array)
            .ok_or_else(|| InsightError::EmptyData("no news feed".to_string()))?;

        Ok(feed
            .iter()
            .take(MAX_NEWS_ITEMS)
            .filter_map(|item| {
                text(item, "title").map(|title| NewsHeadline {
                    title,
                    summary: text(item, "summary"),
                })
            })
            .collect())
    }

    // =============================
    // Fan-out endpoints
    // =============================

    pub async fn major_indices(&self) -> Result<Vec<IndexQuote>> {
        let fetches = MAJOR_INDICES.iter().map(|(symbol, name)| async move {
            let data = self
                .call(vec![
                    ("function", "GLOBAL_QUOTE".to_string()),
                    ("symbol", symbol.to_string()),
                ])
                .await?;

            let quote = data
                .get("Global Quote")
                .filter(|q| q.as_object().is_some_and(|q| !q.is_empty()))
                .ok_or_else(|| InsightError::EmptyData(format!("no quote for {}", symbol)))?;

            let price = text(quote, "05. price")
                .and_then(|p| parse_number(&p))
                .ok_or_else(|| InsightError::EmptyData(format!("no price for {}", symbol)))?;

            Ok::<_, InsightError>(IndexQuote {
                name: name.to_string(),
                price: format!("{:.2}", price),
                change_percent: text(quote, "10. change percent").unwrap_or_else(|| "N/A".to_string()),
                volume: text(quote, "06. volume").unwrap_or_else(|| "N/A".to_string()),
            })
        });

        collect_available("major indices", join_all(fetches).await)
    }

    pub async fn forex_rates(&self) -> Result<Vec<ForexRate>> {
        let fetches = FOREX_PAIRS.iter().map(|(from, to)| async move {
            let pair = format!("{}/{}", from, to);
            let data = self
                .call(vec![
                    ("function", "CURRENCY_EXCHANGE_RATE".to_string()),
                    ("from_currency", from.to_string()),
                    ("to_currency", to.to_string()),
                ])
                .await?;

            let rate = data
                .get("Realtime Currency Exchange Rate")
                .ok_or_else(|| InsightError::EmptyData(format!("no rate for {}", pair)))?;

            let value = text(rate, "5. Exchange Rate")
                .and_then(|r| parse_number(&r))
                .ok_or_else(|| InsightError::EmptyData(format!("no rate for {}", pair)))?;

            Ok::<_, InsightError>(ForexRate {
                pair,
                rate: format!("{:.4}", value),
                change_percent: text(rate, "8. Change Percent").unwrap_or_else(|| "N/A".to_string()),
            })
        });

        collect_available("forex", join_all(fetches).await)
    }

    pub async fn crypto_quotes(&self) -> Result<Vec<CryptoQuote>> {
        let fetches = CRYPTO_SYMBOLS.iter().map(|symbol| async move {
            let data = self
                .call(vec![
                    ("function", "CRYPTO_RATING".to_string()),
                    ("symbol", symbol.to_string()),
                ])
                .await?;

            let rating = data
                .get("Crypto Rating")
                .ok_or_else(|| InsightError::EmptyData(format!("no rating for {}", symbol)))?;

            let price = text(rating, "Price")
                .and_then(|p| parse_number(&p))
                .ok_or_else(|| InsightError::EmptyData(format!("no price for {}", symbol)))?;

            Ok::<_, InsightError>(CryptoQuote {
                symbol: symbol.to_string(),
                price: format!("{:.2}", price),
                change_percent: text(rating, "Change Percent").unwrap_or_else(|| "N/A".to_string()),
                volume: text(rating, "Volume").unwrap_or_else(|| "N/A".to_string()),
            })
        });

        collect_available("crypto", join_all(fetches).await)
    }

    // =============================
    // Status probe
    // =============================

    /// Probe the provider: intraday first, then global quote
    pub async fn check_status(&self) -> ApiStatus {
        let probes = [QuoteTier::Intraday, QuoteTier::GlobalQuote];

        for tier in probes {
            let outcome = match self.fetch_raw(tier.query(STATUS_PROBE_SYMBOL)).await {
                Ok(data) => check_provider_response(&data),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => return ApiStatus::Online,
                Err(InsightError::RateLimited { .. }) => return ApiStatus::RateLimited,
                Err(e) => warn!(?tier, error = %e, "Status probe failed"),
            }
        }

        ApiStatus::Offline
    }
}

/// Keep the successful per-symbol results; fail only if none succeeded
fn collect_available<T>(what: &str, results: Vec<Result<T>>) -> Result<Vec<T>> {
    let mut available = Vec::with_capacity(results.len());

    for result in results {
        match result {
            Ok(item) => available.push(item),
            Err(e) => warn!(error = %e, "Skipping unavailable {} entry", what),
        }
    }

    if available.is_empty() {
        return Err(InsightError::EmptyData(format!("no {} data available", what)));
    }

    Ok(available)
}

fn parse_movers(data: &Value, key: &str) -> Vec<Mover> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .take(MAX_MOVERS)
                .filter_map(|item| {
                    Some(Mover {
                        ticker: text(item, "ticker")?,
                        change_percentage: text(item, "change_percentage")?,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Non-empty string field, ignoring the provider's "None" marker
fn text(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "None")
        .map(str::to_string)
}
