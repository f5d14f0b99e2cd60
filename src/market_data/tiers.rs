//! Quote tiers, from best to worst data quality
//!
//! Each tier knows which provider function to call and how to turn the raw
//! response into a `Quote`. Parsing is pure so tiers can be tested without
//! a transport.

use super::{check_provider_response, parse_number};
use crate::error::InsightError;
use crate::models::Quote;
use crate::transport::Query;
use crate::Result;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteTier {
    /// Real-time snapshot
    GlobalQuote,
    /// Latest 5-minute bar
    Intraday,
    /// Latest daily bar, not real-time
    Daily,
}

impl QuoteTier {
    /// Tiers in the order they are attempted
    pub const CHAIN: [QuoteTier; 3] = [QuoteTier::GlobalQuote, QuoteTier::Intraday, QuoteTier::Daily];

    pub fn function(&self) -> &'static str {
        match self {
            QuoteTier::GlobalQuote => "GLOBAL_QUOTE",
            QuoteTier::Intraday => "TIME_SERIES_INTRADAY",
            QuoteTier::Daily => "TIME_SERIES_DAILY",
        }
    }

    pub fn query(&self, symbol: &str) -> Query {
        let mut query = vec![
            ("function", self.function().to_string()),
            ("symbol", symbol.to_string()),
        ];
        if *self == QuoteTier::Intraday {
            query.push(("interval", "5min".to_string()));
        }
        query
    }

    /// Turn a provider response into a quote, or explain why it is unusable
    pub fn parse(&self, symbol: &str, data: &Value) -> Result<Quote> {
        check_provider_response(data)?;

        match self {
            QuoteTier::GlobalQuote => parse_global_quote(symbol, data),
            QuoteTier::Intraday => {
                let (_, bar) = latest_bar(data, "Time Series (5min)")?;
                quote_from_bar(symbol, bar, true, None)
            }
            QuoteTier::Daily => {
                let (date, bar) = latest_bar(data, "Time Series (Daily)")?;
                quote_from_bar(symbol, bar, false, Some(date.to_string()))
            }
        }
    }
}

/// Percentage move from `open` to `close`, two decimals with a trailing `%`
pub fn calculate_change(close: f64, open: f64) -> String {
    let change = (close - open) / open * 100.0;
    format!("{:.2}%", change)
}

fn parse_global_quote(symbol: &str, data: &Value) -> Result<Quote> {
    let quote = data
        .get("Global Quote")
        .and_then(Value::as_object)
        .ok_or_else(|| InsightError::EmptyData(format!("no global quote for {}", symbol)))?;

    let price = field_number(quote, "05. price")
        .ok_or_else(|| InsightError::EmptyData(format!("no price in global quote for {}", symbol)))?;

    Ok(Quote {
        symbol: symbol.to_string(),
        price: format!("{:.2}", price),
        change_percent: global_quote_change(quote),
        volume: field_text(quote, "06. volume"),
        is_real_time: true,
        timestamp: None,
    })
}

/// Reported change percent, else derived from the absolute change and the
/// previous close, else `N/A`
fn global_quote_change(quote: &Map<String, Value>) -> String {
    if let Some(change) = field_number(quote, "10. change percent") {
        return format!("{:.2}%", change);
    }

    match (
        field_number(quote, "09. change"),
        field_number(quote, "08. previous close").filter(|close| *close != 0.0),
    ) {
        (Some(change), Some(previous)) => format!("{:.2}%", change / previous * 100.0),
        _ => "N/A".to_string(),
    }
}

/// Most recent entry of a time-series map. Keys are timestamps that sort
/// chronologically, so the greatest key is the latest bar.
fn latest_bar<'a>(data: &'a Value, series_key: &str) -> Result<(&'a str, &'a Map<String, Value>)> {
    let series = data
        .get(series_key)
        .and_then(Value::as_object)
        .filter(|series| !series.is_empty())
        .ok_or_else(|| InsightError::EmptyData(format!("no '{}' data", series_key)))?;

    series
        .iter()
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .and_then(|(ts, bar)| bar.as_object().map(|bar| (ts.as_str(), bar)))
        .ok_or_else(|| InsightError::EmptyData(format!("malformed '{}' bar", series_key)))
}

fn quote_from_bar(
    symbol: &str,
    bar: &Map<String, Value>,
    is_real_time: bool,
    timestamp: Option<String>,
) -> Result<Quote> {
    let close = field_number(bar, "4. close")
        .ok_or_else(|| InsightError::EmptyData(format!("bar for {} has no close", symbol)))?;
    let open = field_number(bar, "1. open")
        .filter(|open| *open != 0.0)
        .ok_or_else(|| InsightError::EmptyData(format!("bar for {} has no open", symbol)))?;

    Ok(Quote {
        symbol: symbol.to_string(),
        price: format!("{:.2}", close),
        change_percent: calculate_change(close, open),
        volume: field_text(bar, "5. volume"),
        is_real_time,
        timestamp,
    })
}

fn field_number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_str).and_then(parse_number)
}

fn field_text(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("N/A")
        .to_string()
}
