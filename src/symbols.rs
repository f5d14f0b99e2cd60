//! Ticker extraction and validation
//!
//! Heuristic only: a ticker is any whole-word run of one to five uppercase
//! letters. Lowercase tickers and class suffixes (`BRK.B`) are not recognised.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TICKER_PATTERN: Regex = Regex::new(r"\b[A-Z]{1,5}\b").expect("Invalid regex pattern");
}

/// Frequently requested tickers, accepted without further checks
const COMMON_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "TSLA", "NVDA", "JPM", "V", "WMT",
    "PG", "MA", "HD", "BAC", "DIS", "NFLX", "ADBE", "CSCO", "PEP", "INTC",
    "VZ", "KO", "T", "PFE", "MRK", "ABT", "CVX", "XOM", "AVGO", "QCOM",
    "TXN", "INTU", "AMAT", "AMD", "MU", "IBM", "ORCL", "CRM", "NOW", "ADP",
    "ACN", "PYPL", "SQ", "SHOP", "SNAP", "TWTR", "PINS", "ROKU", "ZM",
];

const MAX_SYMBOL_LEN: usize = 5;

/// All ticker-shaped tokens in `text`, in order of appearance
pub fn extract_symbols(text: &str) -> Vec<String> {
    TICKER_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Shape check with an allowlist short-circuit.
///
/// The allowlist never rejects: any 1-5 letter uppercase token passes.
pub fn is_valid_symbol(symbol: &str) -> bool {
    if symbol.is_empty() || symbol.len() > MAX_SYMBOL_LEN {
        return false;
    }

    if !symbol.chars().all(|c| c.is_ascii_uppercase()) {
        return false;
    }

    if COMMON_SYMBOLS.contains(&symbol) {
        return true;
    }

    (1..=MAX_SYMBOL_LEN).contains(&symbol.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_in_order() {
        assert_eq!(
            extract_symbols("Compare AAPL with MSFT and GOOGL"),
            vec!["AAPL", "MSFT", "GOOGL"]
        );
    }

    #[test]
    fn test_whole_words_only() {
        // Six letters or mixed case are not tickers
        assert!(extract_symbols("GOOGLE Apple aapl").is_empty());
        assert!(extract_symbols("what's the price of apple").is_empty());
    }

    #[test]
    fn test_validation_rules() {
        assert!(is_valid_symbol("AAPL"));
        assert!(is_valid_symbol("T"));
        // Not in the allowlist but still accepted by shape
        assert!(is_valid_symbol("ZZZZ"));

        assert!(!is_valid_symbol(""));
        assert!(!is_valid_symbol("TOOLONG"));
        assert!(!is_valid_symbol("aapl"));
        assert!(!is_valid_symbol("BRK.B"));
    }
}
