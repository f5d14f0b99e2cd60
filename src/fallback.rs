//! Offline quote synthesis
//!
//! Used only after every live quote tier has failed. Values are derived from
//! a hash of the symbol, so the same symbol always gets the same numbers.
//! Callers must tell the user the data is not live.

use crate::models::Quote;
use chrono::Utc;

pub struct FallbackSynthesizer;

impl FallbackSynthesizer {
    /// Stable pseudo-quote for `symbol`.
    ///
    /// price in [100, 1000), change in [-5%, +5%), volume in
    /// [1,000,000, 10,000,000).
    pub fn synthesize(symbol: &str) -> Quote {
        let hash = symbol_hash(symbol);

        let price = (hash % 900 + 100) as f64;
        let change = ((hash % 20) as f64 - 10.0) / 2.0;
        let volume = hash % 9_000_000 + 1_000_000;

        Quote {
            symbol: symbol.to_string(),
            price: format!("{:.2}", price),
            change_percent: format!("{:.2}%", change),
            volume: group_thousands(volume),
            is_real_time: false,
            timestamp: Some(Utc::now().to_rfc3339()),
        }
    }
}

/// 32-bit `h * 31 + c` string hash over UTF-16 code units, absolute value
pub fn symbol_hash(symbol: &str) -> u64 {
    let hash = symbol
        .encode_utf16()
        .fold(0i32, |h, c| h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32));

    (hash as i64).unsigned_abs()
}

/// `1234567` -> `"1,234,567"`
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_values() {
        assert_eq!(symbol_hash("A"), 65);
        assert_eq!(symbol_hash("AAPL"), 2_001_436);
        assert_eq!(symbol_hash("ZZZZ"), 2_770_560);
    }

    #[test]
    fn test_known_symbol() {
        let quote = FallbackSynthesizer::synthesize("AAPL");
        assert_eq!(quote.price, "836.00");
        assert_eq!(quote.change_percent, "3.00%");
        assert_eq!(quote.volume, "3,001,436");
        assert!(!quote.is_real_time);
        assert!(quote.timestamp.is_some());
    }

    #[test]
    fn test_deterministic() {
        for symbol in ["ZZZZ", "MSFT", "T", "QQQQQ"] {
            let a = FallbackSynthesizer::synthesize(symbol);
            let b = FallbackSynthesizer::synthesize(symbol);
            assert_eq!(a.price, b.price);
            assert_eq!(a.change_percent, b.change_percent);
            assert_eq!(a.volume, b.volume);
        }
    }

    #[test]
    fn test_value_ranges() {
        for symbol in ["A", "AB", "ABC", "ABCD", "ABCDE", "ZZZZ", "XOM"] {
            let quote = FallbackSynthesizer::synthesize(symbol);

            let price: f64 = quote.price.parse().unwrap();
            assert!((100.0..1000.0).contains(&price));

            let change: f64 = quote.change_percent.trim_end_matches('%').parse().unwrap();
            assert!((-5.0..5.0).contains(&change));

            let volume: u64 = quote.volume.replace(',', "").parse().unwrap();
            assert!((1_000_000..10_000_000).contains(&volume));
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(10_000_000), "10,000,000");
    }
}
