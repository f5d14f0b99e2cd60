//! Plain-text rendering of gateway records
//!
//! Two families of formats: standalone answers (one intent, one topic) and
//! section bodies for the comprehensive market report.

use crate::market_data::parse_number;
use crate::models::{
    CompanyOverview, CryptoQuote, ForexRate, IndexQuote, MarketSnapshot, Mover, NewsHeadline,
    SectorPerformance, TopMovers,
};

// =============================
// Standalone answers
// =============================

pub fn market_overview(movers: &TopMovers) -> String {
    let mut summary = String::from("Market Overview: ");

    if let Some(gainer) = movers.gainers.first() {
        summary.push_str(&format!(
            "Top gainers include {} (+{})",
            gainer.ticker,
            percent(&gainer.change_percentage)
        ));
    }

    if let Some(loser) = movers.losers.first() {
        let magnitude = parse_number(&loser.change_percentage)
            .map(|v| format!("{:.2}%", v.abs()))
            .unwrap_or_else(|| loser.change_percentage.clone());
        summary.push_str(&format!(", while {} is down {}", loser.ticker, magnitude));
    }

    summary.push_str(". The market is showing mixed trends today.");
    summary
}

pub fn company(overview: &CompanyOverview) -> String {
    format!(
        "{} ({}) is a {} company. {}",
        overview.name,
        overview.symbol,
        overview.sector.as_deref().unwrap_or("publicly traded"),
        overview
            .description
            .as_deref()
            .unwrap_or("No description available.")
    )
}

pub fn sector_performance(sectors: &[SectorPerformance]) -> String {
    if sectors.is_empty() {
        return "No sector performance data available at the moment.".to_string();
    }

    let mut out = String::from("Sector Performance:");
    for s in sectors {
        out.push_str(&format!("\n\n{}: {}", s.sector, percent(&s.performance)));
    }
    out
}

pub fn top_movers(movers: &TopMovers) -> String {
    let mut out = String::from("Top Gainers and Losers:");

    if !movers.gainers.is_empty() {
        out.push_str("\n\nTop Gainers:");
        for (i, m) in movers.gainers.iter().enumerate() {
            out.push_str(&format!("\n{}. {}: +{}", i + 1, m.ticker, percent(&m.change_percentage)));
        }
    }

    if !movers.losers.is_empty() {
        out.push_str("\n\nTop Losers:");
        for (i, m) in movers.losers.iter().enumerate() {
            out.push_str(&format!("\n{}. {}: {}", i + 1, m.ticker, percent(&m.change_percentage)));
        }
    }

    out
}

/// Search headlines, for one symbol or the whole market
pub fn headlines(symbol: Option<&str>, items: &[NewsHeadline]) -> String {
    if items.is_empty() {
        return match symbol {
            Some(s) => format!("No recent news found for {}.", s),
            None => "No recent market news found.".to_string(),
        };
    }

    let mut out = match symbol {
        Some(s) => format!("Latest news for {}:", s),
        None => "Latest market news:".to_string(),
    };

    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("\n\n{}. {}", i + 1, item.title));
    }
    out
}

// =============================
// Comprehensive report sections
// =============================

pub fn snapshot_section(snapshot: &MarketSnapshot) -> String {
    let market_cap = snapshot
        .market_cap
        .map(|cap| format!("${:.2}T", cap / 1e12))
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "S&P 500: {} (High) - {} (Low)\nMarket Cap: {}\nP/E Ratio: {}\nDividend Yield: {}%",
        snapshot.week_52_high,
        snapshot.week_52_low,
        market_cap,
        snapshot.pe_ratio,
        snapshot.dividend_yield
    )
}

pub fn indices_section(indices: &[IndexQuote]) -> String {
    indices
        .iter()
        .map(|i| format!("{}: ${} ({})", i.name, i.price, i.change_percent))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn sectors_section(sectors: &[SectorPerformance]) -> String {
    sectors
        .iter()
        .map(|s| format!("{}: {}", s.sector, with_percent_sign(&s.performance)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn movers_section(movers: &TopMovers) -> String {
    let list = |items: &[Mover], sign: &str| {
        items
            .iter()
            .map(|m| format!("{}: {}{}", m.ticker, sign, m.change_percentage))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Top Gainers:\n{}\n\nTop Losers:\n{}",
        list(&movers.gainers, "+"),
        list(&movers.losers, "")
    )
}

pub fn forex_section(rates: &[ForexRate]) -> String {
    rates
        .iter()
        .map(|r| format!("{}: {} ({})", r.pair, r.rate, r.change_percent))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn crypto_section(quotes: &[CryptoQuote]) -> String {
    quotes
        .iter()
        .map(|c| format!("{}: ${} ({})", c.symbol, c.price, c.change_percent))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn news_section(items: &[NewsHeadline]) -> String {
    items
        .iter()
        .map(|n| match &n.summary {
            Some(summary) => format!("{}\n{}\n", n.title, summary),
            None => format!("{}\n", n.title),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Two-decimal percentage from a raw provider value
fn percent(raw: &str) -> String {
    parse_number(raw)
        .map(|v| format!("{:.2}%", v))
        .unwrap_or_else(|| with_percent_sign(raw))
}

fn with_percent_sign(raw: &str) -> String {
    if raw.ends_with('%') {
        raw.to_string()
    } else {
        format!("{}%", raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mover(ticker: &str, change: &str) -> Mover {
        Mover {
            ticker: ticker.to_string(),
            change_percentage: change.to_string(),
        }
    }

    #[test]
    fn test_market_overview_sentence() {
        let movers = TopMovers {
            gainers: vec![mover("ABC", "45.6789%")],
            losers: vec![mover("XYZ", "-12.3456%")],
        };

        assert_eq!(
            market_overview(&movers),
            "Market Overview: Top gainers include ABC (+45.68%), while XYZ is down 12.35%. The market is showing mixed trends today."
        );
    }

    #[test]
    fn test_top_movers_numbering() {
        let movers = TopMovers {
            gainers: vec![mover("A", "10%"), mover("B", "5%")],
            losers: vec![],
        };

        let text = top_movers(&movers);
        assert!(text.contains("\n1. A: +10.00%\n2. B: +5.00%"));
        assert!(!text.contains("Top Losers"));
    }

    #[test]
    fn test_sector_text() {
        assert_eq!(
            sector_performance(&[]),
            "No sector performance data available at the moment."
        );

        let sectors = vec![SectorPerformance {
            sector: "Energy".into(),
            performance: "1.2%".into(),
        }];
        assert_eq!(sector_performance(&sectors), "Sector Performance:\n\nEnergy: 1.20%");
        assert_eq!(sectors_section(&sectors), "Energy: 1.2%");
    }

    #[test]
    fn test_company_defaults() {
        let overview = CompanyOverview {
            symbol: "IBM".into(),
            name: "International Business Machines".into(),
            sector: Some("TECHNOLOGY".into()),
            description: None,
        };
        assert_eq!(
            company(&overview),
            "International Business Machines (IBM) is a TECHNOLOGY company. No description available."
        );
    }

    #[test]
    fn test_headlines() {
        assert_eq!(headlines(Some("AAPL"), &[]), "No recent news found for AAPL.");

        let items = vec![NewsHeadline {
            title: "Stocks rally".into(),
            summary: None,
        }];
        assert_eq!(headlines(None, &items), "Latest market news:\n\n1. Stocks rally");
    }

    #[test]
    fn test_snapshot_section() {
        let snapshot = MarketSnapshot {
            week_52_high: "520.00".into(),
            week_52_low: "410.00".into(),
            market_cap: Some(4.5e12),
            pe_ratio: "24.1".into(),
            dividend_yield: "1.3".into(),
        };
        assert_eq!(
            snapshot_section(&snapshot),
            "S&P 500: 520.00 (High) - 410.00 (Low)\nMarket Cap: $4.50T\nP/E Ratio: 24.1\nDividend Yield: 1.3%"
        );
    }
}
