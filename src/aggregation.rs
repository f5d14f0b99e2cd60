//! Comprehensive market report
//!
//! Seven independent fetches run concurrently. Each one has its own failure
//! boundary: a failed or empty source becomes its placeholder text, so the
//! report always has the same seven sections in the same order.

use crate::market_data::MarketDataGateway;
use crate::report;
use crate::Result;
use std::fmt;
use tracing::{info, warn};

pub const REPORT_TITLE: &str = "📊 Comprehensive Market Report";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSection {
    Overview,
    Indices,
    Sector,
    Movers,
    Forex,
    Crypto,
    News,
}

impl ReportSection {
    /// Sections in document order
    pub const ORDER: [ReportSection; 7] = [
        ReportSection::Overview,
        ReportSection::Indices,
        ReportSection::Sector,
        ReportSection::Movers,
        ReportSection::Forex,
        ReportSection::Crypto,
        ReportSection::News,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            ReportSection::Overview => "🏛️ Market Overview:",
            ReportSection::Indices => "📈 Major Indices:",
            ReportSection::Sector => "📊 Sector Performance:",
            ReportSection::Movers => "🚀 Top Movers:",
            ReportSection::Forex => "💱 Forex Markets:",
            ReportSection::Crypto => "₿ Cryptocurrencies:",
            ReportSection::News => "📰 Latest Market News:",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            ReportSection::Overview => "Market overview data unavailable",
            ReportSection::Indices => "Major indices data unavailable",
            ReportSection::Sector => "Sector performance data unavailable",
            ReportSection::Movers => "Top gainers/losers data unavailable",
            ReportSection::Forex => "Forex data unavailable",
            ReportSection::Crypto => "Cryptocurrency data unavailable",
            ReportSection::News => "Market news unavailable",
        }
    }
}

/// One section's body; never empty
#[derive(Debug, Clone, PartialEq)]
pub struct SourceReport {
    pub section: ReportSection,
    pub body: String,
    pub available: bool,
}

impl SourceReport {
    /// Rendered body, or the section placeholder on error or empty output
    fn from_result(section: ReportSection, result: Result<String>) -> Self {
        match result {
            Ok(body) if !body.trim().is_empty() => Self {
                section,
                body,
                available: true,
            },
            Ok(_) => {
                warn!(?section, "Source returned no data, using placeholder");
                Self::placeholder(section)
            }
            Err(e) => {
                warn!(?section, error = %e, "Source failed, using placeholder");
                Self::placeholder(section)
            }
        }
    }

    fn placeholder(section: ReportSection) -> Self {
        Self {
            section,
            body: section.placeholder().to_string(),
            available: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComprehensiveReport {
    pub sections: Vec<SourceReport>,
}

impl ComprehensiveReport {
    pub fn available_count(&self) -> usize {
        self.sections.iter().filter(|s| s.available).count()
    }
}

impl fmt::Display for ComprehensiveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", REPORT_TITLE)?;
        for s in &self.sections {
            write!(f, "\n\n{}\n{}", s.section.header(), s.body)?;
        }
        Ok(())
    }
}

pub struct AggregationPipeline<'a> {
    gateway: &'a MarketDataGateway,
}

impl<'a> AggregationPipeline<'a> {
    pub fn new(gateway: &'a MarketDataGateway) -> Self {
        Self { gateway }
    }

    /// Fetch all seven sources concurrently and assemble the report
    pub async fn run(&self) -> ComprehensiveReport {
        let gateway = self.gateway;

        let (overview, indices, sector, movers, forex, crypto, news) = tokio::join!(
            async { gateway.market_snapshot().await.map(|s| report::snapshot_section(&s)) },
            async { gateway.major_indices().await.map(|i| report::indices_section(&i)) },
            async { gateway.sector_performance().await.map(|s| report::sectors_section(&s)) },
            async {
                gateway.top_movers().await.map(|m| {
                    if m.gainers.is_empty() && m.losers.is_empty() {
                        String::new()
                    } else {
                        report::movers_section(&m)
                    }
                })
            },
            async { gateway.forex_rates().await.map(|r| report::forex_section(&r)) },
            async { gateway.crypto_quotes().await.map(|c| report::crypto_section(&c)) },
            async { gateway.market_news().await.map(|n| report::news_section(&n)) },
        );

        let results = [overview, indices, sector, movers, forex, crypto, news];
        let sections: Vec<SourceReport> = ReportSection::ORDER
            .into_iter()
            .zip(results)
            .map(|(section, result)| SourceReport::from_result(section, result))
            .collect();

        let report = ComprehensiveReport { sections };
        info!(
            available = report.available_count(),
            total = ReportSection::ORDER.len(),
            "Comprehensive report assembled"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::stub::StubTransport;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn full_stub() -> StubTransport {
        StubTransport::new()
            .respond(
                "OVERVIEW:SPY",
                json!({"52WeekHigh": "520.00", "52WeekLow": "410.00", "MarketCapitalization": "500000000000", "PERatio": "24.1", "DividendYield": "1.3"}),
            )
            .respond(
                "GLOBAL_QUOTE",
                json!({"Global Quote": {"05. price": "100", "06. volume": "1", "10. change percent": "0.1%"}}),
            )
            .respond("SECTOR", json!({"Rank A: Real-Time Performance": {"Energy": "1.2%"}}))
            .respond(
                "TOP_GAINERS_LOSERS",
                json!({"top_gainers": [{"ticker": "UP", "change_percentage": "9%"}], "top_losers": [{"ticker": "DN", "change_percentage": "-9%"}]}),
            )
            .respond(
                "CURRENCY_EXCHANGE_RATE",
                json!({"Realtime Currency Exchange Rate": {"5. Exchange Rate": "1.08421"}}),
            )
            .respond("CRYPTO_RATING", json!({"Crypto Rating": {"Price": "64000", "Change Percent": "2%", "Volume": "1"}}))
            .respond("NEWS_SENTIMENT", json!({"feed": [{"title": "Markets rise", "summary": "Broad gains."}]}))
    }

    fn gateway(stub: StubTransport) -> MarketDataGateway {
        MarketDataGateway::new(Arc::new(stub), "http://av".into(), "key".into())
    }

    fn assert_sections_in_order(text: &str) {
        let mut last = 0;
        for section in ReportSection::ORDER {
            let pos = text
                .find(section.header())
                .unwrap_or_else(|| panic!("missing header {}", section.header()));
            assert!(pos >= last, "{} out of order", section.header());
            last = pos;
        }
    }

    #[test]
    fn test_headers_are_distinct() {
        let headers: Vec<&str> = ReportSection::ORDER.iter().map(|s| s.header()).collect();
        assert_eq!(
            headers,
            vec![
                "🏛️ Market Overview:",
                "📈 Major Indices:",
                "📊 Sector Performance:",
                "🚀 Top Movers:",
                "💱 Forex Markets:",
                "₿ Cryptocurrencies:",
                "📰 Latest Market News:",
            ]
        );
    }

    #[tokio::test]
    async fn test_all_sources_available() {
        let gateway = gateway(full_stub());
        let report = AggregationPipeline::new(&gateway).run().await;

        assert_eq!(report.available_count(), 7);
        let text = report.to_string();
        assert!(text.starts_with(REPORT_TITLE));
        assert_sections_in_order(&text);
        assert!(text.contains("S&P 500: $100.00 (0.1%)"));
        assert!(text.contains("EUR/USD: 1.0842 (N/A)"));
        assert!(text.contains("Markets rise\nBroad gains."));
    }

    #[tokio::test]
    async fn test_sector_failure_keeps_shape() {
        let gateway = gateway(full_stub().fail("SECTOR"));
        let report = AggregationPipeline::new(&gateway).run().await;

        assert_eq!(report.available_count(), 6);
        let sector = &report.sections[2];
        assert_eq!(sector.section, ReportSection::Sector);
        assert!(!sector.available);

        let text = report.to_string();
        assert_sections_in_order(&text);
        assert!(text.contains("📊 Sector Performance:\nSector performance data unavailable"));
    }

    #[tokio::test]
    async fn test_total_outage_is_all_placeholders() {
        let gateway = gateway(StubTransport::new());
        let report = AggregationPipeline::new(&gateway).run().await;

        assert_eq!(report.available_count(), 0);
        let text = report.to_string();
        assert_sections_in_order(&text);
        for section in ReportSection::ORDER {
            assert!(text.contains(section.placeholder()));
        }
    }

    #[tokio::test]
    async fn test_rate_limited_source_uses_placeholder() {
        let limited: Value = json!({"Note": "API call frequency exceeded"});
        let gateway = gateway(full_stub().respond("NEWS_SENTIMENT", limited));
        let report = AggregationPipeline::new(&gateway).run().await;

        assert_eq!(report.sections[6].body, "Market news unavailable");
    }
}
