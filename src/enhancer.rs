//! AI commentary on top of fetched market data
//!
//! The AI layer is strictly additive: whatever goes wrong upstream, the
//! caller still gets the data it passed in.

use crate::gemini::GeminiClient;
use tracing::warn;

/// Shown when no better answer can be produced
pub const HELP_MESSAGE: &str = "I can help you with stock prices, market trends, and company information. Try asking about any stock symbol (e.g., AAPL, GOOGL, MSFT), market trends, or company information.";

const INSIGHTS_MARKER: &str = "🤖 AI INSIGHTS:";

pub struct InsightEnhancer {
    client: GeminiClient,
}

impl InsightEnhancer {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Append AI insights to `data`; on any failure return `data` unchanged
    pub async fn enhance(&self, data: &str, user_query: &str, symbol: Option<&str>) -> String {
        let prompt = build_insight_prompt(data, user_query, symbol);

        match self.client.generate(&prompt).await {
            Ok(insights) => format!("{}\n\n{}\n{}", data, INSIGHTS_MARKER, insights),
            Err(e) => {
                warn!(error = %e, "AI enhancement failed, returning raw data");
                data.to_string()
            }
        }
    }

    /// Answer a question that has no market data behind it
    pub async fn answer(&self, user_query: &str) -> String {
        let prompt = build_free_form_prompt(user_query);

        match self.client.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "AI answer failed, returning help text");
                HELP_MESSAGE.to_string()
            }
        }
    }
}

fn build_insight_prompt(data: &str, user_query: &str, symbol: Option<&str>) -> String {
    let mut prompt = format!(
        "You are a financial analyst assistant. I have the following market data: \"{}\".\n\
         The user asked: \"{}\".\n\
         Please provide a concise, insightful analysis of this data. \
         Focus on key trends, potential implications, and actionable insights. \
         Keep your response under 300 words and maintain a professional tone.",
        data, user_query
    );

    if let Some(symbol) = symbol {
        prompt.push_str(&format!(
            " This data is specifically about the stock symbol {}.",
            symbol
        ));
    }

    prompt
}

fn build_free_form_prompt(user_query: &str) -> String {
    format!(
        "You are a financial analyst assistant. The user asked: \"{}\".\n\
         Please provide a helpful, concise response about stocks, market trends, or financial information. \
         If the query is not related to finance, politely redirect the user to ask about stocks, market trends, or company information. \
         Keep your response under 200 words and maintain a professional tone.",
        user_query
    )
}
