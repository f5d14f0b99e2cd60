//! Search-backed news lookups
//!
//! There is no dedicated news provider: headlines are approximated from a
//! general search API's snippet titles.

use crate::models::NewsHeadline;
use crate::transport::HttpTransport;
use crate::Result;
use serde_json::Value;
use std::sync::Arc;

const MAX_RESULTS: usize = 3;
const MARKET_NEWS_QUERY: &str = "stock market news today";

pub struct NewsGateway {
    transport: Arc<dyn HttpTransport>,
    search_url: String,
    api_key: String,
}

impl NewsGateway {
    pub fn new(transport: Arc<dyn HttpTransport>, search_url: String, api_key: String) -> Self {
        Self {
            transport,
            search_url,
            api_key,
        }
    }

    pub async fn stock_news(&self, symbol: &str) -> Result<Vec<NewsHeadline>> {
        self.search(&format!("{} stock news", symbol)).await
    }

    pub async fn market_news(&self) -> Result<Vec<NewsHeadline>> {
        self.search(MARKET_NEWS_QUERY).await
    }

    /// Snippet titles for `query`; empty when nothing matched
    async fn search(&self, query: &str) -> Result<Vec<NewsHeadline>> {
        let params = vec![
            ("part", "snippet".to_string()),
            ("q", query.to_string()),
            ("key", self.api_key.clone()),
            ("maxResults", MAX_RESULTS.to_string()),
        ];

        let data = self.transport.get_json(&self.search_url, &params).await?;

        let headlines = data
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.pointer("/snippet/title").and_then(Value::as_str))
                    .map(|title| NewsHeadline {
                        title: title.to_string(),
                        summary: None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(headlines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::stub::StubTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_titles_extracted() {
        let stub = Arc::new(StubTransport::new().respond(
            "http://search",
            json!({"items": [
                {"snippet": {"title": "Apple beats estimates"}},
                {"snippet": {}},
                {"snippet": {"title": "Apple unveils new chip"}}
            ]}),
        ));
        let news = NewsGateway::new(stub, "http://search".into(), "key".into());

        let headlines = news.stock_news("AAPL").await.unwrap();
        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[1].title, "Apple unveils new chip");
    }

    #[tokio::test]
    async fn test_missing_items_is_empty() {
        let stub = Arc::new(StubTransport::new().respond("http://search", json!({"kind": "searchListResponse"})));
        let news = NewsGateway::new(stub, "http://search".into(), "key".into());
        assert!(news.market_news().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_http_failure_propagates() {
        let stub = Arc::new(StubTransport::new().fail("http://search"));
        let news = NewsGateway::new(stub, "http://search".into(), "key".into());
        assert!(news.market_news().await.is_err());
    }
}
