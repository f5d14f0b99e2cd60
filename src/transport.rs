//! HTTP transport shared by all gateways
//!
//! Gateways only see JSON in and JSON out. Non-success statuses and transport
//! failures both surface as `NetworkFailure`.

use crate::error::InsightError;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::error;

/// Query parameters as owned pairs
pub type Query = Vec<(&'static str, String)>;

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get_json(&self, url: &str, query: &Query) -> Result<Value>;
    async fn post_json(&self, url: &str, query: &Query, body: &Value) -> Result<Value>;
}

/// Connection-pooled reqwest transport
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    async fn read_json(response: reqwest::Response, url: &str) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("{} returned {}: {}", url, status, body);
            return Err(InsightError::NetworkFailure(format!(
                "HTTP {} from {}",
                status, url
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| InsightError::NetworkFailure(format!("Invalid JSON from {}: {}", url, e)))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, url: &str, query: &Query) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| InsightError::NetworkFailure(format!("GET {} failed: {}", url, e)))?;

        Self::read_json(response, url).await
    }

    async fn post_json(&self, url: &str, query: &Query, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .query(query)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| InsightError::NetworkFailure(format!("POST {} failed: {}", url, e)))?;

        Self::read_json(response, url).await
    }
}
