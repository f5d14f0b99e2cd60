//! Runtime configuration
//!
//! All credentials and endpoints come from the environment (optionally a `.env`
//! file). Nothing is hard-coded except public default endpoints.

use crate::error::InsightError;
use crate::Result;
use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
pub const DEFAULT_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub alpha_vantage_api_key: String,
    pub alpha_vantage_url: String,
    pub gemini_api_key: String,
    pub gemini_url: String,
    pub search_api_key: String,
    pub search_url: String,
    /// Maximum age of a cached quote
    pub quote_cache_ttl: Duration,
    pub http_timeout: Duration,
    pub port: u16,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: String::new(),
            alpha_vantage_url: DEFAULT_ALPHA_VANTAGE_URL.to_string(),
            gemini_api_key: String::new(),
            gemini_url: DEFAULT_GEMINI_URL.to_string(),
            search_api_key: String::new(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            quote_cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            port: DEFAULT_PORT,
        }
    }
}

impl BotConfig {
    /// Load `.env` (if present) and read configuration from the environment.
    ///
    /// Missing API keys are logged, not fatal: the bot still answers with
    /// fallback data and apologies when upstream calls are rejected.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let alpha_vantage_api_key = required_key(&lookup, &["ALPHA_VANTAGE_API_KEY"]);
        let gemini_api_key = required_key(&lookup, &["GEMINI_API_KEY"]);
        let search_api_key = required_key(&lookup, &["SEARCH_API_KEY", "GOOGLE_API_KEY"]);

        let quote_cache_ttl = match lookup("QUOTE_CACHE_TTL_SECS") {
            Some(v) => Duration::from_secs(parse_number(&v, "QUOTE_CACHE_TTL_SECS")?),
            None => defaults.quote_cache_ttl,
        };

        let http_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_number(&v, "HTTP_TIMEOUT_SECS")?),
            None => defaults.http_timeout,
        };

        let port = match lookup("PORT").or_else(|| lookup("API_PORT")) {
            Some(v) => parse_number(&v, "PORT")?,
            None => defaults.port,
        };

        Ok(Self {
            alpha_vantage_api_key,
            alpha_vantage_url: lookup("ALPHA_VANTAGE_BASE_URL")
                .unwrap_or(defaults.alpha_vantage_url),
            gemini_api_key,
            gemini_url: lookup("GEMINI_API_URL").unwrap_or(defaults.gemini_url),
            search_api_key,
            search_url: lookup("SEARCH_API_URL").unwrap_or(defaults.search_url),
            quote_cache_ttl,
            http_timeout,
            port,
        })
    }
}

fn required_key<F>(lookup: &F, names: &[&str]) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let value = names
        .iter()
        .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()));

    match value {
        Some(v) => v,
        None => {
            warn!("{} not set; dependent API calls will fail", names[0]);
            String::new()
        }
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| InsightError::ConfigError(format!("{} must be a number, got '{}'", name, raw)))
}
