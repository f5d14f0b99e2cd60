//! Stock Market Insights Bot
//!
//! A chat bot that answers questions about stocks and markets:
//! - Routes each message to an intent by keywords and ticker symbols
//! - Fetches quotes through a three-tier provider fallback, then a cache,
//!   then a deterministic synthesized quote
//! - Builds a seven-section market report from concurrent fetches
//! - Appends AI commentary without ever blocking the underlying data
//!
//! FLOW:
//! MESSAGE → CLASSIFY → FETCH (cache / tiers / fallback) → RENDER → ENHANCE

pub mod aggregation;
pub mod api;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod conversational;
pub mod enhancer;
pub mod error;
pub mod fallback;
pub mod gemini;
pub mod market_data;
pub mod models;
pub mod news;
pub mod report;
pub mod symbols;
pub mod transport;

pub use error::Result;

// Re-export common types
pub use classifier::{Intent, IntentRouter};
pub use conversational::{ChatBot, ChatReply};
pub use models::*;
