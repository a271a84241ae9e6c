//! High-level client — `StockClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared cache state, and accessor methods.

use crate::domain::backtest::client::Backtests;
use crate::domain::daily::client::Daily;
use crate::domain::favorite::client::{Favorites, Groups};
use crate::domain::fundamental::client::Fundamentals;
use crate::domain::health::client::Health;
use crate::domain::health::HealthStatus;
use crate::domain::indicator::client::Indicators;
use crate::domain::pattern::client::Patterns;
use crate::domain::prediction::client::Predictions;
use crate::domain::stock::client::Stocks;
use crate::domain::stock::StockBasic;
use crate::domain::strategy::client::Strategies;
use crate::error::SdkError;
use crate::http::client::DEFAULT_TIMEOUT;
use crate::http::StockHttp;
use crate::shared::{Adjust, StockCode};
use crate::view::prefs::Preferences;

use async_lock::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Re-export sub-client types for convenience.
pub use crate::domain::backtest::client::Backtests as BacktestsClient;
pub use crate::domain::daily::client::Daily as DailyClient;
pub use crate::domain::favorite::client::Favorites as FavoritesClient;
pub use crate::domain::favorite::client::Groups as GroupsClient;
pub use crate::domain::fundamental::client::Fundamentals as FundamentalsClient;
pub use crate::domain::health::client::Health as HealthClient;
pub use crate::domain::indicator::client::Indicators as IndicatorsClient;
pub use crate::domain::pattern::client::Patterns as PatternsClient;
pub use crate::domain::prediction::client::Predictions as PredictionsClient;
pub use crate::domain::stock::client::Stocks as StocksClient;
pub use crate::domain::strategy::client::Strategies as StrategiesClient;

/// The primary entry point for the SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.stocks()`, `client.daily()`, etc. Cheap to clone; clones share
/// the basic-info cache.
pub struct StockClient {
    pub(crate) http: StockHttp,
    /// Basic-info cache: ts_code → (StockBasic, fetched_at)
    pub(crate) basic_cache: Arc<RwLock<HashMap<StockCode, (StockBasic, Instant)>>>,
    pub(crate) basic_cache_ttl: Duration,
    /// Price adjustment used when a daily request doesn't name one.
    pub(crate) adjust: Adjust,
}

impl StockClient {
    pub fn builder() -> StockClientBuilder {
        StockClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn health(&self) -> Health<'_> {
        Health { client: self }
    }

    pub fn stocks(&self) -> Stocks<'_> {
        Stocks { client: self }
    }

    pub fn daily(&self) -> Daily<'_> {
        Daily { client: self }
    }

    pub fn indicators(&self) -> Indicators<'_> {
        Indicators { client: self }
    }

    pub fn predictions(&self) -> Predictions<'_> {
        Predictions { client: self }
    }

    pub fn fundamentals(&self) -> Fundamentals<'_> {
        Fundamentals { client: self }
    }

    pub fn favorites(&self) -> Favorites<'_> {
        Favorites { client: self }
    }

    pub fn groups(&self) -> Groups<'_> {
        Groups { client: self }
    }

    pub fn patterns(&self) -> Patterns<'_> {
        Patterns { client: self }
    }

    pub fn strategies(&self) -> Strategies<'_> {
        Strategies { client: self }
    }

    pub fn backtests(&self) -> Backtests<'_> {
        Backtests { client: self }
    }

    /// One health request, made only when the user asks for it. The server
    /// checks its data source; a degraded answer is still `Ok`.
    pub async fn test_connection(&self) -> Result<HealthStatus, SdkError> {
        tracing::debug!("testing connection to {}", self.base_url());
        self.health().check(true).await
    }

    /// Clear all HTTP caches.
    pub async fn clear_all_caches(&self) {
        self.basic_cache.write().await.clear();
    }
}

impl Clone for StockClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            basic_cache: self.basic_cache.clone(),
            basic_cache_ttl: self.basic_cache_ttl,
            adjust: self.adjust,
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct StockClientBuilder {
    base_url: String,
    timeout: Duration,
    basic_cache_ttl: Duration,
    adjust: Adjust,
}

impl Default for StockClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            basic_cache_ttl: Duration::from_secs(300),
            adjust: Adjust::default(),
        }
    }
}

impl StockClientBuilder {
    /// Defaults, with the base URL taken from `STOCK_API_URL` when set.
    pub fn from_env() -> Self {
        let builder = Self::default();
        match std::env::var(crate::network::API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => builder.base_url(url.trim()),
            _ => builder,
        }
    }

    /// Defaults, with the saved server override applied when present.
    pub fn from_preferences(prefs: &Preferences) -> Self {
        let builder = Self::default();
        match prefs.server_url() {
            Some(url) => builder.base_url(&url),
            None => builder,
        }
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn basic_cache_ttl(mut self, ttl: Duration) -> Self {
        self.basic_cache_ttl = ttl;
        self
    }

    pub fn adjust(mut self, adjust: Adjust) -> Self {
        self.adjust = adjust;
        self
    }

    pub fn build(self) -> Result<StockClient, SdkError> {
        let base_url = self.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SdkError::Validation(format!(
                "base URL must start with http:// or https://, got {:?}",
                base_url
            )));
        }
        Ok(StockClient {
            http: StockHttp::new(base_url, self.timeout)?,
            basic_cache: Arc::new(RwLock::new(HashMap::new())),
            basic_cache_ttl: self.basic_cache_ttl,
            adjust: self.adjust,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::prefs::MemoryStore;

    #[test]
    fn test_builder_defaults() {
        let client = StockClient::builder().build().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8081");
        assert_eq!(client.adjust, Adjust::Qfq);
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let result = StockClient::builder().base_url("localhost:8081").build();
        assert!(matches!(result, Err(SdkError::Validation(_))));
    }

    #[test]
    fn test_builder_from_preferences() {
        let prefs = Preferences::new(MemoryStore::default());
        prefs.set_server_url(Some("http://10.0.2.2:8081/"));
        let client = StockClientBuilder::from_preferences(&prefs).build().unwrap();
        assert_eq!(client.base_url(), "http://10.0.2.2:8081");
    }
}
