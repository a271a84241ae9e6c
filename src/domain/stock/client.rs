//! Stocks sub-client — basic info (TTL-cached), listing, search, refresh.

use crate::client::StockClient;
use crate::domain::stock::wire::{RefreshResponse, StockBasicResponse, StocksResponse};
use crate::domain::stock::{self, RefreshResult, StockBasic, StockList};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::StockCode;
use std::time::Instant;

/// Default number of search suggestions.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
/// Upper bound the server accepts for `limit`.
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// Sub-client for stock reference data.
pub struct Stocks<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Stocks<'a> {
    /// Basic info for one stock. Uses TTL cache.
    pub async fn basic(&self, code: &StockCode) -> Result<StockBasic, SdkError> {
        {
            let cache = self.client.basic_cache.read().await;
            if let Some((basic, fetched_at)) = cache.get(code) {
                if fetched_at.elapsed() < self.client.basic_cache_ttl {
                    tracing::debug!("basic info cache hit for {}", code);
                    return Ok(basic.clone());
                }
            }
        }

        let url = self
            .client
            .http
            .api_url(&format!("/stocks/{}/basic", code));
        let resp: StockBasicResponse = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        let basic: StockBasic = resp
            .try_into()
            .map_err(|e: stock::ValidationError| SdkError::Validation(e.to_string()))?;

        self.client
            .basic_cache
            .write()
            .await
            .insert(code.clone(), (basic.clone(), Instant::now()));
        Ok(basic)
    }

    /// Full local stock listing, optionally paged.
    pub async fn list(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<StockList, SdkError> {
        let mut url = self.client.http.api_url("/stocks");
        let mut params = Vec::new();
        if let Some(p) = page {
            params.push(format!("page={}", p));
        }
        if let Some(s) = page_size {
            params.push(format!("page_size={}", s));
        }
        if !params.is_empty() {
            url = format!("{}?{}", url, params.join("&"));
        }
        let resp: StocksResponse = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(resp.into())
    }

    /// Search by code, name or pinyin. A blank query returns no suggestions
    /// without touching the network. `limit` is clamped to `1..=50`.
    pub async fn search(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<StockBasic>, SdkError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let limit = limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);
        let url = format!(
            "{}?q={}&limit={}",
            self.client.http.api_url("/stocks/search"),
            urlencoding::encode(query),
            limit
        );
        let resp: StocksResponse = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(StockList::from(resp).stocks)
    }

    /// Ask the server to reload its local stock list.
    pub async fn refresh(&self) -> Result<RefreshResult, SdkError> {
        let url = self.client.http.api_url("/stocks/refresh");
        let resp: RefreshResponse = self
            .client
            .http
            .post(&url, &serde_json::json!({}), RetryPolicy::None)
            .await?;
        self.clear_cache().await;
        Ok(resp.into())
    }

    /// Invalidate one cached basic-info entry.
    pub async fn invalidate(&self, code: &StockCode) {
        self.client.basic_cache.write().await.remove(code);
    }

    pub async fn clear_cache(&self) {
        self.client.basic_cache.write().await.clear();
    }
}
