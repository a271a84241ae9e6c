//! Patterns sub-client.

use crate::client::StockClient;
use crate::domain::pattern::PatternSearch;
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::{DateRange, StockCode};
use serde_json::Value;

pub struct Patterns<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Patterns<'a> {
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, SdkError> {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let mut url = self.client.http.api_url(path);
        if !query.is_empty() {
            url = format!("{}?{}", url, query);
        }
        self.client.http.get(&url, RetryPolicy::Idempotent).await
    }

    pub async fn recognize(&self, code: &StockCode, range: &DateRange) -> Result<Value, SdkError> {
        self.get_json(
            "/patterns/recognize",
            &[
                ("ts_code", code.to_string()),
                ("start_date", range.start_param()),
                ("end_date", range.end_param()),
            ],
        )
        .await
    }

    pub async fn search(&self, search: &PatternSearch) -> Result<Value, SdkError> {
        let url = self.client.http.api_url("/patterns/search");
        self.client.http.post(&url, search, RetryPolicy::None).await
    }

    pub async fn summary(&self, code: &StockCode, days: u32) -> Result<Value, SdkError> {
        self.get_json(
            "/patterns/summary",
            &[("ts_code", code.to_string()), ("days", days.to_string())],
        )
        .await
    }

    pub async fn recent(&self, code: &StockCode, limit: u32) -> Result<Value, SdkError> {
        self.get_json(
            "/patterns/recent",
            &[("ts_code", code.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    pub async fn available(&self) -> Result<Value, SdkError> {
        self.get_json("/patterns/available", &[]).await
    }

    pub async fn statistics(&self, code: &StockCode, range: &DateRange) -> Result<Value, SdkError> {
        self.get_json(
            "/patterns/statistics",
            &[
                ("ts_code", code.to_string()),
                ("start_date", range.start_param()),
                ("end_date", range.end_param()),
            ],
        )
        .await
    }
}
