//! Strategies sub-client. Writes are sent once, never retried.

use crate::client::StockClient;
use crate::domain::strategy::wire::{StrategyListResponse, StrategyPerformanceResponse, StrategyResponse};
use crate::domain::strategy::{
    self, NewStrategy, Strategy, StrategyPage, StrategyPerformance, StrategyQuery, StrategyUpdate,
};
use crate::error::SdkError;
use crate::http::RetryPolicy;

fn validation(e: strategy::ValidationError) -> SdkError {
    SdkError::Validation(e.to_string())
}

pub struct Strategies<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Strategies<'a> {
    fn url(&self, id: &str, action: &str) -> String {
        self.client
            .http
            .api_url(&format!("/strategies/{}{}", urlencoding::encode(id), action))
    }

    pub async fn list(&self, query: &StrategyQuery) -> Result<StrategyPage, SdkError> {
        let url = format!(
            "{}?{}",
            self.client.http.api_url("/strategies"),
            query.to_query_string()
        );
        let resp: StrategyListResponse = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(resp.into())
    }

    pub async fn get(&self, id: &str) -> Result<Strategy, SdkError> {
        let resp: StrategyResponse = self
            .client
            .http
            .get(&self.url(id, ""), RetryPolicy::Idempotent)
            .await?;
        resp.try_into().map_err(validation)
    }

    /// Checked locally first; an invalid strategy never reaches the server.
    pub async fn create(&self, new: &NewStrategy) -> Result<Strategy, SdkError> {
        new.validate().map_err(validation)?;
        let url = self.client.http.api_url("/strategies");
        let resp: StrategyResponse = self.client.http.post(&url, new, RetryPolicy::None).await?;
        resp.try_into().map_err(validation)
    }

    pub async fn update(&self, id: &str, update: &StrategyUpdate) -> Result<(), SdkError> {
        self.client
            .http
            .put_ack(&self.url(id, ""), update, RetryPolicy::None)
            .await
    }

    pub async fn remove(&self, id: &str) -> Result<(), SdkError> {
        self.client
            .http
            .delete_ack(&self.url(id, ""), RetryPolicy::None)
            .await
    }

    pub async fn performance(&self, id: &str) -> Result<StrategyPerformance, SdkError> {
        let resp: StrategyPerformanceResponse = self
            .client
            .http
            .get(&self.url(id, "/performance"), RetryPolicy::Idempotent)
            .await?;
        Ok(resp.into())
    }

    pub async fn activate(&self, id: &str) -> Result<(), SdkError> {
        self.action(id, "/activate").await
    }

    pub async fn deactivate(&self, id: &str) -> Result<(), SdkError> {
        self.action(id, "/deactivate").await
    }

    /// Put the strategy into the `testing` state.
    pub async fn test(&self, id: &str) -> Result<(), SdkError> {
        self.action(id, "/test").await
    }

    async fn action(&self, id: &str, action: &str) -> Result<(), SdkError> {
        tracing::debug!("strategy {} {}", id, action.trim_start_matches('/'));
        self.client
            .http
            .post_ack(&self.url(id, action), &serde_json::json!({}), RetryPolicy::None)
            .await
    }
}
