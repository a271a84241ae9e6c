//! Backtests sub-client.
//!
//! Creating a backtest also starts it. `wait_for_results` polls progress and
//! fetches results once the run completes.

use crate::client::StockClient;
use crate::domain::backtest::poll::{poll_progress, PollConfig};
use crate::domain::backtest::wire::{
    BacktestListResponse, BacktestResponse, ProgressResponse, ResultsResponse, StartResponse,
};
use crate::domain::backtest::{
    self, Backtest, BacktestPage, BacktestProgress, BacktestQuery, BacktestResults,
    BacktestStatus, NewBacktest,
};
use crate::error::SdkError;
use crate::http::RetryPolicy;

fn validation(e: backtest::ValidationError) -> SdkError {
    SdkError::Validation(e.to_string())
}

pub struct Backtests<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Backtests<'a> {
    fn url(&self, id: &str, action: &str) -> String {
        self.client
            .http
            .api_url(&format!("/backtests/{}{}", urlencoding::encode(id), action))
    }

    pub async fn list(&self, query: &BacktestQuery) -> Result<BacktestPage, SdkError> {
        let url = format!(
            "{}?{}",
            self.client.http.api_url("/backtests"),
            query.to_query_string()
        );
        let resp: BacktestListResponse = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(resp.into())
    }

    pub async fn get(&self, id: &str) -> Result<Backtest, SdkError> {
        let resp: BacktestResponse = self
            .client
            .http
            .get(&self.url(id, ""), RetryPolicy::Idempotent)
            .await?;
        resp.try_into().map_err(validation)
    }

    /// Validated locally, then created and started by the server in one call.
    pub async fn create(&self, new: &NewBacktest) -> Result<Backtest, SdkError> {
        new.validate().map_err(validation)?;
        let url = self.client.http.api_url("/backtests");
        let resp: BacktestResponse = self.client.http.post(&url, new, RetryPolicy::None).await?;
        let created = Backtest::try_from(resp).map_err(validation)?;
        tracing::debug!("backtest {} created: {}", created.id, created.name);
        Ok(created)
    }

    pub async fn rename(&self, id: &str, name: &str) -> Result<(), SdkError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(validation(backtest::ValidationError::EmptyName));
        }
        if name.chars().count() > 100 {
            return Err(validation(backtest::ValidationError::NameTooLong));
        }
        self.client
            .http
            .put_ack(
                &self.url(id, ""),
                &serde_json::json!({ "name": name }),
                RetryPolicy::None,
            )
            .await
    }

    pub async fn remove(&self, id: &str) -> Result<(), SdkError> {
        self.client
            .http
            .delete_ack(&self.url(id, ""), RetryPolicy::None)
            .await
    }

    /// Start a backtest that is still pending. Returns the new status.
    pub async fn start(&self, id: &str) -> Result<BacktestStatus, SdkError> {
        let resp: StartResponse = self
            .client
            .http
            .post(&self.url(id, "/start"), &serde_json::json!({}), RetryPolicy::None)
            .await?;
        Ok(resp
            .status
            .as_deref()
            .and_then(BacktestStatus::parse)
            .unwrap_or(BacktestStatus::Running))
    }

    pub async fn cancel(&self, id: &str) -> Result<(), SdkError> {
        tracing::debug!("cancelling backtest {}", id);
        self.client
            .http
            .post_ack(&self.url(id, "/cancel"), &serde_json::json!({}), RetryPolicy::None)
            .await
    }

    pub async fn progress(&self, id: &str) -> Result<BacktestProgress, SdkError> {
        let resp: ProgressResponse = self
            .client
            .http
            .get(&self.url(id, "/progress"), RetryPolicy::Idempotent)
            .await?;
        let mut progress = BacktestProgress::from(resp);
        if progress.backtest_id.is_empty() {
            progress.backtest_id = id.to_string();
        }
        Ok(progress)
    }

    pub async fn results(&self, id: &str) -> Result<BacktestResults, SdkError> {
        let resp: ResultsResponse = self
            .client
            .http
            .get(&self.url(id, "/results"), RetryPolicy::Idempotent)
            .await?;
        let mut results = BacktestResults::from(resp);
        if results.backtest_id.is_empty() {
            results.backtest_id = id.to_string();
        }
        Ok(results)
    }

    /// Poll until the run ends, then fetch its results.
    ///
    /// A failed run yields its server message (or `回测失败`), a cancelled one
    /// `回测已取消`, both as `SdkError::Other`.
    pub async fn wait_for_results<P>(
        &self,
        id: &str,
        config: &PollConfig,
        on_progress: P,
    ) -> Result<BacktestResults, SdkError>
    where
        P: FnMut(&BacktestProgress),
    {
        let last = poll_progress(config, || self.progress(id), on_progress).await?;
        match last.status {
            BacktestStatus::Completed => self.results(id).await,
            _ => Err(SdkError::Other(last.failure_message())),
        }
    }
}
