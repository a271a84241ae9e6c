//! Predictions sub-client.

use crate::client::StockClient;
use crate::domain::prediction::wire::PredictionResponse;
use crate::domain::prediction::{self, PredictionSet};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::{DateRange, StockCode};

pub struct Predictions<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Predictions<'a> {
    pub async fn get(
        &self,
        code: &StockCode,
        range: Option<&DateRange>,
    ) -> Result<PredictionSet, SdkError> {
        let mut url = self
            .client
            .http
            .api_url(&format!("/stocks/{}/predictions", code));
        if let Some(r) = range {
            url = format!(
                "{}?start_date={}&end_date={}",
                url,
                r.start_param(),
                r.end_param()
            );
        }
        let resp: PredictionResponse = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        resp.try_into()
            .map_err(|e: prediction::ValidationError| SdkError::Validation(e.to_string()))
    }
}
