//! Indicators sub-client — server-computed technical indicators.

use crate::client::StockClient;
use crate::domain::indicator::wire::IndicatorsResponse;
use crate::domain::indicator::{sets_from_wire, IndicatorSet};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::{DateRange, StockCode};

pub struct Indicators<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Indicators<'a> {
    /// Indicators computed over `range` (server default: last 60 days).
    pub async fn get(
        &self,
        code: &StockCode,
        range: Option<&DateRange>,
    ) -> Result<Vec<IndicatorSet>, SdkError> {
        let mut url = self
            .client
            .http
            .api_url(&format!("/stocks/{}/indicators", code));
        if let Some(r) = range {
            url = format!(
                "{}?start_date={}&end_date={}",
                url,
                r.start_param(),
                r.end_param()
            );
        }
        let resp: IndicatorsResponse = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(sets_from_wire(resp))
    }
}
