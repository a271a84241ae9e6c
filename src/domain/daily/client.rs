//! Daily sub-client — OHLCV history queries.

use crate::client::StockClient;
use crate::domain::daily::wire::DailyBarResponse;
use crate::domain::daily::{bars_from_wire, DailyBar};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::{Adjust, DateRange, StockCode};

pub struct Daily<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Daily<'a> {
    /// Bars in `range`, ascending by date. `adjust` defaults to the client's setting.
    pub async fn get(
        &self,
        code: &StockCode,
        range: &DateRange,
        adjust: Option<Adjust>,
    ) -> Result<Vec<DailyBar>, SdkError> {
        let adjust = adjust.unwrap_or(self.client.adjust);
        let url = format!(
            "{}?start_date={}&end_date={}&adjust={}",
            self.client.http.api_url(&format!("/stocks/{}/daily", code)),
            range.start_param(),
            range.end_param(),
            adjust.as_str()
        );
        let resp: Vec<DailyBarResponse> = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(bars_from_wire(resp))
    }
}
