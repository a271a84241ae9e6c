//! Health sub-client.

use crate::client::StockClient;
use crate::domain::health::HealthStatus;
use crate::error::SdkError;

pub struct Health<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Health<'a> {
    /// `check_connection` asks the server to check its upstream data source
    /// instead of reporting the cached state. Degraded answers (HTTP 503)
    /// are returned as `Ok` with [`HealthLevel::Degraded`](super::HealthLevel).
    pub async fn check(&self, check_connection: bool) -> Result<HealthStatus, SdkError> {
        let mut url = self.client.http.api_url("/health");
        if check_connection {
            url.push_str("?check_connection=true");
        }
        let envelope = self
            .client
            .http
            .get_envelope_lenient::<HealthStatus>(&url)
            .await?;
        Ok(envelope.into_result()?)
    }
}
