//! Low-level HTTP client — `StockHttp`.
//!
//! Generic verbs over the `/api/v1` envelope. Sub-clients in
//! `domain/<name>/client.rs` build URLs and pick the retry policy; this layer
//! owns transport, status mapping, retries and envelope unwrapping.

use crate::error::{ApiError, HttpError, SdkError};
use crate::http::retry::RetryPolicy;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-request timeout (native only; WASM uses the browser's).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The `{success, data, error, message}` shape every endpoint returns.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Server-provided failure text: `error`, else `message`, ignoring blanks.
    pub fn failure_message(&self) -> Option<String> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Unwrap into `data`, turning `success: false` or a missing payload into an error.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(self.failure_message()));
        }
        self.data.ok_or(ApiError::MissingData)
    }

    /// Like [`into_result`](Self::into_result) for routes that answer with
    /// only `success` and `message`.
    pub fn into_ack(self) -> Result<(), ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(self.failure_message()));
        }
        Ok(())
    }
}

/// Low-level HTTP client for the stock analytics REST API.
#[derive(Clone)]
pub struct StockHttp {
    base_url: String,
    client: Client,
}

impl StockHttp {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.timeout(timeout).pool_max_idle_per_host(10);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    /// Server root, without the `/api/v1` prefix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base_url>/api/v1<path>`.
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, crate::network::API_PREFIX, path)
    }

    // ── Verbs ────────────────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, SdkError> {
        self.request_with_retry(reqwest::Method::GET, url, None::<&()>, retry)
            .await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, SdkError> {
        self.request_with_retry(reqwest::Method::POST, url, Some(body), retry)
            .await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, SdkError> {
        self.request_with_retry(reqwest::Method::PUT, url, Some(body), retry)
            .await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, SdkError> {
        self.request_with_retry(reqwest::Method::DELETE, url, None::<&()>, retry)
            .await
    }

    /// POST to a route whose envelope carries no `data`.
    pub(crate) async fn post_ack<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<(), SdkError> {
        let envelope: Envelope<serde_json::Value> = self
            .envelope_with_retry(reqwest::Method::POST, url, Some(body), retry)
            .await?;
        Ok(envelope.into_ack()?)
    }

    /// PUT to a route whose envelope carries no `data`.
    pub(crate) async fn put_ack<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<(), SdkError> {
        let envelope: Envelope<serde_json::Value> = self
            .envelope_with_retry(reqwest::Method::PUT, url, Some(body), retry)
            .await?;
        Ok(envelope.into_ack()?)
    }

    /// DELETE to a route whose envelope carries no `data`.
    pub(crate) async fn delete_ack(&self, url: &str, retry: RetryPolicy) -> Result<(), SdkError> {
        let envelope: Envelope<serde_json::Value> = self
            .envelope_with_retry(reqwest::Method::DELETE, url, None::<&()>, retry)
            .await?;
        Ok(envelope.into_ack()?)
    }

    /// Single GET that returns the raw envelope even on a non-2xx status
    /// when the body still parses as one (the health route answers a degraded
    /// server with 503 plus a normal payload).
    pub(crate) async fn get_envelope_lenient<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Envelope<T>, SdkError> {
        tracing::debug!("GET {}", url);
        let resp = self.client.get(url).send().await.map_err(map_transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(map_transport)?;
        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(status_error(status.as_u16(), body).into()),
            Err(e) => Err(SdkError::Serde(e)),
        }
    }

    // ── Internals ────────────────────────────────────────────────────────

    async fn request_with_retry<T: DeserializeOwned, B: Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
        retry: RetryPolicy,
    ) -> Result<T, SdkError> {
        let envelope: Envelope<T> = self.envelope_with_retry(method, url, body, retry).await?;
        Ok(envelope.into_result()?)
    }

    async fn envelope_with_retry<T: DeserializeOwned, B: Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
        retry: RetryPolicy,
    ) -> Result<Envelope<T>, SdkError> {
        let envelope: Envelope<T> = match retry.config() {
            None => self.do_request(&method, url, body).await?,
            Some(config) => {
                let mut attempt = 0;
                loop {
                    match self.do_request(&method, url, body).await {
                        Ok(envelope) => break envelope,
                        Err(e) if config.should_retry(&e) && attempt < config.max_retries => {
                            let delay = match &e {
                                HttpError::RateLimited {
                                    retry_after_ms: Some(ms),
                                } => Duration::from_millis(*ms),
                                _ => config.delay_for_attempt(attempt),
                            };
                            tracing::debug!(
                                attempt = attempt + 1,
                                max = config.max_retries,
                                delay_ms = delay.as_millis() as u64,
                                error = %e,
                                "Retrying {} {}",
                                method,
                                url
                            );
                            futures_timer::Delay::new(delay).await;
                            attempt += 1;
                        }
                        Err(e) if attempt > 0 && config.should_retry(&e) => {
                            return Err(HttpError::MaxRetriesExceeded {
                                attempts: attempt + 1,
                                last_error: Box::new(e),
                            }
                            .into());
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        };

        Ok(envelope)
    }

    async fn do_request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: &reqwest::Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Envelope<T>, HttpError> {
        tracing::debug!("{} {}", method, url);
        let mut req = self.client.request(method.clone(), url);
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(map_transport)?;
        let status = resp.status();

        if status.is_success() {
            return resp.json::<Envelope<T>>().await.map_err(map_transport);
        }

        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs * 1000);
        let body_text = resp.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            return Err(HttpError::RateLimited { retry_after_ms });
        }
        Err(status_error(status.as_u16(), body_text))
    }
}

fn map_transport(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Reqwest(e)
    }
}

/// Map a non-2xx status to an error, preferring the envelope's message over the raw body.
fn status_error(status: u16, body: String) -> HttpError {
    let text = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
        .ok()
        .and_then(|env| env.failure_message())
        .unwrap_or(body);

    match status {
        401 => HttpError::Unauthorized,
        404 => HttpError::NotFound(text),
        429 => HttpError::RateLimited {
            retry_after_ms: None,
        },
        400..=499 => HttpError::BadRequest(text),
        _ => HttpError::ServerError { status, body: text },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_unwraps_data() {
        let env: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"data":[1,2,3]}"#).unwrap();
        assert_eq!(env.into_result().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_envelope_failure_carries_server_message() {
        let env: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":false,"error":"无效的股票代码"}"#).unwrap();
        match env.into_result() {
            Err(ApiError::Rejected(Some(msg))) => assert_eq!(msg, "无效的股票代码"),
            other => panic!("unexpected: {:?}", other),
        }

        let env: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":false,"message":"  "}"#).unwrap();
        assert!(matches!(env.into_result(), Err(ApiError::Rejected(None))));
    }

    #[test]
    fn test_envelope_missing_data() {
        let env: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(env.into_result(), Err(ApiError::MissingData)));

        let env: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":true,"message":"策略删除成功"}"#).unwrap();
        assert!(env.into_ack().is_ok());
        let env: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":false,"error":"回测不存在"}"#).unwrap();
        assert!(matches!(env.into_ack(), Err(ApiError::Rejected(Some(_)))));
    }

    #[test]
    fn test_status_error_mapping() {
        let body = r#"{"success":false,"error":"获取股票数据失败: timeout"}"#.to_string();
        match status_error(500, body) {
            HttpError::ServerError { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "获取股票数据失败: timeout");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            status_error(404, "nope".into()),
            HttpError::NotFound(s) if s == "nope"
        ));
        assert!(matches!(status_error(400, String::new()), HttpError::BadRequest(_)));
        assert!(matches!(status_error(401, String::new()), HttpError::Unauthorized));
    }

    #[test]
    fn test_api_url_joins_prefix() {
        let http = StockHttp::new("http://localhost:8081/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(http.base_url(), "http://localhost:8081");
        assert_eq!(
            http.api_url("/stocks/600519.SH/basic"),
            "http://localhost:8081/api/v1/stocks/600519.SH/basic"
        );
    }
}
