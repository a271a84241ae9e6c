//! Fundamentals sub-client.

use crate::client::StockClient;
use crate::domain::fundamental::wire::FundamentalResponse;
use crate::domain::fundamental::FundamentalData;
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::StockCode;
use chrono::NaiveDate;

/// Optional filters for the fundamental endpoint; all default to the
/// server's latest report.
#[derive(Debug, Clone, Default)]
pub struct FundamentalQuery {
    /// Report period, e.g. `20231231`.
    pub period: Option<String>,
    /// Statement type code (`1` = consolidated).
    pub report_type: Option<String>,
    pub trade_date: Option<NaiveDate>,
}

impl FundamentalQuery {
    fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(p) = &self.period {
            params.push(format!("period={}", urlencoding::encode(p)));
        }
        if let Some(t) = &self.report_type {
            params.push(format!("type={}", urlencoding::encode(t)));
        }
        if let Some(d) = &self.trade_date {
            params.push(format!("trade_date={}", d.format("%Y%m%d")));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

pub struct Fundamentals<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Fundamentals<'a> {
    pub async fn get(
        &self,
        code: &StockCode,
        query: &FundamentalQuery,
    ) -> Result<FundamentalData, SdkError> {
        let url = format!(
            "{}{}",
            self.client
                .http
                .api_url(&format!("/stocks/{}/fundamental", code)),
            query.to_query_string()
        );
        let resp: FundamentalResponse = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(resp.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string() {
        assert_eq!(FundamentalQuery::default().to_query_string(), "");
        let q = FundamentalQuery {
            period: Some("20231231".into()),
            report_type: Some("1".into()),
            trade_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        assert_eq!(
            q.to_query_string(),
            "?period=20231231&type=1&trade_date=20240301"
        );
    }
}
