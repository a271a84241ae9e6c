//! The data seam between views and the backend.
//!
//! [`StockClient`](crate::StockClient) implements [`ChartDataSource`] when the
//! `http` feature is on. Tests and offline demos implement it directly.

use crate::domain::daily::DailyBar;
use crate::domain::fundamental::FundamentalData;
use crate::domain::indicator::IndicatorSet;
use crate::domain::prediction::PredictionSet;
use crate::domain::stock::StockBasic;
use crate::error::SdkError;
use crate::shared::{DateRange, StockCode};

#[cfg(feature = "http")]
use crate::client::StockClient;
#[cfg(feature = "http")]
use crate::domain::fundamental::client::FundamentalQuery;

/// Everything the chart screens read from the server.
#[allow(async_fn_in_trait)]
pub trait ChartDataSource {
    async fn stock_basic(&self, code: &StockCode) -> Result<StockBasic, SdkError>;

    async fn daily_bars(&self, code: &StockCode, range: &DateRange) -> Result<Vec<DailyBar>, SdkError>;

    async fn indicators(
        &self,
        code: &StockCode,
        range: &DateRange,
    ) -> Result<Vec<IndicatorSet>, SdkError>;

    async fn predictions(&self, code: &StockCode, range: &DateRange) -> Result<PredictionSet, SdkError>;

    async fn fundamentals(&self, code: &StockCode) -> Result<FundamentalData, SdkError>;

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<StockBasic>, SdkError>;
}

impl<T: ChartDataSource + ?Sized> ChartDataSource for std::sync::Arc<T> {
    async fn stock_basic(&self, code: &StockCode) -> Result<StockBasic, SdkError> {
        (**self).stock_basic(code).await
    }

    async fn daily_bars(&self, code: &StockCode, range: &DateRange) -> Result<Vec<DailyBar>, SdkError> {
        (**self).daily_bars(code, range).await
    }

    async fn indicators(
        &self,
        code: &StockCode,
        range: &DateRange,
    ) -> Result<Vec<IndicatorSet>, SdkError> {
        (**self).indicators(code, range).await
    }

    async fn predictions(&self, code: &StockCode, range: &DateRange) -> Result<PredictionSet, SdkError> {
        (**self).predictions(code, range).await
    }

    async fn fundamentals(&self, code: &StockCode) -> Result<FundamentalData, SdkError> {
        (**self).fundamentals(code).await
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<StockBasic>, SdkError> {
        (**self).search(query, limit).await
    }
}

// Inherent accessors share names with the trait methods, hence the
// qualified `StockClient::` calls below.
#[cfg(feature = "http")]
impl ChartDataSource for StockClient {
    async fn stock_basic(&self, code: &StockCode) -> Result<StockBasic, SdkError> {
        self.stocks().basic(code).await
    }

    async fn daily_bars(&self, code: &StockCode, range: &DateRange) -> Result<Vec<DailyBar>, SdkError> {
        self.daily().get(code, range, None).await
    }

    async fn indicators(
        &self,
        code: &StockCode,
        range: &DateRange,
    ) -> Result<Vec<IndicatorSet>, SdkError> {
        StockClient::indicators(self).get(code, Some(range)).await
    }

    async fn predictions(&self, code: &StockCode, range: &DateRange) -> Result<PredictionSet, SdkError> {
        StockClient::predictions(self).get(code, Some(range)).await
    }

    async fn fundamentals(&self, code: &StockCode) -> Result<FundamentalData, SdkError> {
        StockClient::fundamentals(self)
            .get(code, &FundamentalQuery::default())
            .await
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<StockBasic>, SdkError> {
        self.stocks().search(query, Some(limit)).await
    }
}
