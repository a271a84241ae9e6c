//! Fetch orchestrator — one cache and one in-flight table per screen.
//!
//! Every load names a [`QueryKey`] `(stock, range, view)`. The orchestrator
//! tracks the focused `(stock, range)` pair: loading a different pair drops
//! the previous pair's cache, and anything still in flight for it resolves
//! as [`FetchErrorKind::Superseded`] instead of landing in the cache.
//! Each focus change starts a new generation, so a request started under an
//! earlier focus is discarded even when the same pair regains focus.
//!
//! Concurrent loads of the same key share a single request through an
//! `async_lock::OnceCell`. Failures are handed to every waiter but never
//! cached, so a retry issues exactly one fresh request.

use crate::chart::{ChartSeries, SeriesKey};
use crate::domain::fundamental::FundamentalData;
use crate::domain::indicator::IndicatorSet;
use crate::domain::prediction::PredictionSet;
use crate::domain::stock::StockBasic;
use crate::error::{ApiError, HttpError, SdkError};
use crate::shared::{DateRange, StockCode};
use crate::view::source::ChartDataSource;

use async_lock::{Mutex, OnceCell};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ─── Keys ────────────────────────────────────────────────────────────────────

/// Detail-view tab; each one is backed by its own request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    #[default]
    Kline,
    Indicators,
    Predictions,
    Fundamental,
}

impl View {
    pub const ALL: [View; 4] = [
        View::Kline,
        View::Indicators,
        View::Predictions,
        View::Fundamental,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kline => "kline",
            Self::Indicators => "indicators",
            Self::Predictions => "predictions",
            Self::Fundamental => "fundamental",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Kline => "K线图",
            Self::Indicators => "技术指标",
            Self::Predictions => "买卖预测",
            Self::Fundamental => "基本面",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub stock: StockCode,
    pub range: DateRange,
    pub view: View,
}

impl QueryKey {
    pub fn new(stock: StockCode, range: DateRange, view: View) -> Self {
        Self { stock, range, view }
    }

    /// Same stock and range, different tab.
    pub fn with_view(&self, view: View) -> Self {
        Self {
            view,
            ..self.clone()
        }
    }

    fn pair(&self) -> (&StockCode, &DateRange) {
        (&self.stock, &self.range)
    }
}

// ─── Data ────────────────────────────────────────────────────────────────────

/// What the K-line tab renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct KlineData {
    pub basic: StockBasic,
    pub series: ChartSeries,
}

/// One cached snapshot. Cloning is cheap; the payload is shared.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData {
    Kline(Arc<KlineData>),
    Indicators(Arc<Vec<IndicatorSet>>),
    Predictions(Arc<PredictionSet>),
    Fundamental(Arc<FundamentalData>),
}

impl ViewData {
    pub fn view(&self) -> View {
        match self {
            Self::Kline(_) => View::Kline,
            Self::Indicators(_) => View::Indicators,
            Self::Predictions(_) => View::Predictions,
            Self::Fundamental(_) => View::Fundamental,
        }
    }

    pub fn as_kline(&self) -> Option<&Arc<KlineData>> {
        match self {
            Self::Kline(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_indicators(&self) -> Option<&Arc<Vec<IndicatorSet>>> {
        match self {
            Self::Indicators(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_predictions(&self) -> Option<&Arc<PredictionSet>> {
        match self {
            Self::Predictions(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_fundamental(&self) -> Option<&Arc<FundamentalData>> {
        match self {
            Self::Fundamental(f) => Some(f),
            _ => None,
        }
    }
}

/// Observable state of one view.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready(ViewData),
    Failed(FetchError),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&ViewData> {
        match self {
            Self::Ready(d) => Some(d),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// Server unreachable or timed out.
    Network,
    /// The server answered but had nothing for this query.
    NotFound,
    Server,
    /// `success: false` envelope or a 4xx.
    Rejected,
    /// Input rejected before any request was sent.
    Validation,
    /// The stock or range changed while the request was in flight.
    Superseded,
}

/// User-facing failure, ready for an error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

pub const NETWORK_MESSAGE: &str = "连接失败，请检查服务器";
pub const MALFORMED_MESSAGE: &str = "响应格式错误";

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn superseded() -> Self {
        Self::new(FetchErrorKind::Superseded, "请求已过期")
    }

    pub fn is_superseded(&self) -> bool {
        self.kind == FetchErrorKind::Superseded
    }

    /// Whether offering a retry button makes sense.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, FetchErrorKind::Network | FetchErrorKind::Server)
    }
}

fn non_blank(text: &str) -> Option<String> {
    let t = text.trim();
    (!t.is_empty()).then(|| t.to_string())
}

impl From<&HttpError> for FetchError {
    fn from(e: &HttpError) -> Self {
        use FetchErrorKind::*;
        if e.is_transport() {
            return Self::new(Network, NETWORK_MESSAGE);
        }
        match e.last() {
            HttpError::NotFound(msg) => {
                Self::new(NotFound, non_blank(msg).unwrap_or_else(|| "未找到相关数据".into()))
            }
            HttpError::ServerError { status, body } => Self::new(
                Server,
                non_blank(body).unwrap_or_else(|| format!("服务器错误 ({})", status)),
            ),
            HttpError::RateLimited { .. } => Self::new(Server, "请求过于频繁，请稍后重试"),
            HttpError::BadRequest(msg) => {
                Self::new(Rejected, non_blank(msg).unwrap_or_else(|| "请求参数错误".into()))
            }
            HttpError::Unauthorized => Self::new(Rejected, "未授权访问"),
            _ => Self::new(Server, MALFORMED_MESSAGE),
        }
    }
}

impl From<SdkError> for FetchError {
    fn from(e: SdkError) -> Self {
        use FetchErrorKind::*;
        match &e {
            SdkError::Http(h) => Self::from(h),
            SdkError::Api(ApiError::Rejected(msg)) => Self::new(
                Rejected,
                msg.as_deref()
                    .and_then(non_blank)
                    .unwrap_or_else(|| "请求失败".into()),
            ),
            SdkError::Api(ApiError::MissingData) => Self::new(NotFound, "暂无数据"),
            SdkError::Validation(msg) => Self::new(Validation, msg.clone()),
            SdkError::Serde(_) => Self::new(Server, MALFORMED_MESSAGE),
            SdkError::Other(msg) => Self::new(Server, msg.clone()),
        }
    }
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

type Pending = Arc<OnceCell<Result<ViewData, FetchError>>>;

#[derive(Default)]
struct Inner {
    focus: Option<(StockCode, DateRange)>,
    generation: u64,
    cache: HashMap<QueryKey, ViewData>,
    in_flight: HashMap<QueryKey, (u64, Pending)>,
}

impl Inner {
    fn is_focused(&self, key: &QueryKey) -> bool {
        self.focus
            .as_ref()
            .is_some_and(|(s, r)| (s, r) == key.pair())
    }

    /// Move focus to `key`'s pair, dropping everything held for the old one.
    fn refocus(&mut self, key: &QueryKey) {
        if self.is_focused(key) {
            return;
        }
        if let Some((stock, range)) = self.focus.take() {
            tracing::debug!(
                "focus {} {}..{} -> {} {}..{}",
                stock,
                range.start(),
                range.end(),
                key.stock,
                key.range.start(),
                key.range.end()
            );
        }
        self.cache.clear();
        self.in_flight.clear();
        self.generation += 1;
        self.focus = Some((key.stock.clone(), key.range));
    }

    fn is_current(&self, key: &QueryKey, generation: u64) -> bool {
        self.generation == generation && self.is_focused(key)
    }
}

pub struct Orchestrator<S> {
    source: S,
    inner: Mutex<Inner>,
}

impl<S: ChartDataSource> Orchestrator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load `key`, from cache when possible.
    ///
    /// Loading a new `(stock, range)` pair makes it the focus. A result for
    /// a pair that lost focus while in flight comes back as
    /// [`FetchErrorKind::Superseded`], even if the pair is focused again by
    /// the time it lands; callers should ignore it.
    pub async fn load(&self, key: &QueryKey) -> Result<ViewData, FetchError> {
        let (generation, pending) = {
            let mut inner = self.inner.lock().await;
            inner.refocus(key);
            if let Some(hit) = inner.cache.get(key) {
                tracing::debug!("cache hit {} {}", key.stock, key.view);
                return Ok(hit.clone());
            }
            match inner.in_flight.get(key) {
                Some((generation, pending)) => {
                    tracing::debug!("joining in-flight {} {}", key.stock, key.view);
                    (*generation, pending.clone())
                }
                None => {
                    let generation = inner.generation;
                    let pending: Pending = Arc::new(OnceCell::new());
                    inner
                        .in_flight
                        .insert(key.clone(), (generation, pending.clone()));
                    (generation, pending)
                }
            }
        };

        let result = pending.get_or_init(|| self.fetch(key)).await.clone();

        let mut inner = self.inner.lock().await;
        if inner
            .in_flight
            .get(key)
            .is_some_and(|(_, p)| Arc::ptr_eq(p, &pending))
        {
            inner.in_flight.remove(key);
        }
        if !inner.is_current(key, generation) {
            tracing::debug!("discarding stale {} {} response", key.stock, key.view);
            return Err(FetchError::superseded());
        }
        if let Ok(data) = &result {
            inner.cache.insert(key.clone(), data.clone());
        }
        result
    }

    /// Currently focused `(stock, range)`.
    pub async fn focus(&self) -> Option<(StockCode, DateRange)> {
        self.inner.lock().await.focus.clone()
    }

    pub async fn cached(&self, key: &QueryKey) -> Option<ViewData> {
        self.inner.lock().await.cache.get(key).cloned()
    }

    pub async fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.inner.lock().await.in_flight.contains_key(key)
    }

    /// Forget one cached entry; the next load refetches it.
    pub async fn invalidate(&self, key: &QueryKey) {
        self.inner.lock().await.cache.remove(key);
    }

    /// Forget everything, focus included.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.cache.clear();
        inner.in_flight.clear();
        inner.generation += 1;
        inner.focus = None;
    }

    async fn fetch(&self, key: &QueryKey) -> Result<ViewData, FetchError> {
        tracing::debug!(
            "fetching {} for {} {}..{}",
            key.view,
            key.stock,
            key.range.start(),
            key.range.end()
        );
        let result = self.fetch_view(key).await;
        if let Err(e) = &result {
            tracing::warn!("{} load for {} failed: {}", key.view, key.stock, e);
        }
        result
    }

    async fn fetch_view(&self, key: &QueryKey) -> Result<ViewData, FetchError> {
        let (stock, range) = key.pair();
        match key.view {
            View::Kline => self.fetch_kline(stock, range).await,
            View::Indicators => {
                let sets = self.source.indicators(stock, range).await?;
                if sets.is_empty() {
                    return Err(FetchError::new(FetchErrorKind::NotFound, "暂无技术指标数据"));
                }
                Ok(ViewData::Indicators(Arc::new(sets)))
            }
            View::Predictions => {
                let set = self.source.predictions(stock, range).await?;
                Ok(ViewData::Predictions(Arc::new(set)))
            }
            View::Fundamental => {
                let data = self.source.fundamentals(stock).await?;
                if data.is_empty() {
                    return Err(FetchError::new(FetchErrorKind::NotFound, "暂无基本面数据"));
                }
                Ok(ViewData::Fundamental(Arc::new(data)))
            }
        }
    }

    async fn fetch_kline(&self, stock: &StockCode, range: &DateRange) -> Result<ViewData, FetchError> {
        let (basic, bars) = futures_util::future::join(
            self.source.stock_basic(stock),
            self.source.daily_bars(stock, range),
        )
        .await;

        let bars = bars?;
        if bars.is_empty() {
            return Err(FetchError::new(
                FetchErrorKind::NotFound,
                "该时间范围内暂无交易数据",
            ));
        }
        let basic = basic.unwrap_or_else(|e| {
            tracing::warn!("basic info for {} unavailable, using fallback: {}", stock, e);
            StockBasic::fallback(stock)
        });
        let series = ChartSeries::new(SeriesKey::new(stock.clone(), *range), &bars);
        Ok(ViewData::Kline(Arc::new(KlineData { basic, series })))
    }
}

impl<S> fmt::Debug for Orchestrator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_read_as_connection_failure() {
        let err = FetchError::from(SdkError::Http(HttpError::Timeout));
        assert_eq!(err.kind, FetchErrorKind::Network);
        assert_eq!(err.message, NETWORK_MESSAGE);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_server_message_preferred() {
        let err = FetchError::from(SdkError::Http(HttpError::ServerError {
            status: 500,
            body: "获取股票数据失败".into(),
        }));
        assert_eq!(err.kind, FetchErrorKind::Server);
        assert_eq!(err.to_string(), "获取股票数据失败");

        let err = FetchError::from(SdkError::Http(HttpError::ServerError {
            status: 502,
            body: "  ".into(),
        }));
        assert_eq!(err.message, "服务器错误 (502)");
    }

    #[test]
    fn test_exhausted_retries_keep_server_answer() {
        let err = FetchError::from(SdkError::Http(HttpError::MaxRetriesExceeded {
            attempts: 3,
            last_error: Box::new(HttpError::ServerError {
                status: 503,
                body: "数据源维护中".into(),
            }),
        }));
        assert_eq!(err.kind, FetchErrorKind::Server);
        assert_eq!(err.message, "数据源维护中");

        let err = FetchError::from(SdkError::Http(HttpError::MaxRetriesExceeded {
            attempts: 3,
            last_error: Box::new(HttpError::RateLimited {
                retry_after_ms: None,
            }),
        }));
        assert_eq!(err.kind, FetchErrorKind::Server);

        let err = FetchError::from(SdkError::Http(HttpError::MaxRetriesExceeded {
            attempts: 3,
            last_error: Box::new(HttpError::Timeout),
        }));
        assert_eq!(err.kind, FetchErrorKind::Network);
        assert_eq!(err.message, NETWORK_MESSAGE);
    }

    #[test]
    fn test_rejected_envelope_falls_back_to_generic_text() {
        let err = FetchError::from(SdkError::Api(ApiError::Rejected(Some("无效的股票代码".into()))));
        assert_eq!(err.kind, FetchErrorKind::Rejected);
        assert_eq!(err.message, "无效的股票代码");

        let err = FetchError::from(SdkError::Api(ApiError::Rejected(None)));
        assert_eq!(err.message, "请求失败");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_not_found_distinct_from_network() {
        let err = FetchError::from(SdkError::Http(HttpError::NotFound(String::new())));
        assert_eq!(err.kind, FetchErrorKind::NotFound);
        let err = FetchError::from(SdkError::Api(ApiError::MissingData));
        assert_eq!(err.kind, FetchErrorKind::NotFound);
    }

    /// Answers every request immediately; counts daily requests.
    #[derive(Default)]
    struct StaticSource {
        daily: std::sync::atomic::AtomicUsize,
    }

    impl ChartDataSource for StaticSource {
        async fn stock_basic(&self, code: &StockCode) -> Result<StockBasic, SdkError> {
            Ok(StockBasic::fallback(code))
        }

        async fn daily_bars(
            &self,
            _code: &StockCode,
            range: &DateRange,
        ) -> Result<Vec<crate::domain::daily::DailyBar>, SdkError> {
            self.daily.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let mut bar = crate::chart::series::tests::bar("2024-01-02", 10.0, 10.5);
            bar.trade_date = range.start();
            Ok(vec![bar])
        }

        async fn indicators(&self, _: &StockCode, _: &DateRange) -> Result<Vec<IndicatorSet>, SdkError> {
            Ok(Vec::new())
        }

        async fn predictions(&self, code: &StockCode, _: &DateRange) -> Result<PredictionSet, SdkError> {
            Err(SdkError::Validation(format!("no predictions for {}", code)))
        }

        async fn fundamentals(&self, _: &StockCode) -> Result<FundamentalData, SdkError> {
            Ok(FundamentalData::default())
        }

        async fn search(&self, _: &str, _: u32) -> Result<Vec<StockBasic>, SdkError> {
            Ok(Vec::new())
        }
    }

    fn daily_count(orchestrator: &Orchestrator<StaticSource>) -> usize {
        orchestrator
            .source()
            .daily
            .load(std::sync::atomic::Ordering::SeqCst)
    }

    #[test]
    fn test_cache_invalidate_and_clear() {
        let orchestrator = Orchestrator::new(StaticSource::default());
        let key = QueryKey::new(
            StockCode::parse("000001.SZ").unwrap(),
            DateRange::parse("20240101", "20240301").unwrap(),
            View::Kline,
        );

        tokio_test::block_on(async {
            let first = orchestrator.load(&key).await.unwrap();
            assert_eq!(first.view(), View::Kline);
            assert!(first.as_kline().unwrap().basic.name.starts_with("平安银行"));
            orchestrator.load(&key).await.unwrap();
            assert_eq!(daily_count(&orchestrator), 1);
            assert_eq!(orchestrator.focus().await, Some((key.stock.clone(), key.range)));

            orchestrator.invalidate(&key).await;
            orchestrator.load(&key).await.unwrap();
            assert_eq!(daily_count(&orchestrator), 2);

            orchestrator.clear().await;
            assert!(orchestrator.focus().await.is_none());
            assert!(orchestrator.cached(&key).await.is_none());
        });
    }

    #[test]
    fn test_empty_and_failed_views() {
        let orchestrator = Orchestrator::new(StaticSource::default());
        let key = QueryKey::new(
            StockCode::parse("600519.SH").unwrap(),
            DateRange::parse("20240101", "20240301").unwrap(),
            View::Indicators,
        );
        tokio_test::block_on(async {
            let err = orchestrator.load(&key).await.unwrap_err();
            assert_eq!(err.kind, FetchErrorKind::NotFound);

            let err = orchestrator
                .load(&key.with_view(View::Predictions))
                .await
                .unwrap_err();
            assert_eq!(err.kind, FetchErrorKind::Validation);
            assert!(orchestrator.cached(&key.with_view(View::Predictions)).await.is_none());
        });
    }

    #[test]
    fn test_query_key_with_view_keeps_pair() {
        let key = QueryKey::new(
            StockCode::parse("600519.SH").unwrap(),
            DateRange::parse("20240101", "20240301").unwrap(),
            View::Kline,
        );
        let other = key.with_view(View::Indicators);
        assert_eq!(other.pair(), key.pair());
        assert_ne!(other, key);
    }
}
