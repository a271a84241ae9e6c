//! End-to-end tests for the view layer against an in-memory data source.
//!
//! The fake counts every request so tests can assert exactly how many
//! network calls a sequence of interactions produces.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Weekday};

use stock_a_future_sdk::chart::ma::moving_average;
use stock_a_future_sdk::domain::daily::DailyBar;
use stock_a_future_sdk::domain::fundamental::FundamentalData;
use stock_a_future_sdk::domain::indicator::IndicatorSet;
use stock_a_future_sdk::domain::prediction::PredictionSet;
use stock_a_future_sdk::domain::stock::StockBasic;
use stock_a_future_sdk::error::{HttpError, SdkError};
use stock_a_future_sdk::prelude::*;
use stock_a_future_sdk::view::prefs::{LAST_STOCK_CODE, LAST_STOCK_NAME};
use stock_a_future_sdk::view::search::SearchPhase;

// ─── Fake source ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct Counters {
    basic: AtomicUsize,
    daily: AtomicUsize,
    indicators: AtomicUsize,
    predictions: AtomicUsize,
    fundamentals: AtomicUsize,
    search: AtomicUsize,
    /// Number of upcoming daily requests that answer HTTP 500.
    daily_failures: AtomicUsize,
    /// Per-request latency for upcoming daily requests, in milliseconds.
    daily_delays: Mutex<VecDeque<u64>>,
    queries: Mutex<Vec<String>>,
}

#[derive(Clone, Default)]
struct FakeSource {
    counters: Arc<Counters>,
    latency: Duration,
}

impl FakeSource {
    fn with_latency(ms: u64) -> Self {
        Self {
            latency: Duration::from_millis(ms),
            ..Self::default()
        }
    }

    fn count(&self, pick: impl Fn(&Counters) -> &AtomicUsize) -> usize {
        pick(&self.counters).load(Ordering::SeqCst)
    }

    fn fail_next_daily(&self, n: usize) {
        self.counters.daily_failures.store(n, Ordering::SeqCst);
    }

    fn delay_next_daily(&self, delays: &[u64]) {
        self.counters
            .daily_delays
            .lock()
            .unwrap()
            .extend(delays.iter().copied());
    }

    async fn wait(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn basic(code: &str, name: &str) -> StockBasic {
    let mut b = StockBasic::fallback(&StockCode::parse(code).unwrap());
    b.name = name.to_string();
    b
}

fn universe() -> Vec<StockBasic> {
    vec![
        basic("600519.SH", "贵州茅台"),
        basic("000001.SZ", "平安银行"),
        basic("600992.SH", "贵绳股份"),
        basic("000858.SZ", "五粮液"),
    ]
}

/// Most bars the fake serves for one request.
const MAX_BARS: usize = 40;

/// One bar per weekday in `range` (at most [`MAX_BARS`]), closes rising by 0.1.
fn weekday_bars(range: &DateRange) -> Vec<DailyBar> {
    range
        .start()
        .iter_days()
        .take_while(|d| *d <= range.end())
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(MAX_BARS)
        .enumerate()
        .map(|(i, date)| {
            let close = 10.0 + i as f64 * 0.1;
            DailyBar {
                trade_date: date,
                open: close - 0.05,
                high: close + 0.2,
                low: close - 0.2,
                close,
                volume: 100_000.0 + i as f64,
                amount: None,
                pct_chg: None,
                pre_close: None,
                change: None,
            }
        })
        .collect()
}

impl ChartDataSource for FakeSource {
    async fn stock_basic(&self, code: &StockCode) -> Result<StockBasic, SdkError> {
        self.counters.basic.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        universe()
            .into_iter()
            .find(|s| &s.ts_code == code)
            .ok_or_else(|| HttpError::NotFound("股票不存在".into()).into())
    }

    async fn daily_bars(&self, _code: &StockCode, range: &DateRange) -> Result<Vec<DailyBar>, SdkError> {
        self.counters.daily.fetch_add(1, Ordering::SeqCst);
        let delay = self.counters.daily_delays.lock().unwrap().pop_front();
        match delay {
            Some(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
            None => self.wait().await,
        }
        let failures = &self.counters.daily_failures;
        if failures.load(Ordering::SeqCst) > 0 {
            failures.fetch_sub(1, Ordering::SeqCst);
            return Err(HttpError::ServerError {
                status: 500,
                body: "获取股票数据失败".into(),
            }
            .into());
        }
        Ok(weekday_bars(range))
    }

    async fn indicators(
        &self,
        _code: &StockCode,
        range: &DateRange,
    ) -> Result<Vec<IndicatorSet>, SdkError> {
        self.counters.indicators.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        Ok(vec![IndicatorSet {
            trade_date: Some(range.end()),
            ma5: Some(12.0),
            rsi14: Some(55.0),
            ..IndicatorSet::default()
        }])
    }

    async fn predictions(&self, code: &StockCode, _range: &DateRange) -> Result<PredictionSet, SdkError> {
        self.counters.predictions.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        Ok(PredictionSet {
            ts_code: code.clone(),
            trade_date: None,
            confidence: Some(0.6),
            items: Vec::new(),
            updated_at: None,
        })
    }

    async fn fundamentals(&self, _code: &StockCode) -> Result<FundamentalData, SdkError> {
        self.counters.fundamentals.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        Ok(FundamentalData::default())
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<StockBasic>, SdkError> {
        self.counters.search.fetch_add(1, Ordering::SeqCst);
        self.counters.queries.lock().unwrap().push(query.to_string());
        self.wait().await;
        Ok(universe()
            .into_iter()
            .filter(|s| s.name.contains(query) || s.ts_code.as_str().contains(query))
            .take(limit as usize)
            .collect())
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn pingan_key(view: View) -> QueryKey {
    QueryKey::new(
        StockCode::parse("000001.SZ").unwrap(),
        DateRange::parse("20240101", "20240301").unwrap(),
        view,
    )
}

fn quick_config() -> ViewConfig {
    ViewConfig {
        search_debounce: Duration::from_millis(80),
        blur_grace: Duration::from_millis(20),
        ..ViewConfig::default()
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_select_fills_fields_and_persists() {
    let source = FakeSource::default();
    let prefs = Preferences::in_memory();
    let session = SearchSession::new(source.clone(), prefs.clone(), ViewConfig::default());

    let outcome = session.on_input("贵州").await;
    assert_eq!(outcome, SearchOutcome::Shown(1));
    let snapshot = session.snapshot().await;
    let labels: Vec<String> = snapshot
        .suggestions()
        .iter()
        .map(StockBasic::display_label)
        .collect();
    assert!(labels.contains(&"贵州茅台 (600519.SH)".to_string()));

    let picked = session.select(0).await.unwrap();
    assert_eq!(picked.ts_code.as_str(), "600519.SH");

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.code_text(), "600519.SH");
    assert_eq!(snapshot.text(), "贵州茅台 (600519.SH)");
    assert_eq!(snapshot.phase(), SearchPhase::Selected);

    let (code, name) = prefs.last_stock().unwrap();
    assert_eq!(code.as_str(), "600519.SH");
    assert_eq!(name.as_deref(), Some("贵州茅台"));
    assert_eq!(source.count(|c| &c.search), 1);
}

#[tokio::test]
async fn test_forty_bars_and_ma5() {
    let source = FakeSource::default();
    let orchestrator = Orchestrator::new(source.clone());

    let data = orchestrator.load(&pingan_key(View::Kline)).await.unwrap();
    let kline = data.as_kline().unwrap();
    assert_eq!(kline.series.len(), 40);
    assert_eq!(kline.basic.name, "平安银行");

    let closes = kline.series.closes();
    let ma5 = moving_average(closes, 5);
    assert_eq!(ma5.len(), 40);
    assert!(ma5[..4].iter().all(Option::is_none));
    let expected = closes[..5].iter().sum::<f64>() / 5.0;
    assert_eq!(ma5[4], Some(expected));
}

#[tokio::test]
async fn test_server_error_then_retry_issues_one_request() {
    let source = FakeSource::default();
    source.fail_next_daily(1);
    let orchestrator = Arc::new(Orchestrator::new(source.clone()));
    let mut detail = DetailController::new(orchestrator, today());
    detail.open_stock(StockCode::parse("000001.SZ").unwrap());
    detail.set_range(DateRange::parse("20240101", "20240301").unwrap());

    let state = detail.load().await.clone();
    let err = state.error().expect("load should fail");
    assert_eq!(err.kind, FetchErrorKind::Server);
    assert_eq!(err.message, "获取股票数据失败");
    assert_eq!(detail.error_banner().map(|e| e.message.as_str()), Some("获取股票数据失败"));
    // The render path still works, it just has nothing to draw.
    assert!(detail.chart_option(&ChartConfig::default()).is_none());
    assert_eq!(source.count(|c| &c.daily), 1);

    let state = detail.retry().await;
    assert!(state.data().is_some());
    assert_eq!(source.count(|c| &c.daily), 2);
    assert!(detail.error_banner().is_none());
    assert!(detail.chart_option(&ChartConfig::default()).is_some());
}

#[tokio::test]
async fn test_tab_switch_fetches_indicators_once_and_reuses_bars() {
    let source = FakeSource::default();
    let prefs = Preferences::in_memory();
    let mut screen = Screen::new(source.clone(), prefs, ViewConfig::default(), today());
    screen.search().set_code_text("000001.SZ").await;

    let state = screen.submit_code().await.unwrap();
    assert!(state.data().is_some());
    assert_eq!(source.count(|c| &c.daily), 1);
    assert_eq!(source.count(|c| &c.basic), 1);

    let state = screen.select_tab(View::Indicators).await;
    assert!(matches!(state.data(), Some(ViewData::Indicators(_))));
    assert_eq!(source.count(|c| &c.indicators), 1);

    let state = screen.select_tab(View::Kline).await;
    assert!(matches!(state.data(), Some(ViewData::Kline(_))));
    assert_eq!(source.count(|c| &c.daily), 1);

    screen.select_tab(View::Indicators).await;
    assert_eq!(source.count(|c| &c.indicators), 1);
}

// ─── Properties ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_keystroke_burst_sends_last_value_once() {
    let source = FakeSource::default();
    let session = SearchSession::new(source.clone(), Preferences::in_memory(), quick_config());

    let keystrokes = ["贵", "贵州", "贵州茅"];
    let outcomes = futures_util::future::join_all(keystrokes.iter().enumerate().map(
        |(i, text)| {
            let session = &session;
            async move {
                tokio::time::sleep(Duration::from_millis(i as u64 * 10)).await;
                session.on_input(text).await
            }
        },
    ))
    .await;

    assert_eq!(outcomes[0], SearchOutcome::Superseded);
    assert_eq!(outcomes[1], SearchOutcome::Superseded);
    assert_eq!(outcomes[2], SearchOutcome::Shown(1));
    assert_eq!(source.count(|c| &c.search), 1);
    assert_eq!(*source.counters.queries.lock().unwrap(), vec!["贵州茅".to_string()]);
}

#[tokio::test]
async fn test_escape_during_debounce_sends_nothing() {
    let source = FakeSource::default();
    let session = SearchSession::new(source.clone(), Preferences::in_memory(), quick_config());

    let (outcome, _) = futures_util::join!(session.on_input("贵州"), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        session.on_key(SearchKey::Escape).await
    });

    assert_eq!(outcome, SearchOutcome::Superseded);
    assert_eq!(source.count(|c| &c.search), 0);
    assert!(!session.snapshot().await.is_visible());
}

#[tokio::test]
async fn test_blank_query_clears_without_request() {
    let source = FakeSource::default();
    let session = SearchSession::new(source.clone(), Preferences::in_memory(), quick_config());
    assert_eq!(session.on_input("平安").await, SearchOutcome::Shown(1));

    assert_eq!(session.on_input("   ").await, SearchOutcome::Cleared);
    let snapshot = session.snapshot().await;
    assert!(snapshot.suggestions().is_empty());
    assert!(!snapshot.is_visible());
    assert_eq!(source.count(|c| &c.search), 1);
}

#[tokio::test]
async fn test_blur_waits_for_grace_period() {
    let session = SearchSession::new(FakeSource::default(), Preferences::in_memory(), quick_config());
    session.on_input("平安").await;
    session.on_focus().await;

    let (hidden, refocused) = futures_util::join!(session.on_blur(), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        session.on_focus().await
    });
    assert!(refocused);
    assert!(!hidden);
    assert!(session.snapshot().await.is_visible());

    assert!(session.on_blur().await);
    assert!(!session.snapshot().await.is_visible());
}

#[tokio::test]
async fn test_concurrent_loads_share_one_request() {
    let source = FakeSource::with_latency(40);
    let orchestrator = Orchestrator::new(source.clone());
    let key = pingan_key(View::Kline);

    let (a, b) = futures_util::join!(orchestrator.load(&key), orchestrator.load(&key));
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(source.count(|c| &c.daily), 1);
    assert_eq!(source.count(|c| &c.basic), 1);
    assert!(!orchestrator.is_in_flight(&key).await);

    orchestrator.load(&key).await.unwrap();
    assert_eq!(source.count(|c| &c.daily), 1);
}

#[tokio::test]
async fn test_late_response_for_old_stock_is_discarded() {
    let source = FakeSource::with_latency(40);
    let orchestrator = Orchestrator::new(source.clone());
    let old = pingan_key(View::Kline);
    let new = QueryKey::new(StockCode::parse("600519.SH").unwrap(), old.range, View::Kline);

    let (stale, fresh) = futures_util::join!(orchestrator.load(&old), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        orchestrator.load(&new).await
    });

    assert!(stale.unwrap_err().is_superseded());
    assert!(fresh.is_ok());
    assert!(orchestrator.cached(&old).await.is_none());
    assert!(orchestrator.cached(&new).await.is_some());
}

#[tokio::test]
async fn test_returning_to_a_stock_discards_its_older_request() {
    let source = FakeSource::default();
    source.delay_next_daily(&[120, 10, 10]);
    let orchestrator = Orchestrator::new(source.clone());
    let pingan = pingan_key(View::Kline);
    let maotai = QueryKey::new(StockCode::parse("600519.SH").unwrap(), pingan.range, View::Kline);

    let (first, _, last) = futures_util::join!(
        orchestrator.load(&pingan),
        async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            orchestrator.load(&maotai).await
        },
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            orchestrator.load(&pingan).await
        }
    );

    assert!(first.unwrap_err().is_superseded());
    let last = last.unwrap();
    let cached = orchestrator.cached(&pingan).await.unwrap();
    assert!(Arc::ptr_eq(
        cached.as_kline().unwrap(),
        last.as_kline().unwrap()
    ));
    assert_eq!(source.count(|c| &c.daily), 3);
}

#[tokio::test]
async fn test_range_change_invalidates_previous_pair() {
    let source = FakeSource::default();
    let orchestrator = Orchestrator::new(source.clone());
    let key = pingan_key(View::Kline);
    orchestrator.load(&key).await.unwrap();
    orchestrator.load(&key.with_view(View::Predictions)).await.unwrap();

    let shorter = QueryKey::new(
        key.stock.clone(),
        DateRange::parse("20240201", "20240301").unwrap(),
        View::Kline,
    );
    orchestrator.load(&shorter).await.unwrap();
    assert!(orchestrator.cached(&key).await.is_none());
    assert!(orchestrator.cached(&key.with_view(View::Predictions)).await.is_none());

    orchestrator.load(&key).await.unwrap();
    assert_eq!(source.count(|c| &c.daily), 3);
}

#[tokio::test]
async fn test_empty_fundamentals_reported_as_not_found() {
    let source = FakeSource::default();
    let orchestrator = Orchestrator::new(source.clone());
    let err = orchestrator
        .load(&pingan_key(View::Fundamental))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::NotFound);

    // Failures are not cached.
    orchestrator.load(&pingan_key(View::Fundamental)).await.unwrap_err();
    assert_eq!(source.count(|c| &c.fundamentals), 2);
}

#[tokio::test]
async fn test_unknown_stock_falls_back_to_placeholder_name() {
    let source = FakeSource::default();
    let orchestrator = Orchestrator::new(source);
    let key = QueryKey::new(
        StockCode::parse("300750.SZ").unwrap(),
        DateRange::parse("20240101", "20240131").unwrap(),
        View::Kline,
    );
    let data = orchestrator.load(&key).await.unwrap();
    let kline = data.as_kline().unwrap();
    assert!(!kline.basic.name.is_empty());
    assert_eq!(kline.basic.ts_code, key.stock);
}

#[tokio::test]
async fn test_invalid_code_never_reaches_network() {
    let source = FakeSource::default();
    let mut screen = Screen::new(source.clone(), Preferences::in_memory(), quick_config(), today());
    screen.search().set_code_text("60051.SH").await;

    let err = screen.submit_code().await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Validation);
    assert_eq!(source.count(|c| &c.daily), 0);
    assert_eq!(source.count(|c| &c.basic), 0);
}

#[tokio::test]
async fn test_time_range_change_resets_highlight_and_banner() {
    let source = FakeSource::default();
    let prefs = Preferences::in_memory();
    let mut screen = Screen::new(source.clone(), prefs.clone(), quick_config(), today());

    screen.search().on_input("贵").await;
    screen.search().on_key(SearchKey::Down).await;
    assert_eq!(screen.search().snapshot().await.highlighted(), 0);

    screen.search().set_code_text("000001.SZ").await;
    source.fail_next_daily(1);
    screen.submit_code().await.unwrap();
    assert!(screen.detail().error_banner().is_some());

    let state = screen.set_time_range(TimeRange::Month3).await;
    assert!(state.data().is_some());
    assert!(screen.detail().error_banner().is_none());
    assert_eq!(screen.search().snapshot().await.highlighted(), -1);
    assert_eq!(screen.detail().time_range(), Some(TimeRange::Month3));
}

#[tokio::test]
async fn test_enter_opens_highlighted_stock() {
    let source = FakeSource::default();
    let prefs = Preferences::in_memory();
    let mut screen = Screen::new(source.clone(), prefs.clone(), quick_config(), today());

    screen.search().on_input("五粮").await;
    assert!(screen.on_key(SearchKey::Enter).await.is_none());
    screen.search().on_key(SearchKey::Down).await;
    let opened = screen.on_key(SearchKey::Enter).await.unwrap();
    assert_eq!(opened.ts_code.as_str(), "000858.SZ");
    assert_eq!(screen.detail().stock(), Some(&opened.ts_code));
    assert!(screen.detail().state().data().is_some());
    assert_eq!(prefs.last_stock().unwrap().0.as_str(), "000858.SZ");

    // A fresh screen reopens the saved stock.
    let reopened = Screen::new(source, prefs, quick_config(), today());
    assert_eq!(reopened.detail().stock().map(StockCode::as_str), Some("000858.SZ"));
    assert_eq!(reopened.search().snapshot().await.code_text(), "000858.SZ");
}

#[tokio::test]
async fn test_sections_persist_through_preferences() {
    let prefs = Preferences::in_memory();
    let mut screen = Screen::new(FakeSource::default(), prefs.clone(), quick_config(), today());
    screen.sections_mut().toggle("fundamental");

    let again = Screen::new(FakeSource::default(), prefs, quick_config(), today());
    assert!(again.sections().is_collapsed("fundamental"));
}

#[test]
fn test_pref_keys_match_storage_names() {
    assert_eq!(LAST_STOCK_CODE, "last_stock_code");
    assert_eq!(LAST_STOCK_NAME, "last_stock_name");
}
