//! Detail view: one stock, one range, four tabs.
//!
//! The controller is the single owner of what the detail screen shows. A
//! load is split in two so a host can drive the request elsewhere:
//! [`DetailController::begin`] marks the current key as loading and
//! [`DetailController::finish`] applies a result only if that key is still
//! current. [`DetailController::load`] does both in place.

use crate::chart::{ChartConfig, ChartOption, ChartOptionBuilder};
use crate::domain::indicator::IndicatorSet;
use crate::shared::{DateRange, StockCode, TimeRange};
use crate::view::orchestrator::{
    FetchError, KlineData, LoadState, Orchestrator, QueryKey, View, ViewData,
};
use crate::view::source::ChartDataSource;

use chrono::NaiveDate;
use std::sync::Arc;

pub struct DetailController<S> {
    orchestrator: Arc<Orchestrator<S>>,
    today: NaiveDate,
    stock: Option<StockCode>,
    tab: View,
    time_range: Option<TimeRange>,
    range: DateRange,
    state: LoadState,
    error_banner: Option<FetchError>,
    kline: Option<Arc<KlineData>>,
    indicators: Option<Arc<Vec<IndicatorSet>>>,
}

impl<S: ChartDataSource> DetailController<S> {
    /// `today` anchors time-range shortcuts; the initial range is the
    /// default lookback ending today.
    pub fn new(orchestrator: Arc<Orchestrator<S>>, today: NaiveDate) -> Self {
        Self {
            orchestrator,
            today,
            stock: None,
            tab: View::Kline,
            time_range: None,
            range: DateRange::default_lookback(today),
            state: LoadState::Idle,
            error_banner: None,
            kline: None,
            indicators: None,
        }
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator<S>> {
        &self.orchestrator
    }

    pub fn stock(&self) -> Option<&StockCode> {
        self.stock.as_ref()
    }

    pub fn tab(&self) -> View {
        self.tab
    }

    pub fn time_range(&self) -> Option<TimeRange> {
        self.time_range
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn error_banner(&self) -> Option<&FetchError> {
        self.error_banner.as_ref()
    }

    pub fn kline(&self) -> Option<&Arc<KlineData>> {
        self.kline.as_ref()
    }

    pub fn indicators(&self) -> Option<&Arc<Vec<IndicatorSet>>> {
        self.indicators.as_ref()
    }

    /// Key for the current stock, range and tab.
    pub fn key(&self) -> Option<QueryKey> {
        self.stock
            .as_ref()
            .map(|s| QueryKey::new(s.clone(), self.range, self.tab))
    }

    // ── Transitions ──────────────────────────────────────────────────────

    pub fn open_stock(&mut self, stock: StockCode) {
        if self.stock.as_ref() != Some(&stock) {
            self.drop_pair_data();
        }
        self.stock = Some(stock);
        self.error_banner = None;
        self.state = LoadState::Idle;
    }

    pub fn select_tab(&mut self, tab: View) {
        self.tab = tab;
        self.error_banner = None;
        self.state = LoadState::Idle;
    }

    pub fn set_time_range(&mut self, time_range: TimeRange) {
        self.time_range = Some(time_range);
        self.change_range(DateRange::from_time_range(self.today, time_range));
    }

    /// Explicit dates; clears the shortcut selection.
    pub fn set_range(&mut self, range: DateRange) {
        self.time_range = None;
        self.change_range(range);
    }

    fn change_range(&mut self, range: DateRange) {
        if range != self.range {
            self.drop_pair_data();
        }
        self.range = range;
        self.error_banner = None;
        self.state = LoadState::Idle;
    }

    fn drop_pair_data(&mut self) {
        self.kline = None;
        self.indicators = None;
    }

    // ── Loading ──────────────────────────────────────────────────────────

    /// Mark the current key as loading and return it.
    pub fn begin(&mut self) -> Option<QueryKey> {
        let key = self.key()?;
        self.state = LoadState::Loading;
        Some(key)
    }

    /// Apply `result` for `key`. Returns `false` when the key is no longer
    /// current or the response was superseded; nothing changes then.
    pub fn finish(&mut self, key: &QueryKey, result: Result<ViewData, FetchError>) -> bool {
        if self.key().as_ref() != Some(key) {
            tracing::debug!("ignoring {} result for stale key", key.view);
            return false;
        }
        match result {
            Ok(data) => {
                match &data {
                    ViewData::Kline(k) => self.kline = Some(k.clone()),
                    ViewData::Indicators(i) => self.indicators = Some(i.clone()),
                    _ => {}
                }
                self.error_banner = None;
                self.state = LoadState::Ready(data);
            }
            Err(e) if e.is_superseded() => return false,
            Err(e) => {
                self.error_banner = Some(e.clone());
                self.state = LoadState::Failed(e);
            }
        }
        true
    }

    /// Load the current tab.
    pub async fn load(&mut self) -> &LoadState {
        if let Some(key) = self.begin() {
            let orchestrator = self.orchestrator.clone();
            let result = orchestrator.load(&key).await;
            self.finish(&key, result);
        }
        &self.state
    }

    /// Same key again; failures are never cached so this issues a request.
    pub async fn retry(&mut self) -> &LoadState {
        self.error_banner = None;
        self.load().await
    }

    // ── Rendering ────────────────────────────────────────────────────────

    /// Chart option for the loaded K-line data, with indicator overlays
    /// when they are loaded too. `None` until bars are available.
    pub fn chart_option(&self, config: &ChartConfig) -> Option<ChartOption> {
        let kline = self.kline.as_ref()?;
        let mut config = config.clone();
        if config.stock_name.is_none() {
            config.stock_name = Some(kline.basic.name.clone());
        }
        let builder = ChartOptionBuilder::new(&kline.series, &config);
        let option = match &self.indicators {
            Some(sets) => builder.with_indicators(sets).build(),
            None => builder.build(),
        };
        Some(option)
    }
}

impl<S> std::fmt::Debug for DetailController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailController")
            .field("stock", &self.stock)
            .field("tab", &self.tab)
            .field("range", &self.range)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
