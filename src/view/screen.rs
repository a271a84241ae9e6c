//! The stock screen: search box, detail view and collapsible sections wired
//! to one data source.

use crate::domain::stock::StockBasic;
use crate::shared::TimeRange;
use crate::view::detail::DetailController;
use crate::view::orchestrator::{FetchError, FetchErrorKind, LoadState, Orchestrator, View};
use crate::view::prefs::Preferences;
use crate::view::search::{SearchKey, SearchSession};
use crate::view::sections::SectionToggle;
use crate::view::source::ChartDataSource;
use crate::view::ViewConfig;

use chrono::NaiveDate;
use std::sync::Arc;

pub struct Screen<S> {
    search: SearchSession<S>,
    detail: DetailController<S>,
    sections: SectionToggle,
}

impl<S: ChartDataSource + Clone> Screen<S> {
    /// Reopens the last picked stock, if one was saved. Nothing is fetched
    /// until the first load.
    pub fn new(source: S, prefs: Preferences, config: ViewConfig, today: NaiveDate) -> Self {
        let orchestrator = Arc::new(Orchestrator::new(source.clone()));
        let mut detail = DetailController::new(orchestrator, today);
        if config.default_lookback_days > 0 {
            detail.set_range(crate::shared::DateRange::last_days(
                today,
                config.default_lookback_days,
            ));
        }
        if let Some((code, _)) = prefs.last_stock() {
            detail.open_stock(code);
        }
        Self {
            sections: SectionToggle::new(prefs.clone()),
            search: SearchSession::new(source, prefs, config),
            detail,
        }
    }
}

impl<S: ChartDataSource> Screen<S> {
    pub fn search(&self) -> &SearchSession<S> {
        &self.search
    }

    pub fn detail(&self) -> &DetailController<S> {
        &self.detail
    }

    pub fn sections(&self) -> &SectionToggle {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut SectionToggle {
        &mut self.sections
    }

    /// Click on suggestion `index`: fills the fields, saves the pick and
    /// loads the current tab for it.
    pub async fn pick_suggestion(&mut self, index: usize) -> Option<StockBasic> {
        let stock = self.search.select(index).await?;
        self.open(&stock).await;
        Some(stock)
    }

    /// Keyboard in the search field; Enter on a highlighted row opens it.
    pub async fn on_key(&mut self, key: SearchKey) -> Option<StockBasic> {
        let stock = self.search.on_key(key).await?;
        self.open(&stock).await;
        Some(stock)
    }

    /// Submit whatever is in the code field. A malformed code is reported
    /// without any request.
    pub async fn submit_code(&mut self) -> Result<&LoadState, FetchError> {
        let code = self
            .search
            .snapshot()
            .await
            .code()
            .map_err(|e| FetchError::new(FetchErrorKind::Validation, e.to_string()))?;
        self.detail.open_stock(code);
        Ok(self.detail.load().await)
    }

    pub async fn select_tab(&mut self, tab: View) -> &LoadState {
        self.search.reset_highlight().await;
        self.detail.select_tab(tab);
        self.detail.load().await
    }

    pub async fn set_time_range(&mut self, time_range: TimeRange) -> &LoadState {
        self.search.reset_highlight().await;
        self.detail.set_time_range(time_range);
        self.detail.load().await
    }

    pub async fn load(&mut self) -> &LoadState {
        self.detail.load().await
    }

    pub async fn retry(&mut self) -> &LoadState {
        self.detail.retry().await
    }

    async fn open(&mut self, stock: &StockBasic) {
        self.detail.open_stock(stock.ts_code.clone());
        self.detail.load().await;
    }
}
