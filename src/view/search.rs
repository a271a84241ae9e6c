//! Stock search box: a synchronous state machine plus an async session that
//! debounces input, queries the data source and persists the pick.

use crate::domain::stock::StockBasic;
use crate::shared::StockCode;
use crate::view::debounce::Debouncer;
use crate::view::orchestrator::FetchError;
use crate::view::prefs::Preferences;
use crate::view::source::ChartDataSource;
use crate::view::ViewConfig;

use async_lock::Mutex;

// ─── SearchBox ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    /// Nothing typed, or the list was dismissed.
    #[default]
    Idle,
    /// A query is waiting for the debounce or the server.
    Searching,
    Suggestions,
    Selected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Down,
    Up,
    Enter,
    Escape,
}

/// Search field, stock-code field and suggestion list.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchBox {
    text: String,
    code_text: String,
    phase: SearchPhase,
    suggestions: Vec<StockBasic>,
    /// `-1` when nothing is highlighted.
    highlighted: i32,
    visible: bool,
    focused: bool,
    pending_query: Option<String>,
    blur_token: u64,
    selected: Option<StockBasic>,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self {
            text: String::new(),
            code_text: String::new(),
            phase: SearchPhase::Idle,
            suggestions: Vec::new(),
            highlighted: -1,
            visible: false,
            focused: false,
            pending_query: None,
            blur_token: 0,
            selected: None,
        }
    }
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill both fields from a saved pick.
    pub fn restore(&mut self, code: &StockCode, name: Option<&str>) {
        self.text = match name {
            Some(n) if !n.trim().is_empty() => format!("{} ({})", n.trim(), code),
            _ => code.to_string(),
        };
        self.code_text = code.to_string();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn code_text(&self) -> &str {
        &self.code_text
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn suggestions(&self) -> &[StockBasic] {
        &self.suggestions
    }

    pub fn highlighted(&self) -> i32 {
        self.highlighted
    }

    pub fn highlighted_suggestion(&self) -> Option<&StockBasic> {
        usize::try_from(self.highlighted)
            .ok()
            .and_then(|i| self.suggestions.get(i))
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn selected(&self) -> Option<&StockBasic> {
        self.selected.as_ref()
    }

    /// The code field, parsed. Typed codes are validated here, before any
    /// request is built from them.
    pub fn code(&self) -> Result<StockCode, crate::shared::StockCodeError> {
        StockCode::parse(&self.code_text)
    }

    pub fn set_code_text(&mut self, text: &str) {
        self.code_text = text.to_string();
    }

    /// Text changed. Returns the query to search for, or `None` when the
    /// text is blank (suggestions are cleared and nothing is sent).
    pub fn input(&mut self, text: &str) -> Option<String> {
        self.text = text.to_string();
        self.selected = None;
        self.highlighted = -1;
        let query = text.trim();
        if query.is_empty() {
            self.clear_suggestions();
            return None;
        }
        self.phase = SearchPhase::Searching;
        self.pending_query = Some(query.to_string());
        Some(query.to_string())
    }

    /// Apply server results for `query`. Results for anything other than the
    /// latest query are dropped; returns whether they were applied.
    pub fn apply_results(&mut self, query: &str, results: Vec<StockBasic>) -> bool {
        if self.pending_query.as_deref() != Some(query) {
            return false;
        }
        self.pending_query = None;
        self.suggestions = results;
        self.highlighted = -1;
        self.phase = SearchPhase::Suggestions;
        self.visible = true;
        true
    }

    /// The search for `query` failed; hide the list if it is still current.
    pub fn apply_error(&mut self, query: &str) -> bool {
        if self.pending_query.as_deref() != Some(query) {
            return false;
        }
        self.clear_suggestions();
        true
    }

    /// Keyboard navigation. Returns the committed stock on Enter.
    pub fn key(&mut self, key: SearchKey) -> Option<StockBasic> {
        let last = self.suggestions.len() as i32 - 1;
        match key {
            SearchKey::Down if self.visible => {
                self.highlighted = (self.highlighted + 1).min(last);
                None
            }
            SearchKey::Up if self.visible => {
                self.highlighted = (self.highlighted - 1).max(-1);
                None
            }
            SearchKey::Enter if self.visible && self.highlighted >= 0 => {
                self.select(self.highlighted as usize)
            }
            SearchKey::Escape => {
                self.pending_query = None;
                self.visible = false;
                self.highlighted = -1;
                self.selected = None;
                self.phase = SearchPhase::Idle;
                None
            }
            _ => None,
        }
    }

    /// Pick suggestion `index`: fills the search field with its label and
    /// the code field with its code.
    pub fn select(&mut self, index: usize) -> Option<StockBasic> {
        let stock = self.suggestions.get(index)?.clone();
        self.text = stock.display_label();
        self.code_text = stock.ts_code.to_string();
        self.pending_query = None;
        self.visible = false;
        self.highlighted = -1;
        self.phase = SearchPhase::Selected;
        self.selected = Some(stock.clone());
        Some(stock)
    }

    /// Lost focus. Hide only once [`SearchBox::blur_elapsed`] is called
    /// with the returned token after the grace period.
    pub fn blur(&mut self) -> u64 {
        self.focused = false;
        self.blur_token += 1;
        self.blur_token
    }

    pub fn blur_elapsed(&mut self, token: u64) -> bool {
        if self.focused || token != self.blur_token {
            return false;
        }
        self.visible = false;
        self.highlighted = -1;
        true
    }

    /// Gained focus: prior suggestions come back without a new query.
    pub fn focus(&mut self) -> bool {
        self.focused = true;
        self.blur_token += 1;
        if !self.text.trim().is_empty()
            && !self.suggestions.is_empty()
            && self.phase != SearchPhase::Selected
        {
            self.visible = true;
        }
        self.visible
    }

    pub fn reset_highlight(&mut self) {
        self.highlighted = -1;
    }

    fn clear_suggestions(&mut self) {
        self.pending_query = None;
        self.suggestions.clear();
        self.visible = false;
        self.highlighted = -1;
        self.phase = SearchPhase::Idle;
    }
}

// ─── SearchSession ───────────────────────────────────────────────────────────

/// What became of one keystroke.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Blank input; suggestions cleared without a request.
    Cleared,
    /// A newer keystroke took over.
    Superseded,
    /// Suggestions updated with this many entries.
    Shown(usize),
    Failed(FetchError),
}

pub struct SearchSession<S> {
    source: S,
    prefs: Preferences,
    config: ViewConfig,
    debouncer: Debouncer,
    state: Mutex<SearchBox>,
}

impl<S: ChartDataSource> SearchSession<S> {
    pub fn new(source: S, prefs: Preferences, config: ViewConfig) -> Self {
        let mut search_box = SearchBox::new();
        if let Some((code, name)) = prefs.last_stock() {
            search_box.restore(&code, name.as_deref());
        }
        Self {
            source,
            debouncer: Debouncer::new(config.search_debounce),
            prefs,
            config,
            state: Mutex::new(search_box),
        }
    }

    pub async fn snapshot(&self) -> SearchBox {
        self.state.lock().await.clone()
    }

    /// Keystroke handler. Waits out the debounce window, then searches
    /// unless another keystroke arrived meanwhile.
    pub async fn on_input(&self, text: &str) -> SearchOutcome {
        let query = self.state.lock().await.input(text);
        let Some(query) = query else {
            self.debouncer.cancel();
            return SearchOutcome::Cleared;
        };
        if !self.debouncer.settle().await {
            return SearchOutcome::Superseded;
        }

        tracing::debug!("searching stocks for {:?}", query);
        match self.source.search(&query, self.config.search_limit).await {
            Ok(results) => {
                let count = results.len();
                if self.state.lock().await.apply_results(&query, results) {
                    SearchOutcome::Shown(count)
                } else {
                    SearchOutcome::Superseded
                }
            }
            Err(e) => {
                tracing::warn!("stock search for {:?} failed: {}", query, e);
                if self.state.lock().await.apply_error(&query) {
                    SearchOutcome::Failed(FetchError::from(e))
                } else {
                    SearchOutcome::Superseded
                }
            }
        }
    }

    /// Escape or a pick also drops any search still waiting out the debounce.
    pub async fn on_key(&self, key: SearchKey) -> Option<StockBasic> {
        let picked = self.state.lock().await.key(key);
        if matches!(key, SearchKey::Escape) || picked.is_some() {
            self.debouncer.cancel();
        }
        if let Some(stock) = &picked {
            self.prefs.set_last_stock(stock);
        }
        picked
    }

    pub async fn select(&self, index: usize) -> Option<StockBasic> {
        let picked = self.state.lock().await.select(index);
        if let Some(stock) = &picked {
            self.prefs.set_last_stock(stock);
        }
        picked
    }

    /// Hide suggestions after the blur grace period unless focus came back
    /// or a suggestion was clicked first. Returns whether the list was hidden.
    pub async fn on_blur(&self) -> bool {
        let token = self.state.lock().await.blur();
        futures_timer::Delay::new(self.config.blur_grace).await;
        self.state.lock().await.blur_elapsed(token)
    }

    pub async fn on_focus(&self) -> bool {
        self.state.lock().await.focus()
    }

    pub async fn reset_highlight(&self) {
        self.state.lock().await.reset_highlight();
    }

    pub async fn set_code_text(&self, text: &str) {
        self.state.lock().await.set_code_text(text);
    }
}
