//! View layer: fetch orchestration and interaction state.
//!
//! Everything here is runtime-agnostic. Timers use `futures-timer`, locks
//! use `async-lock`; nothing spawns tasks. Callers drive the futures from
//! whatever event loop they already have.

pub mod boundary;
pub mod debounce;
pub mod detail;
pub mod orchestrator;
pub mod prefs;
pub mod screen;
pub mod search;
pub mod sections;
pub mod source;

pub use detail::DetailController;
pub use orchestrator::{FetchError, FetchErrorKind, LoadState, Orchestrator, QueryKey, View, ViewData};
pub use prefs::Preferences;
pub use screen::Screen;
pub use search::{SearchBox, SearchSession};
pub use sections::SectionToggle;
pub use source::ChartDataSource;

use crate::shared::DEFAULT_LOOKBACK_DAYS;
use std::time::Duration;

/// Timing and sizing knobs for the interactive views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Quiet period before a search request goes out.
    pub search_debounce: Duration,
    /// Delay between losing focus and hiding suggestions, so a click on a
    /// suggestion still lands.
    pub blur_grace: Duration,
    pub search_limit: u32,
    pub default_lookback_days: i64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(300),
            blur_grace: Duration::from_millis(200),
            search_limit: 10,
            default_lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}
