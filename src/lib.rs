//! # Stock-A-Future SDK
//!
//! Rust SDK for the Stock-A-Future analytics API, supporting both native and
//! WASM targets.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Shared newtypes, domain models and the chart pipeline
//!    (always available, WASM-safe)
//! 2. **HTTP API** — `StockHttp` with per-endpoint retry policies and
//!    `{success, data, error}` envelope handling
//! 3. **High-Level Client** — `StockClient` with nested sub-clients and caching
//! 4. **View** — Fetch orchestration, debounced search and view state
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stock_a_future_sdk::prelude::*;
//!
//! let client = StockClient::builder()
//!     .base_url("http://localhost:8081")
//!     .build()?;
//!
//! let code = StockCode::parse("600519.SH")?;
//! let range = DateRange::parse("20240101", "20240301")?;
//! let bars = client.daily().get(&code, &range, None).await?;
//!
//! let series = ChartSeries::new(SeriesKey::new(code, range), &bars);
//! let option = ChartOptionBuilder::new(&series, &ChartConfig::default()).build();
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Chart pipeline: normalization, moving averages, chart options.
pub mod chart;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: High-Level Client ───────────────────────────────────────────────

/// `StockClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 4: View ────────────────────────────────────────────────────────────

/// Fetch orchestrator, search session, detail controller, preferences.
pub mod view;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Adjust, DateRange, SignalType, StockCode, TimeRange};

    // Domain types — stock, daily, indicators
    pub use crate::domain::daily::DailyBar;
    pub use crate::domain::indicator::{IndicatorKind, IndicatorLine, IndicatorSet};
    pub use crate::domain::stock::StockBasic;

    // Domain types — predictions, fundamentals
    pub use crate::domain::fundamental::FundamentalData;
    pub use crate::domain::prediction::{PredictionItem, PredictionSet};

    // Domain types — favorites (includes groups + signals)
    pub use crate::domain::favorite::state::{FavoriteSort, FavoritesState, SortDirection};
    pub use crate::domain::favorite::{
        Favorite, FavoriteGroup, FavoriteOrder, FavoriteUpdate, NewFavorite, NewGroup,
        SignalsOverview,
    };

    // Domain types — health, patterns
    pub use crate::domain::health::{HealthLevel, HealthStatus};
    pub use crate::domain::pattern::PatternSearch;

    // Domain types — strategies, backtests
    pub use crate::domain::backtest::poll::{poll_progress, PollConfig};
    pub use crate::domain::backtest::state::BacktestDraft;
    pub use crate::domain::backtest::{
        Backtest, BacktestProgress, BacktestQuery, BacktestResults, BacktestStatus, EquityPoint,
        MetricTone, NewBacktest, PerformanceMetrics, Trade, TradeSide,
    };
    pub use crate::domain::strategy::{
        NewStrategy, Strategy, StrategyQuery, StrategyStatus, StrategyType, StrategyUpdate,
    };

    // Chart pipeline
    pub use crate::chart::ma::moving_average;
    pub use crate::chart::normalize::{normalize_date, parse_number};
    pub use crate::chart::{
        ChartConfig, ChartOption, ChartOptionBuilder, ChartSeries, SeriesKey, ThemeMode,
        TooltipModel, ZoomWindow,
    };

    // Errors
    pub use crate::error::SdkError;

    // Network
    pub use crate::network::DEFAULT_API_URL;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        BacktestsClient, DailyClient, FavoritesClient, FundamentalsClient, GroupsClient,
        HealthClient, IndicatorsClient, PatternsClient, PredictionsClient, StockClient,
        StockClientBuilder, StocksClient, StrategiesClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // View layer
    pub use crate::view::search::{SearchKey, SearchOutcome};
    pub use crate::view::{
        ChartDataSource, DetailController, FetchError, FetchErrorKind, LoadState, Orchestrator,
        Preferences, QueryKey, Screen, SearchBox, SearchSession, SectionToggle, View, ViewConfig,
        ViewData,
    };
}
