//! Chart pipeline: normalize → moving averages → series → option.
//!
//! Pure and synchronous. Renderers receive a `serde_json::Value` option they
//! can hand to ECharts (web page or WebView) unchanged.

pub mod equity;
pub mod ma;
pub mod normalize;
pub mod option;
pub mod series;
pub mod theme;
pub mod tooltip;
pub mod zoom;

pub use equity::{EquityChartBuilder, EquitySummary};
pub use option::{ChartConfig, ChartOption, ChartOptionBuilder};
pub use series::{ChartSeries, Direction, SeriesKey};
pub use theme::{Theme, ThemeMode};
pub use tooltip::{TooltipEntry, TooltipModel};
pub use zoom::ZoomWindow;
