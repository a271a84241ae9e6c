//! Equity curve option for backtest results: the portfolio line, plus the
//! benchmark when any point carries one.
//!
//! Values are plotted in 万元 so the axis can use a plain string formatter.

use crate::chart::theme::{Theme, ThemeMode};
use crate::domain::backtest::EquityPoint;
use serde_json::{json, Value};

pub const EQUITY_TITLE: &str = "权益曲线对比";
pub const EMPTY_MESSAGE: &str = "暂无权益曲线数据";
const STRATEGY_SERIES: &str = "策略收益";
const BENCHMARK_SERIES: &str = "基准收益";
const STRATEGY_COLOR: &str = "#1890ff";
const BENCHMARK_COLOR: &str = "#ff7875";

/// Start, end and total return of one curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquitySummary {
    pub initial_cash: f64,
    pub final_value: f64,
    /// Percent, e.g. `12.5` for +12.5%.
    pub total_return_pct: f64,
}

impl EquitySummary {
    /// `None` for an empty curve or a non-positive starting amount.
    pub fn from_curve(points: &[EquityPoint], initial_cash: f64) -> Option<Self> {
        let last = points.last()?;
        if initial_cash <= 0.0 {
            return None;
        }
        Some(Self {
            initial_cash,
            final_value: last.portfolio_value,
            total_return_pct: (last.portfolio_value - initial_cash) / initial_cash * 100.0,
        })
    }

    pub fn is_gain(&self) -> bool {
        self.total_return_pct >= 0.0
    }

    /// `+12.50%` / `-3.20%`.
    pub fn return_label(&self) -> String {
        let sign = if self.is_gain() { "+" } else { "" };
        format!("{}{:.2}%", sign, self.total_return_pct)
    }
}

/// 万元, rounded to the yuan.
fn wan(value: f64) -> f64 {
    value.round() / 10_000.0
}

pub struct EquityChartBuilder<'a> {
    points: &'a [EquityPoint],
    theme: ThemeMode,
    title: &'a str,
}

impl<'a> EquityChartBuilder<'a> {
    pub fn new(points: &'a [EquityPoint]) -> Self {
        Self {
            points,
            theme: ThemeMode::default(),
            title: EQUITY_TITLE,
        }
    }

    pub fn with_theme(mut self, theme: ThemeMode) -> Self {
        self.theme = theme;
        self
    }

    /// Per-strategy tabs title their chart with the strategy name.
    pub fn with_title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn has_benchmark(&self) -> bool {
        self.points.iter().any(|p| p.benchmark_value.is_some())
    }

    /// `None` when there are no points; show `EMPTY_MESSAGE` instead.
    pub fn build(&self) -> Option<Value> {
        if self.points.is_empty() {
            return None;
        }
        let theme = Theme::for_mode(self.theme);
        let dates: Vec<&str> = self.points.iter().map(|p| p.date.as_str()).collect();

        let mut legend = vec![STRATEGY_SERIES];
        let mut series = vec![json!({
            "name": STRATEGY_SERIES,
            "type": "line",
            "smooth": true,
            "showSymbol": false,
            "data": self.points.iter().map(|p| json!(wan(p.portfolio_value))).collect::<Vec<_>>(),
            "lineStyle": { "color": STRATEGY_COLOR, "width": 2 },
            "itemStyle": { "color": STRATEGY_COLOR }
        })];
        if self.has_benchmark() {
            legend.push(BENCHMARK_SERIES);
            series.push(json!({
                "name": BENCHMARK_SERIES,
                "type": "line",
                "smooth": true,
                "showSymbol": false,
                "data": self.points.iter().map(|p| match p.benchmark_value {
                    Some(v) => json!(wan(v)),
                    None => json!("-"),
                }).collect::<Vec<_>>(),
                "lineStyle": { "color": BENCHMARK_COLOR, "width": 2 },
                "itemStyle": { "color": BENCHMARK_COLOR }
            }));
        }

        Some(json!({
            "animation": false,
            "backgroundColor": theme.background,
            "title": {
                "text": self.title,
                "left": "center",
                "textStyle": { "fontSize": 16, "fontWeight": "bold", "color": theme.text }
            },
            "tooltip": { "trigger": "axis" },
            "legend": { "data": legend, "top": 30, "textStyle": { "color": theme.text } },
            "grid": { "top": 80, "bottom": 60, "left": 60, "right": 40 },
            "xAxis": {
                "type": "category",
                "data": dates,
                "boundaryGap": false,
                "axisLabel": { "rotate": 45, "color": theme.muted_text },
                "axisLine": { "lineStyle": { "color": theme.axis_line } }
            },
            "yAxis": {
                "type": "value",
                "scale": true,
                "axisLabel": { "formatter": "¥{value}万", "color": theme.muted_text },
                "splitLine": { "lineStyle": { "color": theme.split_line } }
            },
            "series": series
        }))
    }
}
