//! Backtest domain — server-run simulations of one or more strategies over a
//! stock pool, with progress polling and result metrics.
//!
//! The server starts a backtest as soon as it's created. Clients poll
//! `/backtests/{id}/progress` until a terminal status, then fetch results.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod poll;
pub mod state;
pub mod wire;

use crate::domain::strategy::Strategy;
use crate::shared::fmt::num::display_formatted_string;
use crate::shared::StockCode;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const MAX_STRATEGIES: usize = 5;
pub const MAX_SYMBOLS: usize = 100;
pub const MAX_SPAN_DAYS: i64 = 365 * 5;
pub const MIN_INITIAL_CASH: f64 = 10_000.0;
pub const MAX_INITIAL_CASH: f64 = 100_000_000.0;
/// Upper bound for both commission and slippage rates (1%).
pub const MAX_RATE: f64 = 0.01;

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BacktestStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl BacktestStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "待执行",
            Self::Running => "运行中",
            Self::Completed => "已完成",
            Self::Failed => "失败",
            Self::Cancelled => "已取消",
        }
    }

    /// No further progress will be reported.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

// ─── Backtest ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backtest {
    pub id: String,
    pub name: String,
    pub strategy_ids: Vec<String>,
    pub strategy_names: Vec<String>,
    pub symbols: Vec<StockCode>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub initial_cash: f64,
    pub commission: f64,
    pub slippage: f64,
    pub benchmark: Option<String>,
    pub status: BacktestStatus,
    /// 0–100.
    pub progress: u8,
    pub error_message: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Body of `POST /backtests`. The server starts the run immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBacktest {
    pub name: String,
    pub strategy_ids: Vec<String>,
    pub symbols: Vec<StockCode>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_cash: f64,
    pub commission: f64,
    pub slippage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<String>,
}

impl NewBacktest {
    /// The server's create rules, checked in the same order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if name.chars().count() > 100 {
            return Err(ValidationError::NameTooLong);
        }
        if self.strategy_ids.is_empty() {
            return Err(ValidationError::NoStrategy);
        }
        if self.strategy_ids.len() > MAX_STRATEGIES {
            return Err(ValidationError::TooManyStrategies);
        }
        let mut seen = HashSet::new();
        for (i, id) in self.strategy_ids.iter().enumerate() {
            let id = id.trim();
            if id.is_empty() {
                return Err(ValidationError::BlankStrategyId(i + 1));
            }
            if !seen.insert(id) {
                return Err(ValidationError::DuplicateStrategy(id.to_string()));
            }
        }
        if self.symbols.is_empty() {
            return Err(ValidationError::NoSymbols);
        }
        if self.symbols.len() > MAX_SYMBOLS {
            return Err(ValidationError::TooManySymbols);
        }
        if self.start_date >= self.end_date {
            return Err(ValidationError::StartNotBeforeEnd);
        }
        if (self.end_date - self.start_date).num_days() > MAX_SPAN_DAYS {
            return Err(ValidationError::SpanTooLong);
        }
        if self.initial_cash < MIN_INITIAL_CASH {
            return Err(ValidationError::CashTooLow);
        }
        if self.initial_cash > MAX_INITIAL_CASH {
            return Err(ValidationError::CashTooHigh);
        }
        if !(0.0..=MAX_RATE).contains(&self.commission) {
            return Err(ValidationError::Commission);
        }
        if !(0.0..=MAX_RATE).contains(&self.slippage) {
            return Err(ValidationError::Slippage);
        }
        Ok(())
    }
}

/// Filters for `GET /backtests`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktestQuery {
    pub page: u32,
    pub size: u32,
    pub status: Option<BacktestStatus>,
    pub strategy_id: Option<String>,
    pub keyword: Option<String>,
}

impl Default for BacktestQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 20,
            status: None,
            strategy_id: None,
            keyword: None,
        }
    }
}

impl BacktestQuery {
    pub fn to_query_string(&self) -> String {
        let mut parts = vec![
            format!("page={}", self.page.max(1)),
            format!("size={}", self.size.clamp(1, 100)),
        ];
        if let Some(status) = self.status {
            parts.push(format!("status={}", status.as_str()));
        }
        if let Some(id) = self.strategy_id.as_deref().filter(|s| !s.trim().is_empty()) {
            parts.push(format!("strategy_id={}", urlencoding::encode(id.trim())));
        }
        if let Some(keyword) = self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            parts.push(format!("keyword={}", urlencoding::encode(keyword)));
        }
        parts.join("&")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestPage {
    pub total: u32,
    pub page: u32,
    pub size: u32,
    pub items: Vec<Backtest>,
}

// ─── Progress ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestProgress {
    pub backtest_id: String,
    pub status: BacktestStatus,
    /// 0–100.
    pub progress: u8,
    pub message: Option<String>,
    pub current_date: Option<NaiveDate>,
    pub error: Option<String>,
}

impl BacktestProgress {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Text for the progress bar.
    pub fn display_message(&self) -> &str {
        self.message.as_deref().unwrap_or("运行中...")
    }

    /// Text for a failed or cancelled run.
    pub fn failure_message(&self) -> String {
        match self.status {
            BacktestStatus::Cancelled => "回测已取消".to_string(),
            _ => self.error.clone().unwrap_or_else(|| "回测失败".to_string()),
        }
    }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// Ratios are fractions (`0.153` is 15.3%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub strategy_id: Option<String>,
    pub total_return: Option<f64>,
    pub annual_return: Option<f64>,
    /// Negative or zero.
    pub max_drawdown: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub sortino_ratio: Option<f64>,
    pub win_rate: Option<f64>,
    pub profit_factor: Option<f64>,
    pub total_trades: Option<u32>,
    pub avg_trade_return: Option<f64>,
    pub benchmark_return: Option<f64>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricFormat {
    Percentage,
    Decimal,
    Count,
}

/// How a metric value should be colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricTone {
    Positive,
    Negative,
    Warning,
    Neutral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub label: &'static str,
    pub value: String,
    pub tone: MetricTone,
}

impl PerformanceMetrics {
    /// The metrics grid, in display order. Missing values read `N/A`.
    pub fn rows(&self) -> Vec<MetricRow> {
        use MetricFormat::*;
        let trades = self.total_trades.map(f64::from);
        [
            ("总收益率", self.total_return, Percentage),
            ("年化收益率", self.annual_return, Percentage),
            ("最大回撤", self.max_drawdown, Percentage),
            ("夏普比率", self.sharpe_ratio, Decimal),
            ("胜率", self.win_rate, Percentage),
            ("总交易次数", trades, Count),
            ("平均交易收益", self.avg_trade_return, Percentage),
            ("盈亏比", self.profit_factor, Decimal),
        ]
        .into_iter()
        .map(|(label, value, format)| MetricRow {
            label,
            value: format_metric(value, format),
            tone: value.map_or(MetricTone::Neutral, |v| metric_tone(label, v)),
        })
        .collect()
    }
}

pub fn format_metric(value: Option<f64>, format: MetricFormat) -> String {
    match value {
        None => "N/A".to_string(),
        Some(v) => match format {
            MetricFormat::Percentage => format!("{:.2}%", v * 100.0),
            MetricFormat::Decimal => format!("{:.2}", v),
            MetricFormat::Count => format!("{}", v.round() as i64),
        },
    }
}

fn metric_tone(label: &str, v: f64) -> MetricTone {
    if label.contains("回撤") {
        if v < -0.1 {
            MetricTone::Negative
        } else if v < -0.05 {
            MetricTone::Warning
        } else {
            MetricTone::Positive
        }
    } else if label.contains("收益") || label.contains("胜率") {
        if v > 0.0 {
            MetricTone::Positive
        } else if v < 0.0 {
            MetricTone::Negative
        } else {
            MetricTone::Neutral
        }
    } else if label.contains("夏普") || label.contains("盈亏比") {
        if v > 1.0 {
            MetricTone::Positive
        } else if v > 0.5 {
            MetricTone::Warning
        } else {
            MetricTone::Negative
        }
    } else {
        MetricTone::Neutral
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn label(&self) -> &'static str {
        match self {
            TradeSide::Buy => "买入",
            TradeSide::Sell => "卖出",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub strategy_id: Option<String>,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: u64,
    pub price: f64,
    pub commission: f64,
    /// Realized profit, present on closing trades.
    pub pnl: Option<f64>,
    pub signal_type: Option<String>,
    pub date: Option<NaiveDate>,
}

/// One day of the portfolio's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub portfolio_value: f64,
    pub benchmark_value: Option<f64>,
    pub cash: Option<f64>,
    pub holdings: Option<f64>,
}

impl EquityPoint {
    pub fn flat(date: String, value: f64) -> Self {
        Self {
            date,
            portfolio_value: value,
            benchmark_value: None,
            cash: None,
            holdings: None,
        }
    }
}

/// Run settings echoed back with the results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub initial_cash: f64,
    pub commission: f64,
    pub symbols: Vec<String>,
}

impl BacktestSummary {
    /// `(label, value)` rows for the settings panel.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "--".into());
        vec![
            ("回测名称", self.name.clone()),
            (
                "回测期间",
                format!("{} 至 {}", date(self.start_date), date(self.end_date)),
            ),
            (
                "初始资金",
                format!(
                    "¥{}",
                    display_formatted_string(format!("{:.2}", self.initial_cash))
                ),
            ),
            ("手续费率", format!("{:.3}%", self.commission * 100.0)),
            ("股票池", self.symbols.join(", ")),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestResults {
    pub backtest_id: String,
    /// One entry per strategy, in the order of `strategies`.
    pub performance: Vec<PerformanceMetrics>,
    /// Whole-portfolio metrics for multi-strategy runs.
    pub combined: Option<PerformanceMetrics>,
    pub equity_curve: Vec<EquityPoint>,
    /// Per-strategy curves when the server computed them; may be empty.
    pub strategy_curves: Vec<Vec<EquityPoint>>,
    pub trades: Vec<Trade>,
    pub strategies: Vec<Strategy>,
    pub summary: Option<BacktestSummary>,
}

impl BacktestResults {
    pub fn is_multi_strategy(&self) -> bool {
        self.performance.len() > 1
    }

    /// Tab title for the strategy at `index`.
    pub fn strategy_label(&self, index: usize) -> String {
        self.strategies
            .get(index)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("策略 {}", index + 1))
    }

    pub fn trades_for<'a>(&'a self, strategy_id: &'a str) -> impl Iterator<Item = &'a Trade> + 'a {
        self.trades
            .iter()
            .filter(move |t| t.strategy_id.as_deref() == Some(strategy_id))
    }

    /// Equity curve for the strategy at `index`.
    ///
    /// Uses the server's curve when present. Otherwise the curve is rebuilt
    /// from that strategy's closing trades, starting at `initial_cash`; with
    /// no closing trades it is a flat line across the run.
    pub fn strategy_curve(&self, index: usize) -> Vec<EquityPoint> {
        if let Some(curve) = self.strategy_curves.get(index).filter(|c| !c.is_empty()) {
            return curve.clone();
        }
        let (initial, start, end) = match &self.summary {
            Some(s) => (s.initial_cash, s.start_date, s.end_date),
            None => (0.0, None, None),
        };
        let label = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        let mut curve = vec![EquityPoint::flat(label(start), initial)];

        if let Some(strategy) = self.strategies.get(index) {
            let mut closed: Vec<(&NaiveDate, f64)> = self
                .trades_for(&strategy.id)
                .filter_map(|t| Some((t.date.as_ref()?, t.pnl?)))
                .collect();
            closed.sort_by_key(|(date, _)| **date);
            let mut equity = initial;
            for (date, pnl) in closed {
                equity += pnl;
                curve.push(EquityPoint::flat(date.to_string(), equity));
            }
        }
        if curve.len() == 1 {
            curve.push(EquityPoint::flat(label(end), initial));
        }
        curve
    }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    NameTooLong,
    NoStrategy,
    TooManyStrategies,
    BlankStrategyId(usize),
    DuplicateStrategy(String),
    NoSymbols,
    TooManySymbols,
    StartNotBeforeEnd,
    SpanTooLong,
    CashTooLow,
    CashTooHigh,
    Commission,
    Slippage,
    MissingId,
    UnknownSide(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyName => write!(f, "回测名称不能为空"),
            ValidationError::NameTooLong => write!(f, "回测名称长度不能超过100个字符"),
            ValidationError::NoStrategy => write!(f, "至少需要选择一个策略"),
            ValidationError::TooManyStrategies => {
                write!(f, "最多只能选择{}个策略", MAX_STRATEGIES)
            }
            ValidationError::BlankStrategyId(pos) => {
                write!(f, "策略ID不能为空（位置: {}）", pos)
            }
            ValidationError::DuplicateStrategy(id) => write!(f, "策略ID重复: {}", id),
            ValidationError::NoSymbols => write!(f, "股票列表不能为空"),
            ValidationError::TooManySymbols => write!(f, "股票数量不能超过{}个", MAX_SYMBOLS),
            ValidationError::StartNotBeforeEnd => write!(f, "开始日期必须早于结束日期"),
            ValidationError::SpanTooLong => write!(f, "回测时间范围不能超过5年"),
            ValidationError::CashTooLow => write!(f, "初始资金不能少于10000元"),
            ValidationError::CashTooHigh => write!(f, "初始资金不能超过1亿元"),
            ValidationError::Commission => write!(f, "手续费率必须在0-1%之间"),
            ValidationError::Slippage => write!(f, "滑点必须在0-1%之间"),
            ValidationError::MissingId => write!(f, "Missing backtest id"),
            ValidationError::UnknownSide(s) => write!(f, "Unknown trade side {:?}", s),
        }
    }
}

impl std::error::Error for ValidationError {}
