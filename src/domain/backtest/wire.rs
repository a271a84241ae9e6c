//! Wire types for `/backtests`.

use crate::domain::strategy::wire::StrategyResponse;
use crate::shared::serde_util::{lenient_f64, optional_timestamp, string_or_number};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacktestResponse {
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub strategy_ids: Vec<String>,
    #[serde(default)]
    pub strategy_names: Vec<String>,
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub initial_cash: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub commission: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub slippage: Option<f64>,
    #[serde(default)]
    pub benchmark: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub progress: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp::deserialize")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, deserialize_with = "optional_timestamp::deserialize")]
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, deserialize_with = "optional_timestamp::deserialize")]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacktestListResponse {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub items: Vec<BacktestResponse>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressResponse {
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub backtest_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub progress: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub current_date: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsResponse {
    #[serde(default)]
    pub strategy_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub total_return: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub annual_return: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub max_drawdown: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub sharpe_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub sortino_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub win_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub profit_factor: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub total_trades: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub avg_trade_return: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub benchmark_return: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub alpha: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub beta: Option<f64>,
}

/// Single-strategy runs report one metrics object, multi-strategy runs an array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(t) => vec![t],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquityPointResponse {
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub portfolio_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub benchmark_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub cash: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub holdings: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyCurveResponse {
    #[serde(default)]
    pub strategy_id: Option<String>,
    #[serde(default)]
    pub equity_curve: Vec<EquityPointResponse>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeResponse {
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    #[serde(default)]
    pub strategy_id: Option<String>,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub side: String,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub commission: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub pnl: Option<f64>,
    #[serde(default)]
    pub signal_type: Option<String>,
    /// ISO timestamp or bare date.
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacktestConfigResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub initial_cash: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub commission: Option<f64>,
    #[serde(default)]
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsResponse {
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub backtest_id: String,
    #[serde(default)]
    pub performance: Option<OneOrMany<MetricsResponse>>,
    #[serde(default)]
    pub combined_metrics: Option<MetricsResponse>,
    #[serde(default)]
    pub equity_curve: Vec<EquityPointResponse>,
    #[serde(default)]
    pub strategy_performances: Vec<StrategyCurveResponse>,
    #[serde(default)]
    pub trades: Vec<TradeResponse>,
    #[serde(default)]
    pub strategies: Vec<StrategyResponse>,
    /// Single-strategy runs from older servers.
    #[serde(default)]
    pub strategy: Option<StrategyResponse>,
    #[serde(default)]
    pub backtest_config: Option<BacktestConfigResponse>,
}

/// `data` of `POST /backtests/{id}/start`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartResponse {
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp::deserialize")]
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
}
