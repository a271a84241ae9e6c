//! Wire types for `/strategies`.

use crate::shared::serde_util::{lenient_f64, optional_timestamp, string_or_number};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyResponse {
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub strategy_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Older servers sent parameters as a JSON-encoded string.
    #[serde(default)]
    pub parameters: Option<Value>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp::deserialize")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, deserialize_with = "optional_timestamp::deserialize")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyListResponse {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub items: Vec<StrategyResponse>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyPerformanceResponse {
    #[serde(default)]
    pub strategy_id: String,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub total_return: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub annual_return: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub max_drawdown: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub sharpe_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub win_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub total_trades: Option<f64>,
    #[serde(default, deserialize_with = "optional_timestamp::deserialize")]
    pub last_updated: Option<chrono::DateTime<chrono::Utc>>,
}

/// `parameters` as an object, whether sent inline or as an encoded string.
pub(crate) fn parameters_object(raw: Option<Value>) -> Map<String, Value> {
    match raw {
        Some(Value::Object(map)) => map,
        Some(Value::String(s)) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}
