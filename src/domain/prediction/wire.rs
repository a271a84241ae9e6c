//! Wire types for `GET /stocks/{code}/predictions`.

use crate::shared::serde_util::{lenient_decimal, lenient_f64};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionItemResponse {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub probability: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub indicators: Vec<String>,
    #[serde(default)]
    pub signal_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub target_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub stop_loss: Option<Decimal>,
    #[serde(default)]
    pub backtested: bool,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub next_day_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub price_diff: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal::deserialize")]
    pub price_diff_ratio: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub ts_code: String,
    #[serde(default)]
    pub trade_date: Option<String>,
    #[serde(default)]
    pub predictions: Vec<PredictionItemResponse>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "crate::shared::serde_util::optional_timestamp::deserialize")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}
