//! Wire types for `GET /stocks/{code}/daily`.

use crate::shared::serde_util::lenient_f64;
use serde::{Deserialize, Serialize};

/// One bar as sent by the backend. Numbers may be strings or numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyBarResponse {
    #[serde(default)]
    pub ts_code: Option<String>,
    pub trade_date: String,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub pre_close: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub change: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub pct_chg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub vol: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub amount: Option<f64>,
}
