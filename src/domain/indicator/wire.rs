//! Wire types for `GET /stocks/{code}/indicators`.
//!
//! Two shapes exist in the wild: a flat record (`ma5`, `macd_dif`, `rsi6`,
//! `boll_upper`, `kdj_k`, ...) and a nested one (`ma: {ma5}`, `macd: {dif}`,
//! `boll: {upper, middle, lower}`, ...). The payload is either one record
//! (latest date only) or a list of records.

use crate::shared::serde_util::lenient_f64;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MacdWire {
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub dif: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub dea: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub histogram: Option<f64>,
    #[serde(default)]
    pub signal: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RsiWire {
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub rsi6: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub rsi12: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub rsi14: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub rsi24: Option<f64>,
    #[serde(default)]
    pub signal: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BollWire {
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub upper: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub middle: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub lower: Option<f64>,
    #[serde(default)]
    pub signal: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaWire {
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma5: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma10: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma20: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma30: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma60: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma120: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KdjWire {
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub k: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub d: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub j: Option<f64>,
    #[serde(default)]
    pub signal: Option<String>,
}

/// One indicator record, flat and/or nested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorResponse {
    #[serde(default)]
    pub ts_code: Option<String>,
    #[serde(default)]
    pub trade_date: Option<String>,
    #[serde(default)]
    pub signal: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma5: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma10: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma20: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma30: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma60: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma120: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub macd_dif: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub macd_dea: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub macd_histogram: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub rsi6: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub rsi12: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub rsi14: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub rsi24: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub boll_upper: Option<f64>,
    #[serde(default, alias = "boll_middle", deserialize_with = "lenient_f64::deserialize")]
    pub boll_mid: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub boll_lower: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub kdj_k: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub kdj_d: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub kdj_j: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub volume_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub turnover_rate: Option<f64>,

    #[serde(default)]
    pub ma: Option<MaWire>,
    #[serde(default)]
    pub macd: Option<MacdWire>,
    #[serde(default)]
    pub rsi: Option<RsiWire>,
    #[serde(default)]
    pub boll: Option<BollWire>,
    #[serde(default)]
    pub kdj: Option<KdjWire>,
}

/// The `data` payload: a list of records or a single latest-date record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorsResponse {
    Many(Vec<IndicatorResponse>),
    One(Box<IndicatorResponse>),
}
