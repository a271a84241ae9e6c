//! Favorites domain — saved stocks, their groups and per-favorite signals.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

pub use convert::favorites_from_wire;

use crate::shared::{DateRange, StockCode};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Group every favorite belongs to unless moved elsewhere.
pub const DEFAULT_GROUP_ID: &str = "default";

// ─── Favorite ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub ts_code: StockCode,
    pub name: String,
    /// Range the stock was being viewed with when it was saved.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub group_id: String,
    pub sort_order: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Favorite {
    /// The saved range, when both ends are present and ordered.
    pub fn saved_range(&self) -> Option<DateRange> {
        DateRange::new(self.start_date?, self.end_date?).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteGroup {
    pub id: String,
    pub name: String,
    pub color: String,
    pub sort_order: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FavoriteGroup {
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_GROUP_ID
    }
}

// ─── Requests ────────────────────────────────────────────────────────────────

/// Body of `POST /favorites`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFavorite {
    pub ts_code: StockCode,
    pub name: String,
    #[serde(serialize_with = "ser_compact_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(serialize_with = "ser_compact_date")]
    pub end_date: Option<NaiveDate>,
    pub group_id: String,
}

impl NewFavorite {
    pub fn new(ts_code: StockCode, name: impl Into<String>) -> Self {
        Self {
            ts_code,
            name: name.into(),
            start_date: None,
            end_date: None,
            group_id: DEFAULT_GROUP_ID.to_string(),
        }
    }

    pub fn with_range(mut self, range: &DateRange) -> Self {
        self.start_date = Some(range.start());
        self.end_date = Some(range.end());
        self
    }

    pub fn in_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = group_id.into();
        self
    }
}

/// Body of `PUT /favorites/{id}`. Unset fields are left out of the request
/// and untouched when applied to local state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FavoriteUpdate {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "ser_compact_date"
    )]
    pub start_date: Option<NaiveDate>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "ser_compact_date"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

/// Body of `POST /groups`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGroup {
    pub name: String,
    pub color: String,
}

/// Body of `PUT /groups/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

/// One entry of `PUT /favorites/order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteOrder {
    pub id: String,
    pub group_id: String,
    pub sort_order: i64,
}

fn ser_compact_date<S>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match date {
        Some(d) => s.serialize_str(&d.format("%Y%m%d").to_string()),
        None => s.serialize_str(""),
    }
}

// ─── Signals ─────────────────────────────────────────────────────────────────

/// Lightweight indicator snapshot attached to a favorite's signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalIndicators {
    pub ma5: Option<f64>,
    pub ma10: Option<f64>,
    pub ma20: Option<f64>,
    pub price_change: Option<f64>,
    pub price_change_pct: Option<f64>,
    pub trend: Option<String>,
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteSignal {
    pub id: String,
    pub ts_code: StockCode,
    pub name: String,
    pub group_id: String,
    pub current_price: Option<f64>,
    pub trade_date: Option<NaiveDate>,
    pub indicators: SignalIndicators,
    /// Prediction payload, passed through as the server shapes it.
    pub predictions: serde_json::Value,
    pub updated_at: Option<String>,
}

/// `GET /favorites/signals` result. While `calculating` is set the server
/// is still filling in signals and the list may be partial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalsOverview {
    pub signals: Vec<FavoriteSignal>,
    pub calculating: bool,
    pub calculation_status: Option<serde_json::Value>,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidCode(String),
    MissingId,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidCode(c) => write!(f, "Invalid stock code {:?}", c),
            ValidationError::MissingId => write!(f, "Missing favorite id"),
        }
    }
}

impl std::error::Error for ValidationError {}
