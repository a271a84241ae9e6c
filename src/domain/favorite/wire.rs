//! Wire types for favorites and groups.

use crate::shared::serde_util::{lenient_f64, optional_timestamp, string_or_number};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteResponse {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    pub ts_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default, deserialize_with = "optional_timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_timestamp::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default, deserialize_with = "optional_timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_timestamp::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `GET /favorites` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesResponse {
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub favorites: Vec<FavoriteResponse>,
}

/// `GET /groups` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupsResponse {
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub groups: Vec<GroupResponse>,
}

/// `GET /favorites/check/{code}` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub ts_code: String,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Body of `PUT /favorites/order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub favorite_orders: Vec<super::FavoriteOrder>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimpleIndicatorResponse {
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma5: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma10: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub ma20: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub current_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub price_change: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub price_change_pct: Option<f64>,
    #[serde(default)]
    pub trend: Option<String>,
    #[serde(default)]
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteSignalResponse {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    pub ts_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub trade_date: Option<String>,
    #[serde(default)]
    pub indicators: SimpleIndicatorResponse,
    #[serde(default)]
    pub predictions: serde_json::Value,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// `GET /favorites/signals` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalsResponse {
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub signals: Vec<FavoriteSignalResponse>,
    #[serde(default)]
    pub calculating: bool,
    #[serde(default)]
    pub calculation_status: Option<serde_json::Value>,
}
