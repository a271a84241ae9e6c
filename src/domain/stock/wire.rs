//! Wire types for stock endpoints.

use serde::{Deserialize, Serialize};

/// `GET /stocks/{code}/basic`, and each entry of list/search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockBasicResponse {
    pub ts_code: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub list_date: Option<String>,
}

/// `GET /stocks` and `GET /stocks/search` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StocksResponse {
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub stocks: Vec<StockBasicResponse>,
}

/// `POST /stocks/refresh` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub count: u64,
}
