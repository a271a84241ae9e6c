//! Network URL constants for the Stock-A-Future SDK.

/// Default REST API base URL (the analytics server's standard local port).
pub const DEFAULT_API_URL: &str = "http://localhost:8081";

/// Versioned path prefix shared by every endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Environment variable consulted by `StockClientBuilder::from_env`.
pub const API_URL_ENV: &str = "STOCK_API_URL";
