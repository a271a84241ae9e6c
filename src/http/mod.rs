//! HTTP client layer — `StockHttp` with per-endpoint retry policies.

pub mod client;
pub mod retry;

pub use client::{Envelope, StockHttp};
pub use retry::{RetryConfig, RetryPolicy};
