//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Rich domain types (validated, chart-ready)
//! - `wire.rs` — Raw serde structs matching backend responses
//! - `convert.rs` — `TryFrom`/`From` conversions with validation
//! - `state.rs` — App-owned state containers with update methods
//! - `client.rs` — Sub-client with HTTP methods and caching

pub mod backtest;
pub mod daily;
pub mod favorite;
pub mod fundamental;
pub mod health;
pub mod indicator;
pub mod pattern;
pub mod prediction;
pub mod stock;
pub mod strategy;
