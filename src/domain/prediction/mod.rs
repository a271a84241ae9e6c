//! Prediction domain — server-generated buy/sell signals for one stock.
//!
//! Read-only: fetched per stock, never mutated locally.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::shared::{SignalType, StockCode};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One predicted trading point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionItem {
    pub signal_type: SignalType,
    pub price: Decimal,
    /// Date the prediction targets.
    pub date: Option<NaiveDate>,
    /// In `[0, 1]`.
    pub probability: f64,
    /// Trade date whose data produced the signal.
    pub signal_date: Option<NaiveDate>,
    pub confidence: Option<f64>,
    pub reasons: Vec<String>,
    pub indicators: Vec<String>,
    pub target_price: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub backtest: Option<BacktestOutcome>,
}

impl PredictionItem {
    /// Probability as shown on prediction cards, e.g. `72.0%`.
    pub fn probability_label(&self) -> String {
        crate::shared::fmt::num::format_ratio(self.probability)
    }
}

/// Result of checking a past prediction against the next trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestOutcome {
    pub is_correct: bool,
    pub next_day_price: Option<Decimal>,
    pub price_diff: Option<Decimal>,
    pub price_diff_ratio: Option<Decimal>,
}

/// All predictions for one stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    pub ts_code: StockCode,
    pub trade_date: Option<NaiveDate>,
    pub confidence: Option<f64>,
    pub items: Vec<PredictionItem>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PredictionSet {
    pub fn of_type(&self, signal: SignalType) -> impl Iterator<Item = &PredictionItem> {
        self.items.iter().filter(move |p| p.signal_type == signal)
    }

    /// Most recent prediction by signal date.
    pub fn latest(&self) -> Option<&PredictionItem> {
        self.items.iter().max_by_key(|p| p.signal_date)
    }

    /// Share of backtested predictions that turned out correct.
    pub fn backtest_accuracy(&self) -> Option<f64> {
        let tested: Vec<&BacktestOutcome> =
            self.items.iter().filter_map(|p| p.backtest.as_ref()).collect();
        if tested.is_empty() {
            return None;
        }
        let correct = tested.iter().filter(|b| b.is_correct).count();
        Some(correct as f64 / tested.len() as f64)
    }
}

/// Why a wire prediction was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    UnknownType(String),
    MissingPrice,
    InvalidCode(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownType(t) => write!(f, "Unknown prediction type {:?}", t),
            ValidationError::MissingPrice => write!(f, "Missing price"),
            ValidationError::InvalidCode(c) => write!(f, "Invalid stock code {:?}", c),
        }
    }
}

impl std::error::Error for ValidationError {}
