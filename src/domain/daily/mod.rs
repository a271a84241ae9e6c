//! Daily bar domain — OHLCV history for one stock.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

pub use convert::bars_from_wire;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One trading day. Prices in yuan, volume in lots (手), amount in 千元.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub trade_date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub amount: Option<f64>,
    pub pct_chg: Option<f64>,
    pub pre_close: Option<f64>,
    pub change: Option<f64>,
}

impl DailyBar {
    /// Candle direction: up when close ≥ open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }

    /// `YYYY-MM-DD`.
    pub fn date_label(&self) -> String {
        self.trade_date.format("%Y-%m-%d").to_string()
    }

    /// Absolute change vs. the previous close, from the server field when present.
    pub fn change_value(&self) -> Option<f64> {
        self.change
            .or_else(|| self.pre_close.map(|pc| self.close - pc))
    }

    /// Percent change vs. the previous close, from the server field when present.
    pub fn change_percent(&self) -> Option<f64> {
        self.pct_chg.or_else(|| {
            self.pre_close
                .filter(|pc| *pc != 0.0)
                .map(|pc| (self.close - pc) / pc * 100.0)
        })
    }

    /// Day range as a percent of the previous close.
    pub fn amplitude(&self) -> Option<f64> {
        self.pre_close
            .filter(|pc| *pc != 0.0)
            .map(|pc| (self.high - self.low) / pc * 100.0)
    }
}

/// Why a wire bar was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidDate(String),
    MissingField { date: String, field: &'static str },
    NegativeVolume(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidDate(d) => write!(f, "Invalid trade date {:?}", d),
            ValidationError::MissingField { date, field } => {
                write!(f, "Bar {} missing {}", date, field)
            }
            ValidationError::NegativeVolume(d) => write!(f, "Bar {} has negative volume", d),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(open: f64, close: f64, pre_close: Option<f64>) -> DailyBar {
        DailyBar {
            trade_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open,
            high: open.max(close) + 1.0,
            low: open.min(close) - 1.0,
            close,
            volume: 1000.0,
            amount: None,
            pct_chg: None,
            pre_close,
            change: None,
        }
    }

    #[test]
    fn test_direction_flat_counts_as_up() {
        assert!(bar(10.0, 10.0, None).is_up());
        assert!(bar(10.0, 11.0, None).is_up());
        assert!(!bar(10.0, 9.0, None).is_up());
    }

    #[test]
    fn test_derived_change_fields() {
        let b = bar(10.0, 11.0, Some(10.0));
        assert_eq!(b.change_value(), Some(1.0));
        assert_eq!(b.change_percent(), Some(10.0));
        assert_eq!(b.amplitude(), Some(30.0));
        assert_eq!(bar(10.0, 11.0, None).change_value(), None);
        assert_eq!(b.date_label(), "2024-01-02");
    }
}
