//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the backend sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod fmt;
pub mod serde_util;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── StockCode ───────────────────────────────────────────────────────────────

/// Exchange suffix of an A-share code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    /// Shenzhen.
    SZ,
    /// Shanghai.
    SH,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SZ => "SZ",
            Self::SH => "SH",
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rejected stock code input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockCodeError(pub String);

impl std::fmt::Display for StockCodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid stock code {:?}: expected six digits followed by .SZ or .SH",
            self.0
        )
    }
}

impl std::error::Error for StockCodeError {}

/// Validated `ts_code` such as `"600519.SH"`.
///
/// Parsing trims surrounding whitespace and upper-cases the exchange suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StockCode(String);

impl StockCode {
    pub fn parse(s: &str) -> Result<Self, StockCodeError> {
        let trimmed = s.trim();
        let (digits, exchange) = trimmed
            .split_once('.')
            .ok_or_else(|| StockCodeError(s.to_string()))?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StockCodeError(s.to_string()));
        }
        let exchange = exchange.to_ascii_uppercase();
        if exchange != "SZ" && exchange != "SH" {
            return Err(StockCodeError(s.to_string()));
        }
        Ok(Self(format!("{}.{}", digits, exchange)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The six-digit symbol without exchange suffix.
    pub fn symbol(&self) -> &str {
        &self.0[..6]
    }

    pub fn exchange(&self) -> Exchange {
        if self.0.ends_with("SH") {
            Exchange::SH
        } else {
            Exchange::SZ
        }
    }
}

impl std::fmt::Display for StockCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StockCode {
    type Err = StockCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for StockCode {
    type Error = StockCodeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl Serialize for StockCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StockCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        StockCode::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ─── TimeRange ───────────────────────────────────────────────────────────────

/// Time-range shortcut offered by the detail view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1M")]
    Month1,
    #[default]
    #[serde(rename = "3M")]
    Month3,
    #[serde(rename = "6M")]
    Month6,
    #[serde(rename = "1Y")]
    Year1,
    #[serde(rename = "2Y")]
    Year2,
    #[serde(rename = "5Y")]
    Year5,
}

impl TimeRange {
    pub const ALL: [TimeRange; 6] = [
        Self::Month1,
        Self::Month3,
        Self::Month6,
        Self::Year1,
        Self::Year2,
        Self::Year5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Month1 => "1M",
            Self::Month3 => "3M",
            Self::Month6 => "6M",
            Self::Year1 => "1Y",
            Self::Year2 => "2Y",
            Self::Year5 => "5Y",
        }
    }

    /// Calendar days covered by the shortcut.
    pub fn days(&self) -> i64 {
        match self {
            Self::Month1 => 30,
            Self::Month3 => 90,
            Self::Month6 => 180,
            Self::Year1 => 365,
            Self::Year2 => 730,
            Self::Year5 => 1825,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Month1 => "1个月",
            Self::Month3 => "3个月",
            Self::Month6 => "6个月",
            Self::Year1 => "1年",
            Self::Year2 => "2年",
            Self::Year5 => "5年",
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── DateRange ───────────────────────────────────────────────────────────────

/// Days looked back when no range has been chosen.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 60;

/// Rejected date range input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    Unparseable(String),
    Reversed { start: NaiveDate, end: NaiveDate },
}

impl std::fmt::Display for DateRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unparseable(s) => write!(f, "unparseable date {:?}", s),
            Self::Reversed { start, end } => {
                write!(f, "start date {} is after end date {}", start, end)
            }
        }
    }
}

impl std::error::Error for DateRangeError {}

/// Inclusive calendar date range, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses both ends from `YYYYMMDD` or `YYYY-MM-DD`.
    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// The `days` calendar days ending at `today`.
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        let start = today - Duration::days(days.max(0));
        Self { start, end: today }
    }

    pub fn from_time_range(today: NaiveDate, range: TimeRange) -> Self {
        Self::last_days(today, range.days())
    }

    pub fn default_lookback(today: NaiveDate) -> Self {
        Self::last_days(today, DEFAULT_LOOKBACK_DAYS)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// `start` as the `YYYYMMDD` query parameter.
    pub fn start_param(&self) -> String {
        self.start.format("%Y%m%d").to_string()
    }

    /// `end` as the `YYYYMMDD` query parameter.
    pub fn end_param(&self) -> String {
        self.end.format("%Y%m%d").to_string()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_param(), self.end_param())
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, DateRangeError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| DateRangeError::Unparseable(s.to_string()))
}

// ─── Adjust ──────────────────────────────────────────────────────────────────

/// Price adjustment convention passed through to the daily endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjust {
    #[default]
    Qfq,
    Hfq,
    None,
}

impl Adjust {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qfq => "qfq",
            Self::Hfq => "hfq",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for Adjust {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── SignalType ──────────────────────────────────────────────────────────────

/// Categorical trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Buy,
    Sell,
    Hold,
}

impl SignalType {
    /// Reads the backend's signal labels, English or Chinese.
    pub fn parse_label(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_ascii_uppercase().as_str() {
            "BUY" => return Some(Self::Buy),
            "SELL" => return Some(Self::Sell),
            "HOLD" | "NEUTRAL" => return Some(Self::Hold),
            _ => {}
        }
        match s {
            "买入" | "金叉" | "超卖" => Some(Self::Buy),
            "卖出" | "死叉" | "超买" => Some(Self::Sell),
            "持有" | "观望" | "中性" => Some(Self::Hold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Buy => "买入",
            Self::Sell => "卖出",
            Self::Hold => "持有",
        }
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_code_parse() {
        let code = StockCode::parse(" 600519.sh ").unwrap();
        assert_eq!(code.as_str(), "600519.SH");
        assert_eq!(code.symbol(), "600519");
        assert_eq!(code.exchange(), Exchange::SH);
        assert_eq!("000001.SZ".parse::<StockCode>().unwrap().exchange(), Exchange::SZ);
    }

    #[test]
    fn test_stock_code_rejects_bad_input() {
        for bad in ["", "600519", "60051.SH", "600519.HK", "6005a9.SZ", "600519.SH.SZ"] {
            assert!(StockCode::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_stock_code_serde() {
        let code = StockCode::parse("000001.SZ").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"000001.SZ\"");
        let back: StockCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
        assert!(serde_json::from_str::<StockCode>("\"AAPL\"").is_err());
    }

    #[test]
    fn test_date_range_params() {
        let range = DateRange::parse("20240101", "2024-03-01").unwrap();
        assert_eq!(range.start_param(), "20240101");
        assert_eq!(range.end_param(), "20240301");
        assert!(DateRange::parse("20240301", "20240101").is_err());
        assert!(DateRange::parse("2024/03/01", "20240101").is_err());
    }

    #[test]
    fn test_date_range_shortcuts() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let range = DateRange::from_time_range(today, TimeRange::Month1);
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(range.end(), today);
        let range = DateRange::default_lookback(today);
        assert_eq!((range.end() - range.start()).num_days(), 60);
    }

    #[test]
    fn test_time_range_serde() {
        let r: TimeRange = serde_json::from_str("\"1Y\"").unwrap();
        assert_eq!(r, TimeRange::Year1);
        assert_eq!(r.days(), 365);
        assert_eq!(TimeRange::default(), TimeRange::Month3);
    }

    #[test]
    fn test_signal_labels() {
        assert_eq!(SignalType::parse_label("buy"), Some(SignalType::Buy));
        assert_eq!(SignalType::parse_label("金叉"), Some(SignalType::Buy));
        assert_eq!(SignalType::parse_label("死叉"), Some(SignalType::Sell));
        assert_eq!(SignalType::parse_label("NEUTRAL"), Some(SignalType::Hold));
        assert_eq!(SignalType::parse_label("unknown"), None);
    }

    #[test]
    fn test_adjust_default() {
        assert_eq!(Adjust::default().as_str(), "qfq");
        let a: Adjust = serde_json::from_str("\"hfq\"").unwrap();
        assert_eq!(a, Adjust::Hfq);
    }
}
