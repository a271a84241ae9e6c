//! Candlestick pattern queries. Results are passed through as JSON; only the
//! request side is typed.

#[cfg(feature = "http")]
pub mod client;

use crate::shared::{DateRange, StockCode};
use serde::{Deserialize, Serialize};

/// Body of `POST /patterns/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSearch {
    pub ts_code: StockCode,
    pub start_date: String,
    pub end_date: String,
    /// Pattern names to look for; empty searches all known patterns.
    pub patterns: Vec<String>,
    pub min_confidence: f64,
}

impl PatternSearch {
    pub fn new(ts_code: StockCode, range: &DateRange) -> Self {
        Self {
            ts_code,
            start_date: range.start_param(),
            end_date: range.end_param(),
            patterns: Vec::new(),
            min_confidence: 0.0,
        }
    }

    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Clamped into `[0, 1]`.
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_body() {
        let code = StockCode::parse("000001.SZ").unwrap();
        let range = DateRange::parse("2024-01-01", "2024-06-30").unwrap();
        let search = PatternSearch::new(code, &range)
            .with_patterns(["锤子线", "吞没形态"])
            .with_min_confidence(1.7);
        let json = serde_json::to_value(&search).unwrap();
        assert_eq!(json["start_date"], "20240101");
        assert_eq!(json["end_date"], "20240630");
        assert_eq!(json["patterns"][1], "吞没形态");
        assert_eq!(json["min_confidence"], 1.0);
    }
}
