//! Conversions from wire bars to domain bars.

use super::wire::DailyBarResponse;
use super::{DailyBar, ValidationError};
use crate::chart::normalize::normalize_date;
use chrono::NaiveDate;

impl TryFrom<DailyBarResponse> for DailyBar {
    type Error = ValidationError;

    fn try_from(w: DailyBarResponse) -> Result<Self, Self::Error> {
        let label = normalize_date(w.trade_date.trim());
        let trade_date = NaiveDate::parse_from_str(&label, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(w.trade_date.clone()))?;

        let require = |value: Option<f64>, field: &'static str| {
            value.ok_or_else(|| ValidationError::MissingField {
                date: label.clone(),
                field,
            })
        };
        let open = require(w.open, "open")?;
        let high = require(w.high, "high")?;
        let low = require(w.low, "low")?;
        let close = require(w.close, "close")?;
        let volume = require(w.vol, "vol")?;
        if volume < 0.0 {
            return Err(ValidationError::NegativeVolume(label));
        }

        Ok(Self {
            trade_date,
            open,
            high,
            low,
            close,
            volume,
            amount: w.amount,
            pct_chg: w.pct_chg,
            pre_close: w.pre_close,
            change: w.change,
        })
    }
}

/// Validate, sort ascending by date and de-duplicate (last record for a date
/// wins). Malformed bars are dropped with a warning, never zero-filled.
pub fn bars_from_wire(raw: Vec<DailyBarResponse>) -> Vec<DailyBar> {
    let mut bars: Vec<DailyBar> = raw
        .into_iter()
        .filter_map(|w| match DailyBar::try_from(w) {
            Ok(bar) => Some(bar),
            Err(e) => {
                tracing::warn!("dropping daily bar: {}", e);
                None
            }
        })
        .collect();

    bars.sort_by_key(|b| b.trade_date);
    let mut deduped: Vec<DailyBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(last) if last.trade_date == bar.trade_date => *last = bar,
            _ => deduped.push(bar),
        }
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<DailyBarResponse> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_mixed_encodings_normalize() {
        let bars = bars_from_wire(parse(
            r#"[
                {"ts_code":"000001.SZ","trade_date":"20240103","open":"10.5","high":10.9,"low":"10.1","close":"10.8","vol":"123456","amount":"13200.5","pct_chg":"1.2"},
                {"ts_code":"000001.SZ","trade_date":"2024-01-02T00:00:00Z","open":10.0,"high":10.6,"low":9.9,"close":10.4,"vol":98000}
            ]"#,
        ));
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date_label(), "2024-01-02");
        assert_eq!(bars[1].date_label(), "2024-01-03");
        assert_eq!(bars[1].open, 10.5);
        assert_eq!(bars[1].amount, Some(13200.5));
        assert_eq!(bars[0].pct_chg, None);
    }

    #[test]
    fn test_missing_fields_drop_bar() {
        let bars = bars_from_wire(parse(
            r#"[
                {"trade_date":"20240102","open":"10","high":"11","low":"9","close":"","vol":"100"},
                {"trade_date":"20240103","open":"10","high":"11","low":"9","close":"10.5"},
                {"trade_date":"2024/01/04","open":"10","high":"11","low":"9","close":"10.5","vol":"1"},
                {"trade_date":"20240105","open":"10","high":"11","low":"9","close":"10.5","vol":"0"}
            ]"#,
        ));
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date_label(), "2024-01-05");
        assert_eq!(bars[0].volume, 0.0);
    }

    #[test]
    fn test_duplicate_dates_keep_last() {
        let bars = bars_from_wire(parse(
            r#"[
                {"trade_date":"20240102","open":1,"high":2,"low":0.5,"close":1.5,"vol":10},
                {"trade_date":"20240102","open":1,"high":2,"low":0.5,"close":1.8,"vol":12}
            ]"#,
        ));
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 1.8);
    }

    #[test]
    fn test_error_messages() {
        let w = DailyBarResponse {
            trade_date: "20240102".into(),
            ..Default::default()
        };
        let err = DailyBar::try_from(w).unwrap_err();
        assert_eq!(err.to_string(), "Bar 2024-01-02 missing open");
    }
}
