//! Field normalization for raw bar and indicator values.
//!
//! The backend mixes string and numeric encodings and two date formats. Every
//! value entering the chart pipeline passes through here first. Unparseable
//! numbers become `None`, never zero, so "no data" stays distinguishable from
//! a real zero.

use serde_json::Value;

/// Normalize a trade date for display and keying.
///
/// - Contains `T` (ISO-8601): the part before the first `T`.
/// - Exactly eight ASCII digits (`YYYYMMDD`): sliced into `YYYY-MM-DD`
///   without calendar validation (`"20991399"` → `"2099-13-99"`).
/// - Anything else passes through unchanged.
pub fn normalize_date(raw: &str) -> String {
    if let Some((date, _)) = raw.split_once('T') {
        return date.to_string();
    }
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[6..]);
    }
    raw.to_string()
}

/// `YYYY-MM-DD` (or ISO-8601) back to the `YYYYMMDD` request form.
pub fn compact_date(raw: &str) -> String {
    normalize_date(raw).replace('-', "")
}

/// Parse a JSON number or numeric string. Missing, blank, non-numeric and
/// non-finite inputs yield `None`.
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_str(s)?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// String form of [`parse_number`].
pub fn parse_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Indicator values of exactly zero mark warm-up periods on the backend and
/// are not plottable.
pub fn plottable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_date_compact() {
        assert_eq!(normalize_date("20240115"), "2024-01-15");
        assert_eq!(normalize_date("20991399"), "2099-13-99");
    }

    #[test]
    fn test_normalize_date_iso() {
        assert_eq!(normalize_date("2024-01-15T00:00:00Z"), "2024-01-15");
        assert_eq!(normalize_date("2024-01-15T08:00:00+08:00"), "2024-01-15");
    }

    #[test]
    fn test_normalize_date_passthrough() {
        assert_eq!(normalize_date("2024-01-15"), "2024-01-15");
        assert_eq!(normalize_date("2024011"), "2024011");
        assert_eq!(normalize_date("2024O115"), "2024O115");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn test_compact_date() {
        assert_eq!(compact_date("2024-03-01"), "20240301");
        assert_eq!(compact_date("20240301"), "20240301");
    }

    #[test]
    fn test_parse_number_variants() {
        assert_eq!(parse_number(&json!(12.5)), Some(12.5));
        assert_eq!(parse_number(&json!("12.50")), Some(12.5));
        assert_eq!(parse_number(&json!(" 7 ")), Some(7.0));
        assert_eq!(parse_number(&json!("0")), Some(0.0));
        assert_eq!(parse_number(&json!(0)), Some(0.0));
    }

    #[test]
    fn test_parse_number_missing_is_not_zero() {
        assert_eq!(parse_number(&json!(null)), None);
        assert_eq!(parse_number(&json!("")), None);
        assert_eq!(parse_number(&json!("abc")), None);
        assert_eq!(parse_number(&json!("NaN")), None);
        assert_eq!(parse_number(&json!("inf")), None);
        assert_eq!(parse_number(&json!(true)), None);
        assert_eq!(parse_number(&json!({"v": 1})), None);
    }

    #[test]
    fn test_plottable_filters_zero() {
        assert_eq!(plottable(Some(0.0)), None);
        assert_eq!(plottable(None), None);
        assert_eq!(plottable(Some(1.5)), Some(1.5));
    }
}
