//! Conversions from wire types to domain types for stocks.

use super::wire::{RefreshResponse, StockBasicResponse, StocksResponse};
use super::{RefreshResult, StockBasic, StockList, ValidationError};
use crate::chart::normalize::normalize_date;
use crate::shared::StockCode;

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl TryFrom<StockBasicResponse> for StockBasic {
    type Error = ValidationError;

    fn try_from(w: StockBasicResponse) -> Result<Self, Self::Error> {
        let ts_code = StockCode::parse(&w.ts_code).map_err(ValidationError::Code)?;
        let name = non_blank(w.name).ok_or_else(|| ValidationError::MissingName(w.ts_code))?;
        let symbol = non_blank(w.symbol).unwrap_or_else(|| ts_code.symbol().to_string());
        Ok(Self {
            symbol,
            name,
            area: non_blank(w.area),
            industry: non_blank(w.industry),
            market: non_blank(w.market),
            list_date: non_blank(w.list_date).map(|d| normalize_date(&d)),
            ts_code,
        })
    }
}

impl From<StocksResponse> for StockList {
    /// Entries that fail validation (other exchanges, blank names) are skipped.
    fn from(w: StocksResponse) -> Self {
        let stocks: Vec<StockBasic> = w
            .stocks
            .into_iter()
            .filter_map(|s| match StockBasic::try_from(s) {
                Ok(basic) => Some(basic),
                Err(e) => {
                    tracing::debug!("skipping stock entry: {}", e);
                    None
                }
            })
            .collect();
        Self {
            total: w.total.unwrap_or(stocks.len()),
            stocks,
        }
    }
}

impl From<RefreshResponse> for RefreshResult {
    fn from(w: RefreshResponse) -> Self {
        Self {
            message: w.message,
            count: w.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_conversion_normalizes() {
        let wire: StockBasicResponse = serde_json::from_str(
            r#"{"ts_code":"600519.SH","symbol":"","name":"贵州茅台","area":"贵州","industry":"白酒","market":"主板","list_date":"20010827"}"#,
        )
        .unwrap();
        let basic = StockBasic::try_from(wire).unwrap();
        assert_eq!(basic.ts_code.as_str(), "600519.SH");
        assert_eq!(basic.symbol, "600519");
        assert_eq!(basic.industry.as_deref(), Some("白酒"));
        assert_eq!(basic.list_date.as_deref(), Some("2001-08-27"));
    }

    #[test]
    fn test_basic_conversion_rejects_blank_name() {
        let wire: StockBasicResponse =
            serde_json::from_str(r#"{"ts_code":"000001.SZ","name":"  "}"#).unwrap();
        assert!(matches!(
            StockBasic::try_from(wire),
            Err(ValidationError::MissingName(_))
        ));
    }

    #[test]
    fn test_search_results_skip_invalid_entries() {
        let wire: StocksResponse = serde_json::from_str(
            r#"{"keyword":"贵州","total":3,"stocks":[
                {"ts_code":"600519.SH","name":"贵州茅台"},
                {"ts_code":"830799.BJ","name":"艾融软件"},
                {"ts_code":"000851.SZ","name":"高鸿股份"}
            ]}"#,
        )
        .unwrap();
        let list = StockList::from(wire);
        assert_eq!(list.total, 3);
        assert_eq!(list.stocks.len(), 2);
        assert_eq!(list.stocks[0].display_label(), "贵州茅台 (600519.SH)");
    }
}
