//! Conversions from wire indicator records to domain sets.

use super::wire::{IndicatorResponse, IndicatorsResponse};
use super::IndicatorSet;
use crate::chart::normalize::normalize_date;
use crate::shared::SignalType;
use chrono::NaiveDate;

impl From<IndicatorResponse> for IndicatorSet {
    /// Flat fields win over nested ones when both are present.
    fn from(w: IndicatorResponse) -> Self {
        let ma = w.ma.unwrap_or_default();
        let macd = w.macd.unwrap_or_default();
        let rsi = w.rsi.unwrap_or_default();
        let boll = w.boll.unwrap_or_default();
        let kdj = w.kdj.unwrap_or_default();

        let signal = [
            w.signal.as_deref(),
            macd.signal.as_deref(),
            kdj.signal.as_deref(),
            rsi.signal.as_deref(),
            boll.signal.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find_map(SignalType::parse_label);

        let trade_date = w.trade_date.as_deref().and_then(|d| {
            NaiveDate::parse_from_str(&normalize_date(d.trim()), "%Y-%m-%d").ok()
        });

        Self {
            trade_date,
            ma5: w.ma5.or(ma.ma5),
            ma10: w.ma10.or(ma.ma10),
            ma20: w.ma20.or(ma.ma20),
            ma30: w.ma30.or(ma.ma30),
            ma60: w.ma60.or(ma.ma60),
            ma120: w.ma120.or(ma.ma120),
            macd_dif: w.macd_dif.or(macd.dif),
            macd_dea: w.macd_dea.or(macd.dea),
            macd_histogram: w.macd_histogram.or(macd.histogram),
            rsi6: w.rsi6.or(rsi.rsi6),
            rsi12: w.rsi12.or(rsi.rsi12),
            rsi14: w.rsi14.or(rsi.rsi14),
            rsi24: w.rsi24.or(rsi.rsi24),
            boll_upper: w.boll_upper.or(boll.upper),
            boll_mid: w.boll_mid.or(boll.middle),
            boll_lower: w.boll_lower.or(boll.lower),
            kdj_k: w.kdj_k.or(kdj.k),
            kdj_d: w.kdj_d.or(kdj.d),
            kdj_j: w.kdj_j.or(kdj.j),
            volume_ratio: w.volume_ratio,
            turnover_rate: w.turnover_rate,
            signal,
        }
    }
}

/// Convert either payload shape into sets ordered by trade date.
pub fn sets_from_wire(resp: IndicatorsResponse) -> Vec<IndicatorSet> {
    let records = match resp {
        IndicatorsResponse::Many(list) => list,
        IndicatorsResponse::One(one) => vec![*one],
    };
    let mut sets: Vec<IndicatorSet> = records.into_iter().map(IndicatorSet::from).collect();
    sets.sort_by_key(|s| s.trade_date);
    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_latest_record() {
        let resp: IndicatorsResponse = serde_json::from_str(
            r#"{
                "ts_code":"600519.SH","trade_date":"20240301",
                "macd":{"dif":"1.25","dea":"0.98","histogram":"0.54","signal":"金叉"},
                "rsi":{"rsi14":"62.3","signal":"中性"},
                "boll":{"upper":"1750.1","middle":"1700.0","lower":"1649.9","signal":""},
                "ma":{"ma5":"1710.2","ma10":"1702.8","ma20":"1698.5","ma60":"1680.0","ma120":"0"},
                "kdj":{"k":"70.1","d":"65.2","j":"79.9","signal":"买入"}
            }"#,
        )
        .unwrap();
        let sets = sets_from_wire(resp);
        assert_eq!(sets.len(), 1);
        let s = &sets[0];
        assert_eq!(s.trade_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(s.macd_dif, Some(1.25));
        assert_eq!(s.boll_mid, Some(1700.0));
        assert_eq!(s.rsi14, Some(62.3));
        assert_eq!(s.ma120, Some(0.0));
        assert_eq!(s.signal, Some(SignalType::Buy));
    }

    #[test]
    fn test_flat_list_sorted_and_flat_wins() {
        let resp: IndicatorsResponse = serde_json::from_str(
            r#"[
                {"trade_date":"2024-03-04","ma5":11.0,"macd_dif":0.3,"rsi6":55,"kdj_k":"60"},
                {"trade_date":"20240301","ma5":10.5,"ma":{"ma5":"99"},"boll_middle":"10.2"}
            ]"#,
        )
        .unwrap();
        let sets = sets_from_wire(resp);
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].trade_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(sets[0].ma5, Some(10.5));
        assert_eq!(sets[0].boll_mid, Some(10.2));
        assert_eq!(sets[1].kdj_k, Some(60.0));
        assert_eq!(sets[1].signal, None);
    }

    #[test]
    fn test_flat_signal_takes_precedence() {
        let w = IndicatorResponse {
            signal: Some("SELL".into()),
            macd: Some(super::super::wire::MacdWire {
                signal: Some("金叉".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(IndicatorSet::from(w).signal, Some(SignalType::Sell));
    }
}
