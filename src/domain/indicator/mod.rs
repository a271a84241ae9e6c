//! Technical indicator domain — per-date MA/MACD/RSI/BOLL/KDJ values.
//!
//! Values are computed server-side; this slice only carries them. Any value
//! may be absent for warm-up periods with insufficient history.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

pub use convert::sets_from_wire;

use crate::shared::SignalType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Indicator values for one trade date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub trade_date: Option<NaiveDate>,

    pub ma5: Option<f64>,
    pub ma10: Option<f64>,
    pub ma20: Option<f64>,
    pub ma30: Option<f64>,
    pub ma60: Option<f64>,
    pub ma120: Option<f64>,

    pub macd_dif: Option<f64>,
    pub macd_dea: Option<f64>,
    pub macd_histogram: Option<f64>,

    pub rsi6: Option<f64>,
    pub rsi12: Option<f64>,
    pub rsi14: Option<f64>,
    pub rsi24: Option<f64>,

    pub boll_upper: Option<f64>,
    pub boll_mid: Option<f64>,
    pub boll_lower: Option<f64>,

    pub kdj_k: Option<f64>,
    pub kdj_d: Option<f64>,
    pub kdj_j: Option<f64>,

    pub volume_ratio: Option<f64>,
    pub turnover_rate: Option<f64>,

    pub signal: Option<SignalType>,
}

impl IndicatorSet {
    /// Server-computed moving average for a supported window.
    pub fn ma(&self, window: usize) -> Option<f64> {
        match window {
            5 => self.ma5,
            10 => self.ma10,
            20 => self.ma20,
            30 => self.ma30,
            60 => self.ma60,
            120 => self.ma120,
            _ => None,
        }
    }

    /// True when no numeric value is present at all.
    pub fn is_empty(&self) -> bool {
        IndicatorKind::ALL
            .iter()
            .flat_map(|k| k.lines())
            .all(|line| line.value(self).is_none())
            && [5, 10, 20, 30, 60, 120].iter().all(|w| self.ma(*w).is_none())
    }
}

/// Indicator families that can be overlaid on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndicatorKind {
    Boll,
    Macd,
    Rsi,
    Kdj,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 4] = [Self::Boll, Self::Macd, Self::Rsi, Self::Kdj];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boll => "BOLL",
            Self::Macd => "MACD",
            Self::Rsi => "RSI",
            Self::Kdj => "KDJ",
        }
    }

    /// BOLL shares the price axis; the oscillators need their own grid.
    pub fn overlays_price(&self) -> bool {
        matches!(self, Self::Boll)
    }

    pub fn lines(&self) -> &'static [IndicatorLine] {
        use IndicatorLine::*;
        match self {
            Self::Boll => &[BollUpper, BollMid, BollLower],
            Self::Macd => &[MacdDif, MacdDea, MacdHistogram],
            Self::Rsi => &[Rsi6, Rsi12, Rsi24],
            Self::Kdj => &[KdjK, KdjD, KdjJ],
        }
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single plottable indicator line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorLine {
    BollUpper,
    BollMid,
    BollLower,
    MacdDif,
    MacdDea,
    MacdHistogram,
    Rsi6,
    Rsi12,
    Rsi24,
    KdjK,
    KdjD,
    KdjJ,
}

impl IndicatorLine {
    pub fn kind(&self) -> IndicatorKind {
        use IndicatorLine::*;
        match self {
            BollUpper | BollMid | BollLower => IndicatorKind::Boll,
            MacdDif | MacdDea | MacdHistogram => IndicatorKind::Macd,
            Rsi6 | Rsi12 | Rsi24 => IndicatorKind::Rsi,
            KdjK | KdjD | KdjJ => IndicatorKind::Kdj,
        }
    }

    pub fn label(&self) -> &'static str {
        use IndicatorLine::*;
        match self {
            BollUpper => "BOLL上轨",
            BollMid => "BOLL中轨",
            BollLower => "BOLL下轨",
            MacdDif => "DIF",
            MacdDea => "DEA",
            MacdHistogram => "MACD",
            Rsi6 => "RSI6",
            Rsi12 => "RSI12",
            Rsi24 => "RSI24",
            KdjK => "K",
            KdjD => "D",
            KdjJ => "J",
        }
    }

    pub fn value(&self, set: &IndicatorSet) -> Option<f64> {
        use IndicatorLine::*;
        match self {
            BollUpper => set.boll_upper,
            BollMid => set.boll_mid,
            BollLower => set.boll_lower,
            MacdDif => set.macd_dif,
            MacdDea => set.macd_dea,
            MacdHistogram => set.macd_histogram,
            Rsi6 => set.rsi6,
            Rsi12 => set.rsi12.or(set.rsi14),
            Rsi24 => set.rsi24,
            KdjK => set.kdj_k,
            KdjD => set.kdj_d,
            KdjJ => set.kdj_j,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ma_lookup() {
        let set = IndicatorSet {
            ma5: Some(10.0),
            ma60: Some(9.0),
            ..Default::default()
        };
        assert_eq!(set.ma(5), Some(10.0));
        assert_eq!(set.ma(60), Some(9.0));
        assert_eq!(set.ma(7), None);
        assert!(!set.is_empty());
        assert!(IndicatorSet::default().is_empty());
    }

    #[test]
    fn test_line_values_and_kinds() {
        let set = IndicatorSet {
            rsi14: Some(55.0),
            kdj_j: Some(80.0),
            ..Default::default()
        };
        assert_eq!(IndicatorLine::Rsi12.value(&set), Some(55.0));
        assert_eq!(IndicatorLine::KdjJ.value(&set), Some(80.0));
        for kind in IndicatorKind::ALL {
            assert!(kind.lines().iter().all(|l| l.kind() == kind));
        }
        assert!(IndicatorKind::Boll.overlays_price());
        assert!(!IndicatorKind::Macd.overlays_price());
    }
}
