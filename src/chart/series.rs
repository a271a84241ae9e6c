//! Chart-ready arrays derived from one stock's daily bars.

use crate::chart::ma::moving_average;
use crate::chart::normalize::normalize_date;
use crate::domain::daily::DailyBar;
use crate::shared::{DateRange, StockCode};
use chrono::NaiveDate;

/// The `(stock, range)` pair a series was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub stock: StockCode,
    pub range: DateRange,
}

impl SeriesKey {
    pub fn new(stock: StockCode, range: DateRange) -> Self {
        Self { stock, range }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Candlestick, volume and label arrays, index-aligned, ascending by date.
///
/// Rebuilt on every refresh. A series belongs to exactly one [`SeriesKey`];
/// check [`ChartSeries::is_for`] before rendering it against the current focus.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    key: SeriesKey,
    bars: Vec<DailyBar>,
    trade_dates: Vec<NaiveDate>,
    dates: Vec<String>,
    candles: Vec<[f64; 4]>,
    volumes: Vec<f64>,
    closes: Vec<f64>,
    directions: Vec<Direction>,
}

impl ChartSeries {
    pub fn new(key: SeriesKey, bars: &[DailyBar]) -> Self {
        let mut bars = bars.to_vec();
        bars.sort_by_key(|b| b.trade_date);

        let trade_dates = bars.iter().map(|b| b.trade_date).collect();
        let dates = bars.iter().map(DailyBar::date_label).collect();
        // [open, close, low, high]
        let candles = bars.iter().map(|b| [b.open, b.close, b.low, b.high]).collect();
        let volumes = bars.iter().map(|b| b.volume).collect();
        let closes = bars.iter().map(|b| b.close).collect();
        let directions = bars
            .iter()
            .map(|b| if b.is_up() { Direction::Up } else { Direction::Down })
            .collect();

        Self {
            key,
            bars,
            trade_dates,
            dates,
            candles,
            volumes,
            closes,
            directions,
        }
    }

    pub fn key(&self) -> &SeriesKey {
        &self.key
    }

    pub fn is_for(&self, key: &SeriesKey) -> bool {
        &self.key == key
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn trade_dates(&self) -> &[NaiveDate] {
        &self.trade_dates
    }

    /// `YYYY-MM-DD` labels.
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn candles(&self) -> &[[f64; 4]] {
        &self.candles
    }

    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    pub fn last_bar(&self) -> Option<&DailyBar> {
        self.bars.last()
    }

    /// `MA(n)` over the closes.
    pub fn ma(&self, n: usize) -> Vec<Option<f64>> {
        moving_average(&self.closes, n)
    }

    /// Index of a date given in any accepted form (`YYYYMMDD`, ISO-8601, `YYYY-MM-DD`).
    pub fn index_of(&self, date: &str) -> Option<usize> {
        let wanted = normalize_date(date.trim());
        self.dates.iter().position(|d| *d == wanted)
    }

    /// Change and percent change of the bar at `index` against the previous
    /// close, from the server fields when present.
    pub fn change_at(&self, index: usize) -> Option<(f64, f64)> {
        let bar = self.bars.get(index)?;
        let prev_close = bar
            .pre_close
            .or_else(|| index.checked_sub(1).and_then(|i| self.bars.get(i)).map(|b| b.close));
        let change = bar
            .change
            .or_else(|| prev_close.map(|pc| bar.close - pc))?;
        let pct = bar.pct_chg.or_else(|| {
            prev_close
                .filter(|pc| *pc != 0.0)
                .map(|pc| change / pc * 100.0)
        })?;
        Some((change, pct))
    }

    /// Previous close for the bar at `index`: the server field, else the prior bar's close.
    pub fn previous_close(&self, index: usize) -> Option<f64> {
        let bar = self.bars.get(index)?;
        bar.pre_close
            .or_else(|| index.checked_sub(1).and_then(|i| self.bars.get(i)).map(|b| b.close))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn bar(date: &str, open: f64, close: f64) -> DailyBar {
        DailyBar {
            trade_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open,
            high: open.max(close) + 0.5,
            low: open.min(close) - 0.5,
            close,
            volume: 120_000.0,
            amount: None,
            pct_chg: None,
            pre_close: None,
            change: None,
        }
    }

    pub(crate) fn key() -> SeriesKey {
        SeriesKey::new(
            StockCode::parse("000001.SZ").unwrap(),
            DateRange::parse("20240101", "20240301").unwrap(),
        )
    }

    #[test]
    fn test_candle_tuple_order_and_direction() {
        let series = ChartSeries::new(
            key(),
            &[bar("2024-01-03", 10.0, 9.5), bar("2024-01-02", 10.0, 10.4)],
        );
        assert_eq!(series.dates(), &["2024-01-02", "2024-01-03"]);
        assert_eq!(series.candles()[0], [10.0, 10.4, 9.5, 10.9]);
        assert_eq!(series.candles()[1], [10.0, 9.5, 9.0, 10.5]);
        assert_eq!(series.directions(), &[Direction::Up, Direction::Down]);
    }

    #[test]
    fn test_flat_bar_counts_as_up() {
        let series = ChartSeries::new(key(), &[bar("2024-01-02", 10.0, 10.0)]);
        assert_eq!(series.directions(), &[Direction::Up]);
    }

    #[test]
    fn test_is_for_and_index_of() {
        let series = ChartSeries::new(key(), &[bar("2024-01-02", 10.0, 10.4)]);
        assert!(series.is_for(&key()));
        let other = SeriesKey::new(
            StockCode::parse("600519.SH").unwrap(),
            DateRange::parse("20240101", "20240301").unwrap(),
        );
        assert!(!series.is_for(&other));
        assert_eq!(series.index_of("20240102"), Some(0));
        assert_eq!(series.index_of("2024-01-02T00:00:00.000"), Some(0));
        assert_eq!(series.index_of("2024-01-05"), None);
    }

    #[test]
    fn test_change_derived_from_previous_close() {
        let series = ChartSeries::new(
            key(),
            &[bar("2024-01-02", 10.0, 10.0), bar("2024-01-03", 10.0, 11.0)],
        );
        let (change, pct) = series.change_at(1).unwrap();
        assert!((change - 1.0).abs() < 1e-9);
        assert!((pct - 10.0).abs() < 1e-9);
        assert_eq!(series.change_at(0), None);
        assert_eq!(series.previous_close(1), Some(10.0));
    }
}
