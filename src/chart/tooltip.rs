//! Per-date tooltip rows, precomputed so renderers only look them up.

use crate::chart::series::{ChartSeries, Direction};
use crate::shared::fmt::num::{
    format_amount_thousands, format_percent, format_price, format_signed, format_volume,
};
use serde::Serialize;

/// A named line aligned with the series dates (MA or indicator).
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub name: String,
    pub values: Vec<Option<f64>>,
    /// Shown with a yuan sign when the line lives on the price axis.
    pub is_price: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipEntry {
    pub date: String,
    #[serde(skip)]
    pub direction: Direction,
    pub rows: Vec<TooltipRow>,
}

impl TooltipEntry {
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }

    /// `date<br/>label: value<br/>…`, the format the chart tooltip expects.
    pub fn to_html(&self) -> String {
        let mut out = format!("{}<br/>", self.date);
        for row in &self.rows {
            out.push_str(&format!("{}: {}<br/>", row.label, row.value));
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TooltipModel {
    entries: Vec<TooltipEntry>,
}

impl TooltipModel {
    pub fn build(series: &ChartSeries, overlays: &[OverlayLine]) -> Self {
        let entries = series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let mut rows = Vec::new();
                let mut push = |label: &str, value: String| {
                    rows.push(TooltipRow {
                        label: label.to_string(),
                        value,
                    })
                };

                push("开盘价", format_price(bar.open));
                push("收盘价", format_price(bar.close));
                push("最低价", format_price(bar.low));
                push("最高价", format_price(bar.high));
                if let Some(prev) = series.previous_close(i) {
                    push("昨收价", format_price(prev));
                    if prev != 0.0 {
                        let amplitude = (bar.high - bar.low) / prev * 100.0;
                        push("振幅", format!("{:.2}%", amplitude));
                    }
                }
                if let Some((change, pct)) = series.change_at(i) {
                    push("涨跌额", format_signed(change));
                    push("涨跌幅", format_percent(pct));
                }
                push("成交量", format_volume(bar.volume));
                if let Some(amount) = bar.amount {
                    push("成交额", format_amount_thousands(amount));
                }

                for line in overlays {
                    if let Some(Some(v)) = line.values.get(i) {
                        let text = if line.is_price {
                            format_price(*v)
                        } else {
                            format!("{:.2}", v)
                        };
                        push(&line.name, text);
                    }
                }

                TooltipEntry {
                    date: series.dates()[i].clone(),
                    direction: series.directions()[i],
                    rows,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<&TooltipEntry> {
        self.entries.get(index)
    }

    pub fn for_date(&self, date: &str) -> Option<&TooltipEntry> {
        let wanted = crate::chart::normalize::normalize_date(date.trim());
        self.entries.iter().find(|e| e.date == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::series::tests::{bar, key};

    #[test]
    fn test_rows_omit_undefined_overlays() {
        let series = ChartSeries::new(
            key(),
            &[bar("2024-01-02", 10.0, 10.0), bar("2024-01-03", 10.0, 11.0)],
        );
        let ma = OverlayLine {
            name: "MA2".into(),
            values: series.ma(2),
            is_price: true,
        };
        let rsi = OverlayLine {
            name: "RSI6".into(),
            values: vec![Some(55.123), None],
            is_price: false,
        };
        let model = TooltipModel::build(&series, &[ma, rsi]);
        assert_eq!(model.len(), 2);

        let first = model.at(0).unwrap();
        assert_eq!(first.value("开盘价"), Some("¥10.00"));
        assert_eq!(first.value("MA2"), None);
        assert_eq!(first.value("RSI6"), Some("55.12"));
        assert_eq!(first.value("昨收价"), None);

        let second = model.for_date("20240103").unwrap();
        assert_eq!(second.value("MA2"), Some("¥10.50"));
        assert_eq!(second.value("RSI6"), None);
        assert_eq!(second.value("涨跌幅"), Some("+10.00%"));
        assert_eq!(second.value("成交量"), Some("12.00万"));
        assert!(second.to_html().starts_with("2024-01-03<br/>开盘价: ¥10.00<br/>"));
    }
}
