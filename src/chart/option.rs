//! Declarative chart option builder.
//!
//! Produces an ECharts-compatible option object: candlesticks and MA lines on
//! the price grid, per-bar colored volume below it, and one extra grid per
//! active oscillator (MACD, RSI, KDJ). BOLL shares the price grid.
//!
//! Undefined values are emitted as `"-"`, which the renderer draws as a gap.

use crate::chart::ma::latest_value;
use crate::chart::normalize::plottable;
use crate::chart::series::{ChartSeries, Direction};
use crate::chart::theme::{Theme, ThemeMode};
use crate::chart::tooltip::{OverlayLine, TooltipModel};
use crate::chart::zoom::ZoomWindow;
use crate::domain::indicator::{IndicatorKind, IndicatorSet};
use crate::shared::fmt::num::{format_percent, format_price, format_signed};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::HashMap;

/// MA windows drawn when nothing else is configured.
pub const DEFAULT_MA_WINDOWS: [usize; 3] = [5, 10, 20];

const CANDLE_SERIES: &str = "K线";
const VOLUME_SERIES: &str = "成交量";

// Vertical layout, in percent of the chart height.
const TOP: f64 = 15.0;
const BOTTOM: f64 = 93.0;
const GAP: f64 = 3.0;
const PRICE_HEIGHT: f64 = 60.0;
const MIN_PRICE_HEIGHT: f64 = 36.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub ma_windows: Vec<usize>,
    pub indicators: Vec<IndicatorKind>,
    pub theme: ThemeMode,
    pub show_volume: bool,
    /// Display name for the title; the code alone is used when absent.
    pub stock_name: Option<String>,
    pub zoom: ZoomWindow,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            ma_windows: DEFAULT_MA_WINDOWS.to_vec(),
            indicators: Vec::new(),
            theme: ThemeMode::default(),
            show_volume: true,
            stock_name: None,
            zoom: ZoomWindow::default(),
        }
    }
}

/// The built option plus what renderers need alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOption {
    pub option: Value,
    pub tooltip: TooltipModel,
    /// `MA5: ¥12.34` style labels for windows with a defined latest value.
    pub legend_labels: Vec<String>,
}

/// Unit the volume axis is expressed in, picked from the largest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeUnit {
    One,
    Wan,
    Yi,
}

impl VolumeUnit {
    pub fn for_max(max: f64) -> Self {
        if max >= 1e8 {
            VolumeUnit::Yi
        } else if max >= 1e4 {
            VolumeUnit::Wan
        } else {
            VolumeUnit::One
        }
    }

    pub fn divisor(&self) -> f64 {
        match self {
            VolumeUnit::One => 1.0,
            VolumeUnit::Wan => 1e4,
            VolumeUnit::Yi => 1e8,
        }
    }

    pub fn axis_formatter(&self) -> &'static str {
        match self {
            VolumeUnit::One => "{value}",
            VolumeUnit::Wan => "{value}万",
            VolumeUnit::Yi => "{value}亿",
        }
    }
}

/// One oscillator panel below the volume grid.
struct SubPanel {
    kind: IndicatorKind,
    lines: Vec<OverlayLine>,
}

pub struct ChartOptionBuilder<'a> {
    series: &'a ChartSeries,
    indicators: &'a [IndicatorSet],
    config: &'a ChartConfig,
}

impl<'a> ChartOptionBuilder<'a> {
    pub fn new(series: &'a ChartSeries, config: &'a ChartConfig) -> Self {
        Self {
            series,
            indicators: &[],
            config,
        }
    }

    /// Indicator sets are matched to bars by trade date; unmatched bars get gaps.
    pub fn with_indicators(mut self, indicators: &'a [IndicatorSet]) -> Self {
        self.indicators = indicators;
        self
    }

    pub fn build(&self) -> ChartOption {
        let theme = Theme::for_mode(self.config.theme);
        let aligned = self.aligned_indicators();

        let ma_lines: Vec<OverlayLine> = self
            .config
            .ma_windows
            .iter()
            .map(|n| OverlayLine {
                name: format!("MA{}", n),
                values: self.series.ma(*n),
                is_price: true,
            })
            .collect();

        let mut price_overlays = Vec::new();
        let mut panels = Vec::new();
        let mut seen = Vec::new();
        for kind in &self.config.indicators {
            if seen.contains(kind) {
                continue;
            }
            seen.push(*kind);
            let lines = indicator_lines(*kind, &aligned);
            if lines.is_empty() {
                continue;
            }
            if kind.overlays_price() {
                price_overlays.extend(lines);
            } else {
                panels.push(SubPanel { kind: *kind, lines });
            }
        }

        let sub_count = panels.len() + usize::from(self.config.show_volume);
        let grids = grid_layout(sub_count);
        let grid_indices: Vec<usize> = (0..grids.len()).collect();

        let mut series = vec![self.candle_series(&theme)];
        for (i, line) in ma_lines.iter().enumerate() {
            series.push(line_series(line, 0, theme.ma_color(i), false));
        }
        for (i, line) in price_overlays.iter().enumerate() {
            series.push(line_series(line, 0, theme.line_color(i), true));
        }

        let mut y_axes = vec![json!({
            "scale": true,
            "gridIndex": 0,
            "splitArea": { "show": true },
            "axisLabel": { "formatter": "¥{value}", "color": theme.muted_text },
            "boundaryGap": ["10%", "10%"]
        })];

        let mut next_grid = 1;
        if self.config.show_volume {
            let unit = VolumeUnit::for_max(self.series.volumes().iter().cloned().fold(0.0, f64::max));
            series.push(self.volume_series(&theme, unit, next_grid));
            y_axes.push(json!({
                "scale": true,
                "gridIndex": next_grid,
                "splitNumber": 4,
                "axisLabel": { "show": true, "formatter": unit.axis_formatter(), "fontSize": 10, "color": theme.muted_text },
                "axisLine": { "show": true, "lineStyle": { "color": theme.axis_line } },
                "splitLine": { "show": true, "lineStyle": { "color": theme.split_line } }
            }));
            next_grid += 1;
        }

        for panel in &panels {
            for (i, line) in panel.lines.iter().enumerate() {
                if panel.kind == IndicatorKind::Macd && line.name == "MACD" {
                    series.push(histogram_series(line, next_grid, &theme));
                } else {
                    series.push(line_series(line, next_grid, theme.line_color(i), false));
                }
            }
            let mut axis = json!({
                "scale": true,
                "gridIndex": next_grid,
                "splitNumber": 3,
                "name": panel.kind.as_str(),
                "axisLabel": { "fontSize": 10, "color": theme.muted_text },
                "splitLine": { "show": true, "lineStyle": { "color": theme.split_line } }
            });
            if matches!(panel.kind, IndicatorKind::Rsi | IndicatorKind::Kdj) {
                axis["min"] = json!(0);
                axis["max"] = json!(100);
            }
            y_axes.push(axis);
            next_grid += 1;
        }

        let x_axes: Vec<Value> = grid_indices
            .iter()
            .map(|i| {
                let mut axis = json!({
                    "type": "category",
                    "gridIndex": i,
                    "data": self.series.dates(),
                    "scale": true,
                    "boundaryGap": false,
                    "axisLine": { "onZero": false, "lineStyle": { "color": theme.axis_line } },
                    "splitLine": { "show": false },
                    "min": "dataMin",
                    "max": "dataMax"
                });
                if *i > 0 {
                    axis["axisTick"] = json!({ "show": false });
                    axis["axisLabel"] = json!({ "show": false });
                }
                axis
            })
            .collect();

        let legend_labels = legend_labels(&ma_lines);
        let mut legend_data = vec![CANDLE_SERIES.to_string()];
        legend_data.extend(ma_lines.iter().map(|l| l.name.clone()));
        legend_data.extend(price_overlays.iter().map(|l| l.name.clone()));
        if self.config.show_volume {
            legend_data.push(VOLUME_SERIES.to_string());
        }

        let zoom = self.config.zoom;
        let mut option = json!({
            "animation": false,
            "backgroundColor": theme.background,
            "tooltip": { "trigger": "axis", "axisPointer": { "type": "cross" } },
            "axisPointer": { "link": [{ "xAxisIndex": "all" }] },
            "legend": { "data": legend_data, "top": 30, "textStyle": { "color": theme.text } },
            "grid": grids.iter().map(|(top, height)| json!({
                "left": "5%",
                "right": "5%",
                "top": percent(*top),
                "height": percent(*height)
            })).collect::<Vec<_>>(),
            "xAxis": x_axes,
            "yAxis": y_axes,
            "dataZoom": [
                { "type": "inside", "xAxisIndex": grid_indices, "start": zoom.start, "end": zoom.end },
                { "type": "slider", "show": true, "xAxisIndex": grid_indices, "top": "95%", "start": zoom.start, "end": zoom.end }
            ],
            "series": series
        });

        if let Some((text, up)) = self.title() {
            option["title"] = json!({
                "text": text,
                "subtext": legend_labels.join("  "),
                "left": "center",
                "textStyle": { "fontSize": 16, "fontWeight": "bold", "color": theme.direction_color(up) }
            });
        }

        let mut tooltip_lines = ma_lines;
        tooltip_lines.extend(price_overlays);
        tooltip_lines.extend(panels.into_iter().flat_map(|p| p.lines));

        ChartOption {
            option,
            tooltip: TooltipModel::build(self.series, &tooltip_lines),
            legend_labels,
        }
    }

    /// `name(code) K线图 - ¥close +chg (+pct%)`, and whether the last bar rose.
    pub fn title(&self) -> Option<(String, bool)> {
        let last_index = self.series.len().checked_sub(1)?;
        let last = self.series.last_bar()?;
        let code = &self.series.key().stock;
        let mut text = match &self.config.stock_name {
            Some(name) => format!("{}({}) K线图", name, code),
            None => format!("{} K线图", code),
        };
        text.push_str(&format!(" - {}", format_price(last.close)));
        let up = match self.series.change_at(last_index) {
            Some((change, pct)) => {
                text.push_str(&format!(" {} ({})", format_signed(change), format_percent(pct)));
                change >= 0.0
            }
            None => last.is_up(),
        };
        Some((text, up))
    }

    fn aligned_indicators(&self) -> Vec<Option<&'a IndicatorSet>> {
        let by_date: HashMap<NaiveDate, &IndicatorSet> = self
            .indicators
            .iter()
            .filter_map(|s| s.trade_date.map(|d| (d, s)))
            .collect();
        self.series
            .trade_dates()
            .iter()
            .map(|d| by_date.get(d).copied())
            .collect()
    }

    fn candle_series(&self, theme: &Theme) -> Value {
        json!({
            "name": CANDLE_SERIES,
            "type": "candlestick",
            "xAxisIndex": 0,
            "yAxisIndex": 0,
            "data": self.series.candles(),
            "itemStyle": {
                "color": theme.up,
                "color0": theme.down,
                "borderColor": theme.up,
                "borderColor0": theme.down
            }
        })
    }

    fn volume_series(&self, theme: &Theme, unit: VolumeUnit, grid: usize) -> Value {
        let data: Vec<Value> = self
            .series
            .volumes()
            .iter()
            .zip(self.series.directions())
            .map(|(vol, dir)| {
                json!({
                    "value": vol / unit.divisor(),
                    "itemStyle": {
                        "color": theme.direction_color(*dir == Direction::Up),
                        "opacity": 0.6
                    }
                })
            })
            .collect();
        json!({
            "name": VOLUME_SERIES,
            "type": "bar",
            "xAxisIndex": grid,
            "yAxisIndex": grid,
            "data": data
        })
    }
}

fn indicator_lines(kind: IndicatorKind, aligned: &[Option<&IndicatorSet>]) -> Vec<OverlayLine> {
    kind.lines()
        .iter()
        .filter_map(|line| {
            let values: Vec<Option<f64>> = aligned
                .iter()
                .map(|set| set.and_then(|s| plottable(line.value(s))))
                .collect();
            if values.iter().all(Option::is_none) {
                return None;
            }
            Some(OverlayLine {
                name: line.label().to_string(),
                values,
                is_price: kind.overlays_price(),
            })
        })
        .collect()
}

fn line_series(line: &OverlayLine, grid: usize, color: &str, dashed: bool) -> Value {
    json!({
        "name": line.name,
        "type": "line",
        "xAxisIndex": grid,
        "yAxisIndex": grid,
        "data": gapped(&line.values),
        "smooth": true,
        "showSymbol": false,
        "connectNulls": false,
        "lineStyle": {
            "width": 1,
            "opacity": 0.8,
            "color": color,
            "type": if dashed { "dashed" } else { "solid" }
        }
    })
}

fn histogram_series(line: &OverlayLine, grid: usize, theme: &Theme) -> Value {
    let data: Vec<Value> = line
        .values
        .iter()
        .map(|v| match v {
            Some(v) => json!({
                "value": v,
                "itemStyle": { "color": theme.direction_color(*v >= 0.0) }
            }),
            None => json!("-"),
        })
        .collect();
    json!({
        "name": line.name,
        "type": "bar",
        "xAxisIndex": grid,
        "yAxisIndex": grid,
        "data": data
    })
}

fn gapped(values: &[Option<f64>]) -> Vec<Value> {
    values
        .iter()
        .map(|v| v.map(Value::from).unwrap_or_else(|| json!("-")))
        .collect()
}

fn legend_labels(ma_lines: &[OverlayLine]) -> Vec<String> {
    ma_lines
        .iter()
        .filter_map(|l| latest_value(&l.values).map(|v| format!("{}: {}", l.name, format_price(v))))
        .collect()
}

/// `(top, height)` per grid: the price grid first, then `sub_count` equal panels.
fn grid_layout(sub_count: usize) -> Vec<(f64, f64)> {
    if sub_count == 0 {
        return vec![(TOP, BOTTOM - TOP)];
    }
    let price_height =
        (PRICE_HEIGHT - 10.0 * (sub_count as f64 - 1.0)).max(MIN_PRICE_HEIGHT);
    let remaining = BOTTOM - TOP - price_height - GAP * sub_count as f64;
    let panel_height = remaining / sub_count as f64;

    let mut grids = vec![(TOP, price_height)];
    let mut top = TOP + price_height;
    for _ in 0..sub_count {
        top += GAP;
        grids.push((top, panel_height));
        top += panel_height;
    }
    grids
}

fn percent(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    format!("{}%", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::series::tests::{bar, key};
    use crate::chart::theme::{DARK, LIGHT};

    fn rising_series(n: usize) -> ChartSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars: Vec<_> = (0..n)
            .map(|i| {
                let date = (start + chrono::Duration::days(i as i64))
                    .format("%Y-%m-%d")
                    .to_string();
                let open = 10.0 + i as f64;
                // every third bar falls
                let close = if i % 3 == 2 { open - 0.5 } else { open + 0.5 };
                bar(&date, open, close)
            })
            .collect();
        ChartSeries::new(key(), &bars)
    }

    fn series_named<'v>(option: &'v Value, name: &str) -> Option<&'v Value> {
        option["series"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["name"] == name)
    }

    #[test]
    fn test_candles_and_volume_colors() {
        let series = rising_series(6);
        let config = ChartConfig::default();
        let built = ChartOptionBuilder::new(&series, &config).build();

        let candles = series_named(&built.option, "K线").unwrap();
        assert_eq!(candles["data"][0], json!([10.0, 10.5, 9.5, 11.0]));
        assert_eq!(candles["itemStyle"]["color"], LIGHT.up);
        assert_eq!(candles["itemStyle"]["color0"], LIGHT.down);

        let volume = series_named(&built.option, "成交量").unwrap();
        for (i, dir) in series.directions().iter().enumerate() {
            let expected = if *dir == Direction::Up { "#ef4444" } else { "#10b981" };
            assert_eq!(volume["data"][i]["itemStyle"]["color"], expected);
        }
        assert_eq!(volume["data"][0]["value"], json!(12.0));
        assert_eq!(built.option["yAxis"][1]["axisLabel"]["formatter"], "{value}万");
    }

    #[test]
    fn test_ma_gaps_and_legend() {
        let series = rising_series(6);
        let config = ChartConfig::default();
        let built = ChartOptionBuilder::new(&series, &config).build();

        let ma5 = series_named(&built.option, "MA5").unwrap();
        for i in 0..4 {
            assert_eq!(ma5["data"][i], "-");
        }
        let expected: f64 = series.closes()[..5].iter().sum::<f64>() / 5.0;
        assert_eq!(ma5["data"][4], json!(expected));

        let ma10 = series_named(&built.option, "MA10").unwrap();
        assert!(ma10["data"].as_array().unwrap().iter().all(|v| v == "-"));
        assert_eq!(built.legend_labels.len(), 1);
        assert!(built.legend_labels[0].starts_with("MA5: ¥"));
    }

    #[test]
    fn test_default_layout_and_zoom() {
        let series = rising_series(3);
        let config = ChartConfig::default();
        let option = ChartOptionBuilder::new(&series, &config).build().option;

        let grids = option["grid"].as_array().unwrap();
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0]["top"], "15%");
        assert_eq!(grids[0]["height"], "60%");
        assert_eq!(grids[1]["top"], "78%");
        assert_eq!(grids[1]["height"], "15%");

        assert_eq!(option["dataZoom"][0]["start"], json!(70.0));
        assert_eq!(option["dataZoom"][0]["end"], json!(100.0));
        assert_eq!(option["dataZoom"][1]["xAxisIndex"], json!([0, 1]));
        assert_eq!(option["xAxis"][1]["axisLabel"]["show"], json!(false));
    }

    #[test]
    fn test_without_volume_single_grid() {
        let series = rising_series(3);
        let config = ChartConfig {
            show_volume: false,
            theme: ThemeMode::Dark,
            ..Default::default()
        };
        let option = ChartOptionBuilder::new(&series, &config).build().option;
        assert_eq!(option["grid"].as_array().unwrap().len(), 1);
        assert!(series_named(&option, "成交量").is_none());
        assert_eq!(option["backgroundColor"], DARK.background);
    }

    #[test]
    fn test_indicator_overlays_and_panels() {
        let series = rising_series(4);
        let dates = series.trade_dates().to_vec();
        let sets: Vec<IndicatorSet> = dates
            .iter()
            .enumerate()
            .map(|(i, d)| IndicatorSet {
                trade_date: Some(*d),
                boll_upper: if i == 0 { Some(0.0) } else { Some(12.0 + i as f64) },
                boll_mid: Some(11.0),
                rsi6: if i < 2 { None } else { Some(60.0) },
                ..Default::default()
            })
            .collect();
        let config = ChartConfig {
            indicators: vec![IndicatorKind::Boll, IndicatorKind::Rsi, IndicatorKind::Kdj, IndicatorKind::Rsi],
            ..Default::default()
        };
        let built = ChartOptionBuilder::new(&series, &config)
            .with_indicators(&sets)
            .build();
        let option = &built.option;

        let upper = series_named(option, "BOLL上轨").unwrap();
        assert_eq!(upper["xAxisIndex"], json!(0));
        assert_eq!(upper["data"][0], "-");
        assert_eq!(upper["data"][1], json!(13.0));
        assert!(series_named(option, "BOLL下轨").is_none());

        let rsi = series_named(option, "RSI6").unwrap();
        assert_eq!(rsi["xAxisIndex"], json!(2));
        assert_eq!(rsi["data"][1], "-");
        assert_eq!(rsi["data"][2], json!(60.0));

        // KDJ had nothing plottable, so no grid for it
        assert_eq!(option["grid"].as_array().unwrap().len(), 3);
        assert!(series_named(option, "K").is_none());

        let tip = built.tooltip.at(2).unwrap();
        assert_eq!(tip.value("RSI6"), Some("60.00"));
        assert_eq!(built.tooltip.at(0).unwrap().value("BOLL上轨"), None);
    }

    #[test]
    fn test_title_text() {
        let series = ChartSeries::new(
            key(),
            &[bar("2024-01-02", 10.0, 10.0), bar("2024-01-03", 10.0, 11.0)],
        );
        let config = ChartConfig {
            stock_name: Some("平安银行".into()),
            ..Default::default()
        };
        let option = ChartOptionBuilder::new(&series, &config).build().option;
        assert_eq!(
            option["title"]["text"],
            "平安银行(000001.SZ) K线图 - ¥11.00 +1.00 (+10.00%)"
        );
        assert_eq!(option["title"]["textStyle"]["color"], LIGHT.up);
    }

    #[test]
    fn test_grid_layout_fills_to_bottom() {
        for subs in 0..4 {
            let grids = grid_layout(subs);
            let (top, height) = grids.last().copied().unwrap();
            assert!((top + height - BOTTOM).abs() < 1e-9, "subs={subs}");
        }
    }
}
