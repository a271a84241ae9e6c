//! Visible window of the date axis, in percent of the series.

use crate::chart::normalize::normalize_date;
use serde::{Deserialize, Serialize};

/// Bars shown around a navigated-to date.
pub const NAVIGATE_WINDOW: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomWindow {
    pub start: f64,
    pub end: f64,
}

impl Default for ZoomWindow {
    /// The latest 30% of the series.
    fn default() -> Self {
        Self {
            start: 70.0,
            end: 100.0,
        }
    }
}

impl ZoomWindow {
    pub fn full() -> Self {
        Self {
            start: 0.0,
            end: 100.0,
        }
    }

    /// Window of up to [`NAVIGATE_WINDOW`] bars centred on `date`, shifted
    /// inward at the series ends. The whole range when the series is no
    /// longer than the window; `None` when `date` isn't in `dates`.
    pub fn centered_on(dates: &[String], date: &str) -> Option<(Self, usize)> {
        let wanted = normalize_date(date.trim());
        let index = dates.iter().position(|d| *d == wanted)?;
        let total = dates.len();
        let window = NAVIGATE_WINDOW.min(total);
        if total <= window {
            return Some((Self::full(), index));
        }

        let half = window / 2;
        let center = index.clamp(half, total - half);
        let total_f = total as f64;
        let zoom = Self {
            start: ((center - half) as f64 * 100.0 / total_f).max(0.0),
            end: ((center + half) as f64 * 100.0 / total_f).min(100.0),
        };
        Some((zoom, index))
    }
}
