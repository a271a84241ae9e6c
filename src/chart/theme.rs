//! Chart colors.
//!
//! A-share convention: rising is red, falling is green.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub up: &'static str,
    pub down: &'static str,
    pub text: &'static str,
    pub muted_text: &'static str,
    pub axis_line: &'static str,
    pub split_line: &'static str,
    pub background: &'static str,
    /// Cycled through by MA windows in the order they're configured.
    pub ma_colors: &'static [&'static str],
    /// Cycled through by indicator lines within one indicator.
    pub line_colors: &'static [&'static str],
}

pub const LIGHT: Theme = Theme {
    up: "#ef4444",
    down: "#10b981",
    text: "#333333",
    muted_text: "#666666",
    axis_line: "#dddddd",
    split_line: "#eeeeee",
    background: "#ffffff",
    ma_colors: &["#2563eb", "#f59e0b", "#8b5cf6", "#ec4899", "#14b8a6", "#64748b"],
    line_colors: &["#2563eb", "#f59e0b", "#8b5cf6"],
};

pub const DARK: Theme = Theme {
    up: "#ef5350",
    down: "#26a69a",
    text: "#e5e7eb",
    muted_text: "#9ca3af",
    axis_line: "#4b5563",
    split_line: "#374151",
    background: "#111827",
    ma_colors: &["#FF6B6B", "#4ECDC4", "#95E1D3", "#F3A683", "#778BEB", "#CF6A87"],
    line_colors: &["#4ECDC4", "#FFD166", "#EF476F"],
};

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Theme {
        match mode {
            ThemeMode::Light => LIGHT,
            ThemeMode::Dark => DARK,
        }
    }

    pub fn ma_color(&self, index: usize) -> &'static str {
        self.ma_colors[index % self.ma_colors.len()]
    }

    pub fn line_color(&self, index: usize) -> &'static str {
        self.line_colors[index % self.line_colors.len()]
    }

    /// Up color when `up`, else down.
    pub fn direction_color(&self, up: bool) -> &'static str {
        if up {
            self.up
        } else {
            self.down
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        LIGHT
    }
}
