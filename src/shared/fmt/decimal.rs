//! Decimal formatting utilities for financial statement amounts.
//!
//! Fundamentals arrive in yuan as `rust_decimal::Decimal`. Large amounts are
//! abbreviated the way statement tables show them: 亿元 above one billion,
//! 万元 above ten thousand.

use rust_decimal::prelude::*;

const WAN: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);
const YI: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);
const BILLION: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Half-up rounding, matching how the web clients print amounts.
fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a `Decimal` with two decimals and thousands separators.
pub fn display(value: &Decimal) -> String {
    let rounded = round_half_up(*value, 2);
    super::num::display_formatted_string(format!("{:.2}", rounded))
}

/// Statement amount in yuan: `亿元` from 1e9, `万元` from 1e4, else `元`.
pub fn display_yuan(value: &Decimal) -> String {
    let abs = value.abs();
    if abs >= BILLION {
        format!("{:.2}亿元", round_half_up(*value / YI, 2))
    } else if abs >= WAN {
        format!("{:.0}万元", round_half_up(*value / WAN, 0))
    } else {
        format!("{:.0}元", round_half_up(*value, 0))
    }
}

/// Optional amount; `--` when absent.
pub fn display_yuan_opt(value: Option<&Decimal>) -> String {
    value.map(display_yuan).unwrap_or_else(|| "--".to_string())
}

/// Ratio already expressed in percent (`12.345` → `"12.35%"`); `--` when absent.
pub fn display_percent_opt(value: Option<&Decimal>) -> String {
    match value {
        Some(v) => format!("{:.2}%", round_half_up(*v, 2)),
        None => "--".to_string(),
    }
}
