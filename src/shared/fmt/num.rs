//! Number formatting utilities for human-readable display.
//!
//! Handles f64 values: thousands separators, Chinese unit abbreviations
//! (万 = 1e4, 亿 = 1e8) for volumes and traded amounts, and the signed
//! change/percent strings shown in chart titles. For `Decimal` amounts, use
//! the `decimal` sibling module.

const WAN: f64 = 10_000.0;
const YI: f64 = 100_000_000.0;

/// Trims trailing zeros, adds thousands separators.
pub fn display_formatted_string(formatted: String) -> String {
    let trimmed = if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    };

    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Trading volume with 万/亿 abbreviations, two decimals when abbreviated.
///
/// `123_456_789.0` → `"1.23亿"`, `56_789.0` → `"5.68万"`, `999.0` → `"999"`.
pub fn format_volume(volume: f64) -> String {
    let abs = volume.abs();
    if abs >= YI {
        format!("{:.2}亿", volume / YI)
    } else if abs >= WAN {
        format!("{:.2}万", volume / WAN)
    } else {
        format!("{}", volume.round())
    }
}

/// Traded amount as reported by the daily endpoint (unit: 千元).
pub fn format_amount_thousands(amount: f64) -> String {
    let yuan = amount * 1000.0;
    let abs = yuan.abs();
    if abs >= YI {
        format!("{:.2}亿元", yuan / YI)
    } else if abs >= WAN {
        format!("{:.2}万元", yuan / WAN)
    } else {
        format!("{:.0}元", yuan)
    }
}

/// Price with the yuan sign and two decimals.
pub fn format_price(price: f64) -> String {
    format!("¥{:.2}", price)
}

/// Signed value with two decimals; non-negative values get a leading `+`.
pub fn format_signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Signed percentage from a value already expressed in percent (`1.5` → `"+1.50%"`).
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_signed(value))
}

/// Unsigned ratio as percent (`0.856` → `"85.6%"`).
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formatted_string_thousands_separator() {
        assert_eq!(display_formatted_string("0".to_string()), "0");
        assert_eq!(display_formatted_string("123".to_string()), "123");
        assert_eq!(display_formatted_string("1000".to_string()), "1,000");
        assert_eq!(display_formatted_string("1234567".to_string()), "1,234,567");
        assert_eq!(display_formatted_string("-1234.50".to_string()), "-1,234.5");
        assert_eq!(display_formatted_string("100.00".to_string()), "100");
    }

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(123_456_789.0), "1.23亿");
        assert_eq!(format_volume(56_789.0), "5.68万");
        assert_eq!(format_volume(10_000.0), "1.00万");
        assert_eq!(format_volume(999.0), "999");
        assert_eq!(format_volume(0.0), "0");
    }

    #[test]
    fn test_format_amount_thousands() {
        assert_eq!(format_amount_thousands(250_000.0), "2.50亿元");
        assert_eq!(format_amount_thousands(12.5), "1.25万元");
        assert_eq!(format_amount_thousands(0.5), "500元");
    }

    #[test]
    fn test_signed_formats() {
        assert_eq!(format_price(1688.0), "¥1688.00");
        assert_eq!(format_signed(0.0), "+0.00");
        assert_eq!(format_signed(-1.234), "-1.23");
        assert_eq!(format_percent(2.5), "+2.50%");
        assert_eq!(format_percent(-0.756), "-0.76%");
        assert_eq!(format_ratio(0.856), "85.6%");
    }
}
