//! Value formatters for axis labels and tooltip rows.
//!
//! Prices are rounded through [`Decimal`] so that binary float artefacts (`0.1 + 0.2`) never
//! reach the screen.

use chrono::DateTime;
use rust_decimal::{prelude::FromPrimitive, Decimal, RoundingStrategy};

/// Shown in place of values that cannot be formatted.
pub const MISSING: &str = "---";

/// Values below this magnitude are shown with significant digits rather than fixed decimals.
const MICRO_VALUE: f64 = 0.001;
const MICRO_SIGNIFICANT_DIGITS: i32 = 3;

/// Insert `,` thousands separators into the integer part of an unsigned decimal string.
fn group_thousands(digits: &str) -> String {
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(digits.len() + integer.len() / 3);
    for (index, ch) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Round `value` to at most `max_digits` decimals, keeping at least `min_digits`.
fn fixed_decimals(value: f64, min_digits: u32, max_digits: u32) -> String {
    let max_digits = max_digits.max(min_digits);
    match Decimal::from_f64(value) {
        Some(decimal) => {
            let rounded = decimal
                .round_dp_with_strategy(max_digits, RoundingStrategy::MidpointAwayFromZero)
                .normalize();
            let text = rounded.abs().to_string();
            let decimals = text.split_once('.').map_or(0, |(_, fraction)| fraction.len());
            if decimals >= min_digits as usize {
                text
            } else if decimals == 0 {
                format!("{text}.{}", "0".repeat(min_digits as usize))
            } else {
                format!("{text}{}", "0".repeat(min_digits as usize - decimals))
            }
        }
        // Out of Decimal range, fall back to float formatting
        None => format!("{:.*}", min_digits as usize, value.abs()),
    }
}

/// Currency formatter: `-$1,234.50`, `$0.0000363`, `---` for non-finite values.
///
/// `min_digits` and `max_digits` bound the fraction digits. Micro prices below 0.001 widen
/// `max_digits` until three significant digits are visible.
pub fn format_dollar(value: f64, min_digits: u32, max_digits: u32) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }

    let magnitude = value.abs();
    let (min_digits, max_digits) = if magnitude > 0.0 && magnitude < MICRO_VALUE {
        let leading = -magnitude.log10().floor() as i32;
        let digits = (leading + MICRO_SIGNIFICANT_DIGITS - 1).max(0) as u32;
        (min_digits, max_digits.max(digits))
    } else {
        (min_digits, max_digits)
    };

    let body = group_thousands(&fixed_decimals(value, min_digits, max_digits));
    let negative = value < 0.0 && body.chars().any(|ch| ch.is_ascii_digit() && ch != '0');
    if negative {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// Default price formatting: two fraction digits.
pub fn format_price(value: f64) -> String {
    format_dollar(value, 2, 2)
}

/// Volume axis labels on large layouts: two to four fraction digits.
pub fn format_volume_axis(value: f64) -> String {
    format_dollar(value, 2, 4)
}

/// Compact price axis labels: `$1,234` with a fixed number of decimals.
pub fn fmt_usd(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let text = format!("{:.*}", decimals, value.abs());
    let sign = if value < 0.0 && text.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        "-"
    } else {
        ""
    };
    format!("${sign}{}", group_thousands(&text))
}

/// Whole-dollar compact axis labels.
pub fn fmt_usd_whole(value: f64) -> String {
    fmt_usd(value, 0)
}

/// Plain numeric label with up to two decimals and no currency sign.
pub fn format_plain(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let text = fixed_decimals(value, 0, 2);
    let text = group_thousands(&text);
    if value < 0.0 && text != "0" {
        format!("-{text}")
    } else {
        text
    }
}

/// `YYYY-MM-DD HH:MM` in UTC.
pub fn format_unix_timestamp(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// `YYYY-MM-DD` in UTC.
pub fn format_date(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Formatting collaborators used by the tooltip.
#[derive(Debug, Copy, Clone)]
pub struct Formatters {
    pub timestamp: fn(i64) -> String,
    /// Open and volume rows
    pub value: fn(f64) -> String,
    /// High, low and close rows
    pub price: fn(f64) -> String,
}

impl Default for Formatters {
    fn default() -> Self {
        Self {
            timestamp: format_unix_timestamp,
            value: format_price,
            price: format_price,
        }
    }
}
