//! FILENAME: core/engine/src/number_format.rs
//! PURPOSE: Number formatting utilities for displaying cell values.
//! CONTEXT: This module handles the conversion of raw values to formatted
//! display strings based on a column's configured NumberFormat.

use serde::{Deserialize, Serialize};

use crate::value::{format_plain_number, Value};

/// Display format of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberFormat {
    /// Thousands separators from 1000 upward, plain digits below.
    #[default]
    Default,
    /// Fraction rendered as a percentage with 2 decimals.
    Percent,
    /// US dollars with thousands separators and 2 decimals.
    Currency,
}

/// Format a number according to the specified format.
pub fn format_number(value: f64, format: NumberFormat) -> String {
    match format {
        NumberFormat::Default => format_default(value),
        NumberFormat::Percent => format_percentage(value, 2),
        NumberFormat::Currency => format_currency(value, 2, "$"),
    }
}

/// Format any cell value. Values that are not numeric fall back to their
/// string form; missing values render as an empty string.
pub fn format_value(value: &Value, format: NumberFormat) -> String {
    match value.as_number() {
        Some(n) if !matches!(value, Value::Bool(_)) => format_number(n, format),
        _ => value.to_display_string(),
    }
}

/// Default format: separators only when the magnitude reaches 1000.
fn format_default(value: f64) -> String {
    if value.abs() < 1000.0 {
        return format_plain_number(value);
    }
    let rounded = format!("{:.3}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    add_thousands_separator(trimmed)
}

/// Add thousands separators to a numeric string.
fn add_thousands_separator(s: &str) -> String {
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (s, None),
    };

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    if negative {
        result.push('-');
    }

    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}

/// Format a number as currency. The sign goes before the symbol.
fn format_currency(value: f64, decimal_places: usize, symbol: &str) -> String {
    let formatted = add_thousands_separator(&format!("{:.prec$}", value.abs(), prec = decimal_places));
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}{}", symbol, formatted)
    } else {
        format!("{}{}", symbol, formatted)
    }
}

/// Format a number as percentage.
fn format_percentage(value: f64, decimal_places: usize) -> String {
    let percentage = value * 100.0;
    format!("{:.prec$}%", percentage, prec = decimal_places)
}
