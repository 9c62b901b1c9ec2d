//! Display formatting for metric values and summary rows.

use crate::summary::summarizer::SummaryRow;

/// Shown in place of a value that is missing or not a number.
pub const MISSING_PLACEHOLDER: &str = "\u{2013}";

/// Formats a metric value for a results table.
///
/// * missing or NaN → [`MISSING_PLACEHOLDER`]
/// * magnitude of at least 1000 → thousands separated by `,`, one decimal
/// * anything else → two decimals
///
/// Rounding follows Rust's float formatting of the exact stored value.
///
/// # Examples
///
/// ```
/// use solar_compare::{format_metric_value, MISSING_PLACEHOLDER};
///
/// assert_eq!(format_metric_value(Some(1234.5)), "1,234.5");
/// assert_eq!(format_metric_value(Some(12.345)), "12.35");
/// assert_eq!(format_metric_value(None), MISSING_PLACEHOLDER);
/// ```
pub fn format_metric_value(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| !v.is_nan()) else {
        return MISSING_PLACEHOLDER.to_string();
    };
    if value.is_infinite() {
        return value.to_string();
    }
    if value.abs() >= 1000.0 {
        group_thousands(&format!("{value:.1}"))
    } else {
        format!("{value:.2}")
    }
}

/// Inserts `,` between groups of three digits in the integer part of a
/// formatted decimal number such as `-1234567.9`.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(formatted.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// A [`SummaryRow`] with every statistic rendered by [`format_metric_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSummaryRow {
    pub region: String,
    pub mean: String,
    pub median: String,
    pub std: String,
    pub p95: String,
}

impl From<&SummaryRow> for FormattedSummaryRow {
    fn from(row: &SummaryRow) -> Self {
        Self {
            region: row.region.clone(),
            mean: format_metric_value(row.mean),
            median: format_metric_value(row.median),
            std: format_metric_value(row.std),
            p95: format_metric_value(row.p95),
        }
    }
}

pub fn format_summary(summary: &[SummaryRow]) -> Vec<FormattedSummaryRow> {
    summary.iter().map(FormattedSummaryRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_use_the_placeholder() {
        assert_eq!(format_metric_value(None), "–");
        assert_eq!(format_metric_value(Some(f64::NAN)), "–");
    }

    #[test]
    fn small_values_get_two_decimals() {
        assert_eq!(format_metric_value(Some(12.345)), "12.35");
        assert_eq!(format_metric_value(Some(0.0)), "0.00");
        assert_eq!(format_metric_value(Some(-3.5)), "-3.50");
        assert_eq!(format_metric_value(Some(999.5)), "999.50");
    }

    #[test]
    fn large_values_are_grouped_with_one_decimal() {
        assert_eq!(format_metric_value(Some(1234.5)), "1,234.5");
        assert_eq!(format_metric_value(Some(1000.0)), "1,000.0");
        assert_eq!(format_metric_value(Some(-1000.0)), "-1,000.0");
        assert_eq!(format_metric_value(Some(1234567.84)), "1,234,567.8");
        assert_eq!(format_metric_value(Some(123456.0)), "123,456.0");
    }

    #[test]
    fn infinities_are_spelled_out() {
        assert_eq!(format_metric_value(Some(f64::INFINITY)), "inf");
        assert_eq!(format_metric_value(Some(f64::NEG_INFINITY)), "-inf");
    }

    #[test]
    fn formats_every_statistic_of_a_row() {
        let row = SummaryRow {
            region: "Togo (Dapaong)".to_string(),
            count: 1,
            mean: Some(1500.26),
            median: Some(12.0),
            std: None,
            p95: Some(2000.0),
        };
        let formatted = FormattedSummaryRow::from(&row);
        assert_eq!(formatted.mean, "1,500.3");
        assert_eq!(formatted.median, "12.00");
        assert_eq!(formatted.std, MISSING_PLACEHOLDER);
        assert_eq!(formatted.p95, "2,000.0");
    }
}
