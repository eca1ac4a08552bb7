//! Formatting of numeric results for display.

use super::error::{INFINITY, UNDEFINED};

/// Significant digits of the general format.
const GENERAL_PRECISION: usize = 10;

/// Digits after the point in scientific notation.
const SCIENTIFIC_PRECISION: usize = 6;

/// Format an evaluated value for the calculator display.
///
/// - NaN is `Undefined`, an infinity is `Infinity`.
/// - Very large (> 1e15) or very small nonzero (< 1e-6) magnitudes use
///   scientific notation: `1.234568e+20`.
/// - Integral values below 1e12 print without a decimal point.
/// - Everything else keeps 10 significant digits with trailing zeros
///   trimmed.
pub fn format_result(value: f64) -> String {
    if value.is_nan() {
        return UNDEFINED.to_string();
    }
    if value.is_infinite() {
        return INFINITY.to_string();
    }

    let magnitude = value.abs();
    if magnitude > 1e15 || (magnitude > 0.0 && magnitude < 1e-6) {
        format_scientific(value, SCIENTIFIC_PRECISION)
    } else if value.trunc() == value && magnitude < 1e12 {
        format!("{}", value as i64)
    } else {
        format_general(value, GENERAL_PRECISION)
    }
}

/// Scientific notation with a signed, at least two-digit exponent.
fn format_scientific(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*e}", decimals, value);
    let (mantissa, exponent) = split_exponent(&formatted);
    join_exponent(mantissa, exponent)
}

/// `%g`-style formatting with `precision` significant digits.
fn format_general(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    // Round to the requested significant digits first; rounding can carry
    // into the next power of ten.
    let rounded = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = split_exponent(&rounded);

    if exponent < -4 || exponent >= precision as i32 {
        return join_exponent(trim_fraction(mantissa), exponent);
    }

    let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{:.*}", decimals, value)).to_string()
}

fn split_exponent(formatted: &str) -> (&str, i32) {
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse().unwrap_or(0)),
        None => (formatted, 0),
    }
}

fn join_exponent(mantissa: &str, exponent: i32) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exponent.abs())
}

/// Drop trailing zeros after the decimal point, then a bare point.
fn trim_fraction(number: &str) -> &str {
    if !number.contains('.') {
        return number;
    }
    number.trim_end_matches('0').trim_end_matches('.')
}

/// Format with a fixed number of decimals and thousand separators in the
/// integer part: `1234567.891` with 2 decimals is `1,234,567.89`.
pub fn format_with_separators(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (sign, digits) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_special_values() {
        assert_eq!(format_result(f64::NAN), "Undefined");
        assert_eq!(format_result(f64::INFINITY), "Infinity");
        assert_eq!(format_result(f64::NEG_INFINITY), "Infinity");
    }

    #[test]
    fn test_integers() {
        assert_eq!(format_result(81.0), "81");
        assert_eq!(format_result(4.0), "4");
        assert_eq!(format_result(-12.0), "-12");
        assert_eq!(format_result(0.0), "0");
        assert_eq!(format_result(-0.0), "0");
        assert_eq!(format_result(999_999_999_999.0), "999999999999");
    }

    #[test]
    fn test_general() {
        assert_eq!(format_result(1.0 / 3.0), "0.3333333333");
        assert_eq!(format_result(2.5), "2.5");
        assert_eq!(format_result(0.1 + 0.2), "0.3");
        assert_eq!(format_result(-1.0 / 3.0), "-0.3333333333");
        assert_eq!(format_result(std::f64::consts::PI), "3.141592654");
    }

    #[test]
    fn test_general_switches_to_exponent() {
        // Integral but at least 1e12.
        assert_eq!(format_result(1e12), "1e+12");
        assert_eq!(format_result(123_456_789_012_345.0), "1.23456789e+14");
        // Small but not below 1e-6.
        assert_eq!(format_result(0.00001234), "1.234e-05");
        assert_eq!(format_result(0.0001234), "0.0001234");
    }

    #[test]
    fn test_scientific() {
        assert_eq!(format_result(2e20), "2.000000e+20");
        assert_eq!(format_result(-1.5e16), "-1.500000e+16");
        assert_eq!(format_result(1.234e-7), "1.234000e-07");
        assert_eq!(format_result(1e100), "1.000000e+100");
    }

    #[test]
    fn test_separators() {
        assert_eq!(format_with_separators(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_with_separators(999.0, 2), "999.00");
        assert_eq!(format_with_separators(1000.0, 2), "1,000.00");
        assert_eq!(format_with_separators(-1234.5, 2), "-1,234.50");
        assert_eq!(format_with_separators(1_000_000.0, 0), "1,000,000");
    }
}
