// src/format/currency.rs

/// Format an amount as US dollars: `1234.5` → `"$1,234.50"`.
///
/// Negative amounts get a leading minus (`"-$3.00"`); NaN and the infinities
/// still produce a string.
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return "$NaN".to_string();
    }
    let sign = if amount.is_sign_negative() && scaled_round(amount, 2) != 0.0 {
        "-"
    } else {
        ""
    };
    if amount.is_infinite() {
        return format!("{sign}$∞");
    }
    format!("{sign}${}", format_grouped(amount.abs(), 2))
}

/// A non-negative number with thousands separators and a fixed number of
/// decimals: `format_grouped(1234.5, 2)` → `"1,234.50"`.
///
/// The sign is dropped; callers format negative values themselves.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.abs().to_string();
    }
    let fixed = format_fixed(value.abs(), decimals);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = group_thousands(int_part);
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Fixed-point text without grouping: `format_fixed(1.125, 2)` → `"1.13"`.
///
/// Negative values keep their sign unless they round to zero.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let scale = 10f64.powi(decimals as i32);
    let scaled = scaled_round(value.abs(), decimals);
    let whole = (scaled / scale).trunc();
    let frac = (scaled - whole * scale).clamp(0.0, scale - 1.0);
    let sign = if value < 0.0 && scaled > 0.0 { "-" } else { "" };

    if decimals == 0 {
        format!("{sign}{whole:.0}")
    } else {
        format!("{sign}{whole:.0}.{frac:0width$.0}", width = decimals)
    }
}

/// `value` times `10^decimals`, rounded half away from zero.
///
/// Every amount that reaches a document is rounded here, so the figures and
/// the words line of one bill always agree: `scaled_round(1.125, 2)` is `113.0`.
pub fn scaled_round(value: f64, decimals: usize) -> f64 {
    (value * 10f64.powi(decimals as i32)).round()
}

/// Whole-number quantity as shown in the tables: rounded and grouped.
pub fn format_quantity(qty: f64) -> String {
    let rounded = qty.round();
    if rounded < 0.0 {
        format!("-{}", format_grouped(-rounded, 0))
    } else {
        format_grouped(rounded, 0)
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1234.5, "$1,234.50")]
    #[case(0.0, "$0.00")]
    #[case(-0.0, "$0.00")]
    #[case(5.0, "$5.00")]
    #[case(999.999, "$1,000.00")]
    #[case(1_000_000.0, "$1,000,000.00")]
    #[case(123_456_789.12, "$123,456,789.12")]
    #[case(-3.0, "-$3.00")]
    #[case(-1234.5, "-$1,234.50")]
    #[case(-0.001, "$0.00")]
    #[case(1.125, "$1.13")]
    fn test_format_currency(#[case] amount: f64, #[case] expected: &str) {
        assert_eq!(format_currency(amount), expected);
    }

    #[test]
    fn test_non_finite_currency() {
        assert_eq!(format_currency(f64::NAN), "$NaN");
        assert_eq!(format_currency(f64::INFINITY), "$∞");
        assert_eq!(format_currency(f64::NEG_INFINITY), "-$∞");
    }

    #[test]
    fn test_format_currency_is_stable() {
        assert_eq!(format_currency(1234.5), format_currency(1234.5));
    }

    #[rstest]
    #[case(0.0, 0, "0")]
    #[case(12.0, 0, "12")]
    #[case(1234.0, 0, "1,234")]
    #[case(12345.678, 2, "12,345.68")]
    #[case(100.0, 2, "100.00")]
    #[case(1.125, 2, "1.13")]
    #[case(0.5, 0, "1")]
    #[case(2.5, 0, "3")]
    fn test_format_grouped(#[case] value: f64, #[case] decimals: usize, #[case] expected: &str) {
        assert_eq!(format_grouped(value, decimals), expected);
    }

    #[rstest]
    #[case(1.125, 2, "1.13")]
    #[case(45705.0, 2, "45705.00")]
    #[case(0.05, 2, "0.05")]
    #[case(-3.0, 2, "-3.00")]
    #[case(-0.001, 2, "0.00")]
    #[case(1234.4, 0, "1234")]
    fn test_format_fixed(#[case] value: f64, #[case] decimals: usize, #[case] expected: &str) {
        assert_eq!(format_fixed(value, decimals), expected);
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(scaled_round(1.125, 2), 113.0);
        assert_eq!(scaled_round(-1.125, 2), -113.0);
        assert_eq!(scaled_round(0.5, 0), 1.0);
    }

    #[test]
    fn test_format_quantity_rounds() {
        assert_eq!(format_quantity(1499.6), "1,500");
        assert_eq!(format_quantity(-1200.2), "-1,200");
    }
}
