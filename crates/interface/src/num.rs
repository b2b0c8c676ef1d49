//! Numeric text handling.
//!
//! A number in Lunar is a symbol whose text parses as a finite-or-not `f64`.
//! Canonicalisation keeps numeric symbols unique: `"2"` and `"2.0"` intern
//! into the same slot, so numeric equality reduces to symbol identity.

use std::borrow::Cow;

/// Parses `text` as a number. Accepts whatever `f64` accepts, mirroring the
/// permissiveness of `strtod`.
pub fn parse(text: &str) -> Option<f64> {
    text.parse().ok()
}

/// Returns `true` if `text` parses as a number.
pub fn is_number(text: &str) -> bool {
    parse(text).is_some()
}

/// Canonicalises numeric text: strips trailing zeros after a decimal point,
/// and the point itself if the fraction empties out. `"1.2300"` becomes
/// `"1.23"`, `"5.0"` becomes `"5"`. Non-numeric text and exponent forms are
/// returned unchanged.
pub fn canonicalize(text: &str) -> Cow<'_, str> {
    if !is_number(text) || !text.contains('.') || text.contains(['e', 'E']) {
        return Cow::Borrowed(text);
    }
    let mut s = text.trim_end_matches('0');
    s = s.strip_suffix('.').unwrap_or(s);
    if s.is_empty() || s == "-" || s == "+" {
        // ".0" and friends canonicalise to zero.
        return Cow::Owned(format!("{s}0"));
    }
    Cow::Borrowed(s)
}

/// Formats an arithmetic result canonically.
///
/// A result within 1e-6 of an integer collapses to the integer rendering;
/// anything else uses the shortest `f64` form, which carries no trailing
/// zeros by construction.
pub fn format(value: f64) -> String {
    let rounded = value.round();
    if value.is_finite() && (value - rounded).abs() < 1e-6 && rounded.abs() < i64::MAX as f64 {
        return itoa::Buffer::new().format(rounded as i64).to_string();
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_like_strtod() {
        assert_eq!(parse("5"), Some(5.0));
        assert_eq!(parse("-5"), Some(-5.0));
        assert_eq!(parse("5."), Some(5.0));
        assert_eq!(parse(".5"), Some(0.5));
        assert_eq!(parse("1e3"), Some(1000.0));
        assert_eq!(parse("x"), None);
        assert_eq!(parse("5x"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn canonical_forms() {
        for &(input, expected) in &[
            ("1.2300", "1.23"),
            ("5.0", "5"),
            ("5.", "5"),
            ("0.0", "0"),
            (".0", "0"),
            ("-5.00", "-5"),
            ("-0.50", "-0.5"),
            ("2", "2"),
            ("1e3", "1e3"),
            ("abc", "abc"),
            ("#t", "#t"),
        ] {
            assert_eq!(canonicalize(input), expected, "{input:?}");
        }
    }

    #[test]
    fn canonicalize_is_idempotent() {
        for input in ["1.2300", "5.0", "2", "0.5", "x"] {
            let once = canonicalize(input).into_owned();
            assert_eq!(canonicalize(&once), once);
        }
    }

    #[test]
    fn format_collapses_near_integers() {
        assert_eq!(format(3.0), "3");
        assert_eq!(format(120.0), "120");
        assert_eq!(format(-7.0), "-7");
        assert_eq!(format(2.9999999), "3");
        assert_eq!(format(0.5), "0.5");
        assert_eq!(format(0.25), "0.25");
    }
}
