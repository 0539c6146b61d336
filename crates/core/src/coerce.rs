//! Text-to-value coercion for form fields.
//!
//! Browsers submit every field as text. These helpers turn that text into
//! an explicit `Option`: blank or unparseable input is `None`, never an
//! error. Callers decide whether `None` means "leave unchanged" (partial
//! updates) or "absent" (creates).

/// Parse a decimal number. Blank, malformed, `NaN`, and infinite input
/// yield `None`.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a whole number that fits in an `i32`.
///
/// `"3"` and `"3.0"` both yield `Some(3)`; `"3.5"` yields `None`.
pub fn parse_int(raw: Option<&str>) -> Option<i32> {
    let value = parse_number(raw)?;
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return None;
    }
    Some(value as i32)
}

/// Trim a text field, mapping blank input to `None`.
pub fn non_blank(raw: Option<&str>) -> Option<String> {
    let text = raw?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_number(Some("10.5")), Some(10.5));
        assert_eq!(parse_number(Some("  3 ")), Some(3.0));
        assert_eq!(parse_number(Some("-2")), Some(-2.0));
    }

    #[test]
    fn invalid_text_is_absent() {
        assert_eq!(parse_number(None), None);
        assert_eq!(parse_number(Some("")), None);
        assert_eq!(parse_number(Some("   ")), None);
        assert_eq!(parse_number(Some("ten")), None);
        assert_eq!(parse_number(Some("NaN")), None);
        assert_eq!(parse_number(Some("inf")), None);
    }

    #[test]
    fn ints_reject_fractions() {
        assert_eq!(parse_int(Some("7")), Some(7));
        assert_eq!(parse_int(Some("7.0")), Some(7));
        assert_eq!(parse_int(Some("7.25")), None);
        assert_eq!(parse_int(Some("99999999999")), None);
    }

    #[test]
    fn blank_text_is_none() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some(" Lobby ")), Some("Lobby".to_string()));
    }

    #[test]
    fn splits_comma_lists() {
        assert_eq!(
            split_list(Some(" a@x.com, ,b@y.com ,")),
            vec!["a@x.com".to_string(), "b@y.com".to_string()]
        );
        assert!(split_list(None).is_empty());
    }
}
