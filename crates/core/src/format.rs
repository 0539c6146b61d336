//! Display formatting shared by the JSON summary and the PDF.
//!
//! Currency follows en-US conventions (`$1,234.50`). An absent or
//! non-finite amount renders as an em-dash rather than `$0.00`.

/// Placeholder shown for absent values.
pub const ABSENT: &str = "\u{2014}";

/// Format an amount as US dollars with thousands separators and two
/// decimals.
pub fn currency(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (whole, cents) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let negative = value < 0.0 && rounded.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    format!(
        "{}${}.{cents}",
        if negative { "-" } else { "" },
        group_thousands(whole)
    )
}

/// [`currency`] for optional values. `None`, infinities and NaN render as
/// [`ABSENT`].
pub fn currency_or_absent(value: Option<f64>) -> String {
    value
        .filter(|v| v.is_finite())
        .map(currency)
        .unwrap_or_else(|| ABSENT.to_string())
}

/// Format a stored fraction as a percentage with two decimals
/// (`0.15` -> `"15.00%"`).
pub fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Format labor hours with one decimal (`40` -> `"40.0 hrs"`).
pub fn hours(value: f64) -> String {
    format!("{value:.1} hrs")
}

/// Shortest decimal form of a quantity (`3.0` -> `"3"`, `2.5` -> `"2.5"`).
pub fn quantity(value: f64) -> String {
    format!("{value}")
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

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(currency(0.0), "$0.00");
        assert_eq!(currency(31.5), "$31.50");
        assert_eq!(currency(4800.0), "$4,800.00");
        assert_eq!(currency(1_234_567.891), "$1,234,567.89");
    }

    #[test]
    fn currency_negative_amounts() {
        assert_eq!(currency(-1250.0), "-$1,250.00");
        assert_eq!(currency(-0.001), "$0.00");
    }

    #[test]
    fn absent_currency_is_em_dash() {
        assert_eq!(currency_or_absent(None), "\u{2014}");
        assert_eq!(currency_or_absent(Some(12.0)), "$12.00");
        assert_eq!(currency_or_absent(Some(f64::INFINITY)), "\u{2014}");
        assert_eq!(currency_or_absent(Some(f64::NAN)), "\u{2014}");
    }

    #[test]
    fn percent_from_fraction() {
        assert_eq!(percent(0.15), "15.00%");
        assert_eq!(percent(0.0725), "7.25%");
    }

    #[test]
    fn hours_and_quantities() {
        assert_eq!(hours(40.0), "40.0 hrs");
        assert_eq!(quantity(3.0), "3");
        assert_eq!(quantity(2.5), "2.5");
    }
}
