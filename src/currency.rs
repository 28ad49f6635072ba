//! Money parsing and display.
//!
//! Every amount shown by the board goes through [`format_amount`], and every amount read back from the
//! sheet or from a rendered cell goes through [`parse_amount`]. Parsing never fails: whatever the sheet
//! sends degrades to zero so a rebuild is never blocked by one odd cell.

pub type Amount = f64;

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

/// A loosely typed amount as it arrives from the sheet or a text field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AmountInput<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

impl<'a> From<&'a str> for AmountInput<'a> {
    fn from(s: &'a str) -> Self { AmountInput::Text(s) }
}

impl<'a> From<&'a String> for AmountInput<'a> {
    fn from(s: &'a String) -> Self { AmountInput::Text(s.as_str()) }
}

impl From<f64> for AmountInput<'_> {
    fn from(v: f64) -> Self { AmountInput::Number(v) }
}

impl From<i64> for AmountInput<'_> {
    fn from(v: i64) -> Self { AmountInput::Number(v as f64) }
}

/// Canonical non-negative amount. Unparseable, non-finite and negative input all become 0.
pub fn parse_amount<'a>(raw: impl Into<AmountInput<'a>>) -> Amount {
    let value = match raw.into() {
        AmountInput::Text(s) => parse_strict(s).unwrap_or(0.0),
        AmountInput::Number(v) => v,
        AmountInput::Missing => 0.0,
    };
    clamp(value)
}

/// Parses "$1,234.50", "-$5", " 60 " and friends. `None` when nothing numeric is left; no clamping.
pub fn parse_strict(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, s),
    };
    let s = s.strip_prefix(&CURRENCY_SYMBOLS[..]).unwrap_or(s).trim_start();
    if negative && s.starts_with(&['-', '+'][..]) {
        return None;
    }
    let cleaned = s.replace(',', "");
    let v = cleaned.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if negative { -v } else { v })
}

/// Whole-unit US dollar display: `1234.5` renders as `$1,235`.
pub fn format_amount(amount: Amount) -> String {
    if !amount.is_finite() {
        return "$0".into();
    }
    let units = amount.abs().round();
    let sign = if amount < 0.0 && units > 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(&format!("{units:.0}")))
}

fn clamp(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
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
    fn parses_symbol_and_grouping() {
        assert_eq!(parse_amount("$1,234"), 1234.0);
        assert_eq!(parse_amount("1,234,567.25"), 1_234_567.25);
        assert_eq!(parse_amount(" £40 "), 40.0);
        assert_eq!(parse_amount(60.5), 60.5);
    }

    #[test]
    fn garbage_degrades_to_zero() {
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount(f64::NAN), 0.0);
        assert_eq!(parse_amount(AmountInput::Missing), 0.0);
    }

    #[test]
    fn negatives_clamp_to_zero() {
        assert_eq!(parse_amount(-5.0), 0.0);
        assert_eq!(parse_amount(-5_i64), 0.0);
        assert_eq!(parse_amount("-$5"), 0.0);
        assert!(parse_amount(-0.0).is_sign_positive());
    }

    #[test]
    fn strict_parse_keeps_sign_and_reports_failure() {
        assert_eq!(parse_strict("-$5"), Some(-5.0));
        assert_eq!(parse_strict("$60"), Some(60.0));
        assert_eq!(parse_strict("--5"), None);
        assert_eq!(parse_strict(""), None);
        assert_eq!(parse_strict("ten"), None);
    }

    #[test]
    fn formats_whole_units() {
        assert_eq!(format_amount(0.0), "$0");
        assert_eq!(format_amount(100.0), "$100");
        assert_eq!(format_amount(1234.5), "$1,235");
        assert_eq!(format_amount(999.4), "$999");
        assert_eq!(format_amount(1_000_000.0), "$1,000,000");
        assert_eq!(format_amount(-5.0), "-$5");
        assert_eq!(format_amount(f64::NAN), "$0");
    }

    #[test]
    fn huge_amounts_keep_every_digit() {
        assert_eq!(format_amount(1e20), "$100,000,000,000,000,000,000");
        assert_eq!(format_amount(-1e20), "-$100,000,000,000,000,000,000");
        let shown = format_amount(parse_strict("1e30").unwrap());
        assert_eq!(shown.len(), "$1".len() + 30 + 10);
        assert!(shown.starts_with("$1,000,000,000,000,000"));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for v in [0.0, 7.0, 40.0, 1234.0, 98_765.0] {
            assert_eq!(parse_amount(format_amount(v).as_str()), v);
        }
    }
}
