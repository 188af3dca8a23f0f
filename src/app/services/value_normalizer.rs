//! Value normalisation for locale-formatted spreadsheet cells
//!
//! Brazilian registration exports mix number formats freely: `"1.234,56"`,
//! `"R$ 45,00"`, `"1234.56"` and raw numeric cells all appear in the same
//! column. These helpers turn such cells into numbers and normalise
//! identifier and classification codes. None of them fail: anything that
//! cannot be interpreted degrades to `0` or to the original text.

use crate::app::models::CellValue;
use regex::Regex;
use std::sync::LazyLock;

/// Currency symbol and whitespace characters stripped before parsing
static CURRENCY_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[R$\s]").expect("valid currency regex"));

/// Longest leading decimal number (trailing garbage is ignored)
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number regex")
});

/// Parse a currency-like cell into a number
///
/// Numeric cells are returned unchanged and blank cells are `0`. Text has
/// `R`, `$` and whitespace removed; when it contains a comma, the comma is
/// the decimal separator and every period is a thousands separator. The
/// longest leading number is parsed; `0` when nothing parses.
pub fn parse_currency(value: &CellValue) -> f64 {
    match value {
        CellValue::Number(n) => *n,
        CellValue::Empty => 0.0,
        CellValue::Text(text) => parse_currency_str(text),
    }
}

/// Text form of [`parse_currency`]
pub fn parse_currency_str(text: &str) -> f64 {
    let stripped = CURRENCY_NOISE.replace_all(text, "");
    if stripped.is_empty() {
        return 0.0;
    }

    let normalized = if stripped.contains(',') {
        stripped.replace('.', "").replacen(',', ".", 1)
    } else {
        stripped.into_owned()
    };

    LEADING_NUMBER
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Keep only ASCII digits
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format an 11-digit CPF as `DDD.DDD.DDD-DD`
///
/// Values that do not reduce to exactly 11 digits are returned unchanged.
pub fn format_identifier(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() != 11 {
        return value.to_string();
    }

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

/// Normalise a CBO code: digits only, first six
pub fn clean_code(value: &str) -> String {
    digits_only(value).chars().take(6).collect()
}
