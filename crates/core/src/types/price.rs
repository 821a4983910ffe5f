//! Price labels and Brazilian real formatting.
//!
//! Catalog prices are stored as display strings (`"R$299.00"`, `"R$2,499.00"`,
//! `"R$ 1.234,56"`), never as numbers. Totals are computed by parsing those
//! labels into [`Decimal`] and rendered back with [`format_brl`].

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency prefix used for catalog price labels.
pub const CURRENCY_PREFIX: &str = "R$";

/// Parse a display price label into an amount.
///
/// Everything except digits, `.` and `,` is discarded. A label ending in a
/// comma followed by exactly two digits is read as Brazilian notation
/// (`1.234,56`); otherwise commas are treated as thousands separators
/// (`2,499.00`). Labels with no readable number parse as zero.
///
/// # Examples
///
/// ```
/// use izeshop_core::parse_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_price("R$2,499.00"), Decimal::new(2499, 0));
/// assert_eq!(parse_price("R$ 1.234,56"), Decimal::new(123_456, 2));
/// assert_eq!(parse_price("sob consulta"), Decimal::ZERO);
/// ```
#[must_use]
pub fn parse_price(label: &str) -> Decimal {
    let cleaned: String = label
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    let normalized = if ends_with_decimal_comma(&cleaned) {
        cleaned.replace('.', "").replacen(',', ".", 1)
    } else {
        cleaned.replace(',', "")
    };

    leading_decimal(&normalized)
}

/// Whether the cleaned label ends in `,` plus exactly two digits.
fn ends_with_decimal_comma(cleaned: &str) -> bool {
    let bytes = cleaned.as_bytes();
    match bytes {
        [.., b',', d1, d2] => d1.is_ascii_digit() && d2.is_ascii_digit(),
        _ => false,
    }
}

/// Read the longest leading `digits[.digits]` run as a decimal.
fn leading_decimal(s: &str) -> Decimal {
    let mut end = 0;
    let mut seen_point = false;
    for (idx, c) in s.char_indices() {
        match c {
            '0'..='9' => end = idx + 1,
            '.' if !seen_point => seen_point = true,
            _ => break,
        }
    }

    let Some(number) = s.get(..end) else {
        return Decimal::ZERO;
    };
    let number = number.trim_end_matches('.');
    if number.is_empty() || number == "." {
        return Decimal::ZERO;
    }

    let number = if number.starts_with('.') {
        format!("0{number}")
    } else {
        number.to_owned()
    };

    number.parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

/// Format an amount as Brazilian reais (`R$ 1.234,56`).
///
/// The separator after the currency symbol is a no-break space (U+00A0),
/// matching the `pt-BR` locale's currency style. Amounts are rounded to two
/// decimal places, half away from zero.
///
/// # Examples
///
/// ```
/// use izeshop_core::format_brl;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_brl(Decimal::new(12345, 1)), "R$\u{a0}1.234,50");
/// ```
#[must_use]
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    format!(
        "{sign}{CURRENCY_PREFIX}\u{a0}{},{cents}",
        group_thousands(whole)
    )
}

/// Insert `.` between groups of three digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

/// Normalize a price typed into the admin form.
///
/// The value is trimmed and prefixed with `R$` unless it already carries the
/// prefix. Blank input yields `None`.
#[must_use]
pub fn normalize_price_label(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.starts_with(CURRENCY_PREFIX) {
        Some(trimmed.to_owned())
    } else {
        Some(format!("{CURRENCY_PREFIX}{trimmed}"))
    }
}

/// Parsed unit price multiplied by a quantity.
///
/// Returns `None` when the product does not fit in a [`Decimal`].
#[must_use]
pub fn line_total(label: &str, quantity: u32) -> Option<Decimal> {
    parse_price(label).checked_mul(Decimal::from(quantity))
}
