use rust_decimal::Decimal;

use crate::config::DisplayConfig;

/// Largest scale `rust_decimal` supports.
const MAX_SCALE: u32 = 28;

/// Major-unit value of an amount stored in minor units (`12345` -> `123.45`
/// at two decimals).
pub fn minor_to_decimal(amount: i64, decimals: u32) -> Decimal {
    Decimal::new(amount, decimals.min(MAX_SCALE))
}

fn group_int_digits(int_part: &str) -> String {
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        out.push(ch);
        let remaining = len.saturating_sub(i + 1);
        if remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    }
    out
}

/// Render a minor-unit amount for humans, e.g. `-$1,234.50`.
///
/// Canonical JSON fields keep the integer; this only feeds `*_display`
/// fields.
pub fn format_amount(amount: i64, display: &DisplayConfig) -> String {
    let value = minor_to_decimal(amount, display.currency_decimals);
    let rendered = value.abs().to_string();

    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };
    let int_part = if display.currency_grouping {
        group_int_digits(int_part)
    } else {
        int_part.to_string()
    };

    let mut out = String::new();
    if value.is_sign_negative() && !value.is_zero() {
        out.push('-');
    }
    if let Some(symbol) = &display.currency_symbol {
        out.push_str(symbol);
    }
    out.push_str(&int_part);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
