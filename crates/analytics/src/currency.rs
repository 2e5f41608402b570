use rust_decimal::{Decimal, RoundingStrategy};

pub const BRL_SYMBOL: &str = "R$";

/// Formats an amount the Brazilian way: `R$ 1.234,56`, negatives as `-R$ 30,00`.
pub fn format_brl(value: Decimal) -> String {
    format_currency(value, BRL_SYMBOL)
}

/// Formats an amount with `.` thousands groups, `,` decimals and the given symbol.
pub fn format_currency(value: Decimal, symbol: &str) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded.set_sign_positive(true);
    rounded.rescale(2);

    let digits = rounded.to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{symbol} {grouped},{frac_part}")
}
