//! Money
//!
//! Parsing and formatting of donation amounts. Amounts are kept as [`Decimal`] so that totals
//! never accumulate floating point error, and are displayed as US dollars.

use num_traits::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{
    Money,
    iso::{self, Currency},
};

/// Currency every amount on the donation pages is shown in.
pub const CURRENCY: &Currency = iso::USD;

/// Largest single amount accepted, one trillion dollars. Larger input parses as zero.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Parses a free-form price string such as `"$1,234.50"` into an amount.
///
/// Every character that is not an ASCII digit or a period is stripped first, so signs,
/// currency symbols and separators are ignored. Anything that still isn't a number
/// (an empty string, a lone period, more than one period) parses as zero, as does anything
/// above [`MAX_AMOUNT`].
pub fn parse_price(raw: &str) -> Decimal {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    parse_digits(&digits)
        .filter(|amount| *amount <= MAX_AMOUNT)
        .unwrap_or(Decimal::ZERO)
}

fn parse_digits(digits: &str) -> Option<Decimal> {
    let mut parts = digits.split('.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();

    if parts.next().is_some() {
        return None;
    }

    let normalised = match fraction {
        _ if whole.is_empty() && fraction.is_none_or(str::is_empty) => return None,
        Some(fraction) if !fraction.is_empty() => {
            let whole = if whole.is_empty() { "0" } else { whole };

            format!("{whole}.{fraction}")
        }
        _ => whole.to_string(),
    };

    normalised.parse().ok()
}

/// Formats an amount as dollars with two fractional digits and thousands separators.
pub fn format_currency(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    format!("{}", Money::from_decimal(rounded, CURRENCY))
}

/// Formats a floating point amount, treating non-finite values as zero.
pub fn format_currency_f64(value: f64) -> String {
    format_currency(Decimal::from_f64(value).unwrap_or(Decimal::ZERO))
}

/// Sums a sequence of amounts, saturating at [`Decimal::MAX`].
pub fn sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}
