//! Rand and percentage formatting.
//!
//! Amounts are grouped in thousands with a space, the way South African
//! payslips print them (`R 1 234.56`). Only presentation rounds; the engine
//! itself never calls these functions on values it keeps.

use rust_decimal::{Decimal, RoundingStrategy};

/// Inserts a space between every group of three digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats an amount with two decimals and space-grouped thousands.
///
/// The sign is dropped; callers that care about it use [`format_rand`].
///
/// # Examples
///
/// ```
/// use paye_engine::format::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(123456789, 2)), "1 234 567.89");
/// assert_eq!(format_amount(Decimal::new(5, 3)), "0.01");
/// ```
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded);
    match text.split_once('.') {
        Some((whole, cents)) => format!("{}.{}", group_thousands(whole), cents),
        None => format!("{}.00", group_thousands(&text)),
    }
}

/// Formats an amount as rand currency text, e.g. `R 97 995.00`.
///
/// # Examples
///
/// ```
/// use paye_engine::format::format_rand;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_rand(Decimal::new(17712, 2)), "R 177.12");
/// assert_eq!(format_rand(Decimal::new(-250, 0)), "-R 250.00");
/// ```
pub fn format_rand(amount: Decimal) -> String {
    let body = format_amount(amount);
    let is_negative = amount.is_sign_negative()
        && !amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .is_zero();
    if is_negative {
        format!("-R {}", body)
    } else {
        format!("R {}", body)
    }
}

/// Formats a bracket boundary without forcing decimals, e.g. `R255 001`.
pub fn format_boundary(amount: Decimal) -> String {
    let text = amount.normalize().to_string();
    match text.split_once('.') {
        Some((whole, fraction)) => format!("R{}.{}", group_thousands(whole), fraction),
        None => format!("R{}", group_thousands(&text)),
    }
}

/// Formats a fractional rate as a whole percentage, e.g. `0.26` as `26%`.
pub fn format_percent(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{}%", percent)
}
