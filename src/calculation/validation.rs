//! Payroll input validation.
//!
//! Validation collects every problem with an input rather than stopping at
//! the first one, so a caller can show all messages at once.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollInput;

/// Message returned when no income component is positive.
pub const NO_INCOME_MESSAGE: &str = "Please enter at least one income component.";

/// Largest accepted monetary amount: R1 trillion a month.
///
/// Every field at this bound, summed and annualised, stays far inside the
/// range of [`Decimal`], so a validated input cannot overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Checks that an input can be calculated.
///
/// An input is rejected when none of its income components is positive,
/// when any monetary field or the dependent count is negative, or when a
/// monetary field exceeds [`MAX_AMOUNT`].
///
/// # Errors
///
/// Returns [`EngineError::ValidationFailed`] listing every message, income
/// first and then out-of-range fields in declaration order.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::validate_input;
/// use paye_engine::error::EngineError;
/// use paye_engine::models::PayrollInput;
///
/// let input = PayrollInput::default();
/// match validate_input(&input) {
///     Err(EngineError::ValidationFailed { errors }) => {
///         assert_eq!(errors, vec!["Please enter at least one income component."]);
///     }
///     other => panic!("expected validation failure, got {:?}", other),
/// }
/// ```
pub fn validate_input(input: &PayrollInput) -> EngineResult<()> {
    let mut errors = Vec::new();

    let has_income = input
        .income_components()
        .iter()
        .any(|(_, amount)| *amount > Decimal::ZERO);
    if !has_income {
        errors.push(NO_INCOME_MESSAGE.to_string());
    }

    for (field, amount) in input.monetary_fields() {
        if amount < Decimal::ZERO {
            errors.push(format!("{} cannot be negative.", field));
        } else if amount > MAX_AMOUNT {
            errors.push(format!("{} is too large.", field));
        }
    }

    if input.medical_aid_dependents < 0 {
        errors.push("medical_aid_dependents cannot be negative.".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(EngineError::ValidationFailed { errors })
    }
}
