//! Unemployment Insurance Fund contribution.
//!
//! The employee contributes a flat rate of gross income up to a monthly
//! ceiling, and the employer matches the employee's contribution.

use rust_decimal::Decimal;

use crate::config::TaxTable;
use crate::format::{format_percent, format_rand};
use crate::models::AuditStep;

/// The result of a UIF calculation, including both contributions and the audit step.
#[derive(Debug, Clone)]
pub struct UifResult {
    /// Contribution withheld from the employee.
    pub employee: Decimal,
    /// Matching contribution paid by the employer.
    pub employer: Decimal,
    /// True if the monthly ceiling limited the contribution.
    pub capped: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the UIF contribution on gross monthly income.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::calculate_uif;
/// use paye_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let registry = ConfigLoader::builtin()?;
/// let result = calculate_uif(Decimal::new(10000, 0), registry.resolve(2026), 1);
/// assert_eq!(result.employee, Decimal::new(100, 0));
/// assert_eq!(result.employer, result.employee);
/// # Ok::<(), paye_engine::error::EngineError>(())
/// ```
pub fn calculate_uif(gross_income: Decimal, table: &TaxTable, step_number: u32) -> UifResult {
    let uncapped = gross_income * table.uif_rate;
    let capped = uncapped > table.uif_cap;
    let employee = uncapped.min(table.uif_cap);

    let reasoning = if capped {
        format!(
            "{} x {} = {}, capped at {}",
            format_rand(gross_income),
            format_percent(table.uif_rate),
            format_rand(uncapped),
            format_rand(table.uif_cap)
        )
    } else {
        format!(
            "{} x {} = {}",
            format_rand(gross_income),
            format_percent(table.uif_rate),
            format_rand(employee)
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "uif".to_string(),
        rule_name: "Unemployment Insurance Fund".to_string(),
        input: serde_json::json!({
            "gross_income": gross_income.to_string(),
            "rate": table.uif_rate.to_string(),
            "cap": table.uif_cap.to_string()
        }),
        output: serde_json::json!({
            "employee": employee.to_string(),
            "employer": employee.to_string(),
            "capped": capped
        }),
        reasoning,
    };

    UifResult {
        employee,
        employer: employee,
        capped,
        audit_step,
    }
}
