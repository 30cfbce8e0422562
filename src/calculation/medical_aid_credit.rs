//! Medical scheme fees tax credit.
//!
//! The main member always earns a credit; the first dependent earns a
//! second credit and every further dependent earns the smaller
//! additional-dependent credit.

use rust_decimal::Decimal;

use crate::config::TaxTable;
use crate::format::format_rand;
use crate::models::AuditStep;

/// The result of a medical aid credit calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct MedicalAidCreditResult {
    /// Monthly credit applied against PAYE.
    pub credit: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the monthly medical aid tax credit.
///
/// # Arguments
///
/// * `dependents` - Number of dependents, excluding the main member
/// * `table` - The tax table for the year
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::calculate_medical_aid_credit;
/// use paye_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let registry = ConfigLoader::builtin()?;
/// let result = calculate_medical_aid_credit(3, registry.resolve(2026), 1);
///
/// // 364 + 364 + 2 x 246
/// assert_eq!(result.credit, Decimal::new(1220, 0));
/// # Ok::<(), paye_engine::error::EngineError>(())
/// ```
pub fn calculate_medical_aid_credit(
    dependents: u32,
    table: &TaxTable,
    step_number: u32,
) -> MedicalAidCreditResult {
    let credits = &table.medical_aid_credit;

    let mut credit = credits.main_member;
    if dependents >= 1 {
        credit += credits.first_dependent;
    }
    let additional = dependents.saturating_sub(1);
    if additional > 0 {
        credit += Decimal::from(additional) * credits.additional_dependents;
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "medical_aid_tax_credit".to_string(),
        rule_name: "Medical Aid Tax Credit".to_string(),
        input: serde_json::json!({
            "dependents": dependents,
            "main_member": credits.main_member.to_string(),
            "first_dependent": credits.first_dependent.to_string(),
            "additional_dependents": credits.additional_dependents.to_string()
        }),
        output: serde_json::json!({
            "credit": credit.to_string()
        }),
        reasoning: format!(
            "Main member plus {} dependent(s) = {}",
            dependents,
            format_rand(credit)
        ),
    };

    MedicalAidCreditResult { credit, audit_step }
}
