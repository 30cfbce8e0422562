//! Skills Development Levy.

use rust_decimal::Decimal;

use crate::config::TaxTable;
use crate::format::{format_percent, format_rand};
use crate::models::AuditStep;

/// The result of an SDL calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct SdlResult {
    /// Levy payable by the employer.
    pub levy: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the Skills Development Levy on gross monthly income.
///
/// The levy is a flat, uncapped rate borne by the employer only.
pub fn calculate_sdl(gross_income: Decimal, table: &TaxTable, step_number: u32) -> SdlResult {
    let levy = gross_income * table.sdl_rate;

    let audit_step = AuditStep {
        step_number,
        rule_id: "sdl".to_string(),
        rule_name: "Skills Development Levy".to_string(),
        input: serde_json::json!({
            "gross_income": gross_income.to_string(),
            "rate": table.sdl_rate.to_string()
        }),
        output: serde_json::json!({
            "levy": levy.to_string()
        }),
        reasoning: format!(
            "{} x {} = {}",
            format_rand(gross_income),
            format_percent(table.sdl_rate),
            format_rand(levy)
        ),
    };

    SdlResult { levy, audit_step }
}
