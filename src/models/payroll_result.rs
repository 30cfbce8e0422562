//! Payroll result models.
//!
//! This module contains the [`PayrollResult`] type and its sections, which
//! capture every figure produced by a monthly payroll calculation together
//! with an audit trace of the rules that produced them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::YearKey;

/// The tax year a calculation actually used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTaxYear {
    /// The key the caller asked for, if any.
    pub requested: Option<YearKey>,
    /// The year of the table that was used.
    pub year: i32,
    /// Display label of the table that was used (e.g. "2026/2027").
    pub label: String,
    /// True if the requested key was not registered and the default was used.
    pub fell_back: bool,
}

/// Income components and their total (gross pay).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSection {
    /// Basic monthly salary.
    pub basic_salary: Decimal,
    /// Overtime pay.
    pub overtime: Decimal,
    /// Annual bonus.
    pub annual_bonus: Decimal,
    /// Other bonus.
    pub other_bonus: Decimal,
    /// Subsistence allowance.
    pub subsistence_allowance: Decimal,
    /// Travel allowance.
    pub travel_allowance: Decimal,
    /// Other allowances.
    pub other_allowances: Decimal,
    /// Sum of all income components.
    pub total: Decimal,
}

/// Fringe benefit components and their total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FringeBenefitsSection {
    /// Company car benefit.
    pub company_car_benefit: Decimal,
    /// Taxable travel portion.
    pub taxable_travel_portion: Decimal,
    /// Medical aid fringe benefit.
    pub medical_aid_fringe_benefit: Decimal,
    /// Provident fund fringe benefit.
    pub provident_fund_fringe_benefit: Decimal,
    /// Other fringe benefits.
    pub other_fringe_benefits: Decimal,
    /// Sum of all fringe benefit components.
    pub total: Decimal,
}

/// The tax attributable to one bracket of the progressive scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketContribution {
    /// Human-readable bracket range (e.g. "R255 001 - R398 300").
    pub range: String,
    /// Marginal rate of the bracket.
    pub rate: Decimal,
    /// Marginal rate as a whole percentage label (e.g. "26%").
    pub rate_label: String,
    /// Annual income falling within the bracket.
    pub taxable_amount: Decimal,
    /// Annual tax on `taxable_amount` at `rate`.
    pub tax_amount: Decimal,
}

/// The PAYE calculation.
///
/// Monthly figures unless the field name says otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSection {
    /// Gross income plus fringe benefits.
    pub taxable_income: Decimal,
    /// Taxable income annualised (x12).
    pub annual_taxable_income: Decimal,
    /// Tax before the primary rebate.
    pub gross_tax: Decimal,
    /// Monthly share of the primary rebate.
    pub primary_rebate: Decimal,
    /// Medical aid tax credit.
    pub medical_aid_tax_credit: Decimal,
    /// Tax withheld after the rebate and medical credit.
    pub paye_tax: Decimal,
    /// PAYE as a percentage of taxable income.
    pub effective_rate: Decimal,
    /// Brackets touched by the annualised income, in ascending order.
    pub brackets: Vec<BracketContribution>,
}

/// Amounts withheld from the employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionsSection {
    /// PAYE tax.
    pub paye_tax: Decimal,
    /// Employee UIF contribution.
    pub uif: Decimal,
    /// Employee medical aid contribution.
    pub medical_aid_employee: Decimal,
    /// Employee provident fund contribution.
    pub provident_fund_employee: Decimal,
    /// Retirement annuity contribution.
    pub retirement_annuity: Decimal,
    /// Sum of all deductions.
    pub total: Decimal,
}

/// Amounts borne by the employer on top of gross pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerContributionsSection {
    /// Employer medical aid contribution.
    pub medical_aid_employer: Decimal,
    /// Employer provident fund contribution.
    pub provident_fund_employer: Decimal,
    /// Employer UIF contribution (matches the employee's).
    pub uif_employer: Decimal,
    /// Skills Development Levy.
    pub sdl: Decimal,
    /// Sum of all employer contributions.
    pub total: Decimal,
}

/// The four headline payroll figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// Total income before deductions.
    pub gross_pay: Decimal,
    /// Total amount withheld from the employee.
    pub total_deductions: Decimal,
    /// Take-home pay: gross pay less deductions.
    pub nett_pay: Decimal,
    /// Gross pay plus employer contributions.
    pub cost_to_company: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a monthly payroll calculation.
///
/// Produced by [`calculate_payroll`](crate::calculation::calculate_payroll)
/// and owned by the caller; nothing in the engine keeps a reference to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Employee name carried from the input.
    pub employee_name: String,
    /// Company name carried from the input.
    pub company_name: String,
    /// Period label carried from the input.
    pub period: String,
    /// The tax year whose table was used.
    pub tax_year: ResolvedTaxYear,
    /// Income components.
    pub income: IncomeSection,
    /// Fringe benefit components.
    pub fringe_benefits: FringeBenefitsSection,
    /// PAYE calculation.
    pub tax: TaxSection,
    /// Employee deductions.
    pub deductions: DeductionsSection,
    /// Employer contributions.
    pub employer_contributions: EmployerContributionsSection,
    /// Headline figures.
    pub summary: PayrollSummary,
    /// Audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_bracket_contribution_serializes_amounts_as_strings() {
        let contribution = BracketContribution {
            range: "R0 - R255 000".to_string(),
            rate: dec("0.18"),
            rate_label: "18%".to_string(),
            taxable_amount: dec("255000"),
            tax_amount: dec("45900.00"),
        };

        let json = serde_json::to_value(&contribution).unwrap();
        assert_eq!(json["range"], "R0 - R255 000");
        assert_eq!(json["rate"], "0.18");
        assert_eq!(json["rate_label"], "18%");
        assert_eq!(json["tax_amount"], "45900.00");
    }

    #[test]
    fn test_summary_deserialization() {
        let json = r#"{
            "gross_pay": "97995",
            "total_deductions": "53742.815833",
            "nett_pay": "44252.184167",
            "cost_to_company": "99152.07"
        }"#;

        let summary: PayrollSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.gross_pay, dec("97995"));
        assert_eq!(
            summary.gross_pay - summary.total_deductions,
            summary.nett_pay
        );
    }

    #[test]
    fn test_resolved_tax_year_keeps_requested_key() {
        let resolved = ResolvedTaxYear {
            requested: Some(YearKey::Year(1999)),
            year: 2026,
            label: "2026/2027".to_string(),
            fell_back: true,
        };

        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["requested"], 1999);
        assert_eq!(json["year"], 2026);
        assert_eq!(json["fell_back"], true);
    }

    #[test]
    fn test_audit_trace_defaults_empty() {
        let trace = AuditTrace::default();
        assert!(trace.steps.is_empty());
        assert!(trace.warnings.is_empty());
    }
}
