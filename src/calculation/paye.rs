//! PAYE bracket calculation.
//!
//! This module implements the progressive-bracket income tax calculation:
//! monthly taxable income is annualised, walked through the year's brackets,
//! reduced by the primary rebate and brought back to a monthly figure.

use rust_decimal::Decimal;

use crate::config::TaxTable;
use crate::format::{format_boundary, format_percent, format_rand};
use crate::models::{AuditStep, BracketContribution};

/// Pay periods in a tax year.
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// The result of a PAYE calculation, including the bracket breakdown and audit step.
///
/// Monthly figures unless the field name says otherwise.
#[derive(Debug, Clone)]
pub struct PayeResult {
    /// Monthly taxable income x 12.
    pub annual_taxable_income: Decimal,
    /// Annual tax after the primary rebate, floored at zero.
    pub annual_tax: Decimal,
    /// Tax before the primary rebate.
    pub gross_tax: Decimal,
    /// Monthly share of the primary rebate.
    pub rebate: Decimal,
    /// Tax after the primary rebate.
    pub net_tax: Decimal,
    /// Brackets touched by the annual income, ascending.
    pub brackets: Vec<BracketContribution>,
    /// `net_tax` as a percentage of monthly taxable income.
    ///
    /// Diagnostic only: the figure reported on a payslip is the post-credit
    /// rate computed by [`calculate_payroll`](super::calculate_payroll).
    pub effective_rate: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn range_label(min: Decimal, max: Option<Decimal>) -> String {
    match max {
        Some(max) => format!("{} - {}", format_boundary(min), format_boundary(max)),
        None => format!("{} - R∞", format_boundary(min)),
    }
}

/// Calculates PAYE on a monthly taxable income.
///
/// The income is annualised and each bracket whose lower bound it exceeds
/// contributes `min(income - min, max - min) * rate`. The bracket that
/// contains the income supplies the annual tax directly as its published
/// cumulative base plus that contribution, so earlier brackets are never
/// re-summed. The primary rebate is then subtracted, floored at zero, and
/// every figure is divided by 12.
///
/// # Arguments
///
/// * `monthly_taxable_income` - Gross income plus fringe benefits for the month
/// * `table` - The tax table for the year
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::compute_paye;
/// use paye_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let registry = ConfigLoader::builtin()?;
/// let result = compute_paye(Decimal::new(30000, 0), registry.resolve(2026), 1);
///
/// // 360 000 a year: 45 900 + (360 000 - 255 001) x 26% = 73 199.74
/// // less the 17 235 rebate = 55 964.74 a year
/// assert_eq!(result.annual_tax, Decimal::new(5596474, 2));
/// assert_eq!(result.brackets.len(), 2);
/// # Ok::<(), paye_engine::error::EngineError>(())
/// ```
pub fn compute_paye(
    monthly_taxable_income: Decimal,
    table: &TaxTable,
    step_number: u32,
) -> PayeResult {
    let annual_taxable_income = monthly_taxable_income * MONTHS_PER_YEAR;

    let mut annual_tax = Decimal::ZERO;
    let mut brackets = Vec::new();

    for bracket in &table.brackets {
        if annual_taxable_income <= bracket.min {
            break;
        }

        let above_min = annual_taxable_income - bracket.min;
        let taxable_in_bracket = match bracket.span() {
            Some(span) => above_min.min(span),
            None => above_min,
        };
        let tax_in_bracket = taxable_in_bracket * bracket.rate;
        annual_tax = bracket.cumulative_base + tax_in_bracket;

        brackets.push(BracketContribution {
            range: range_label(bracket.min, bracket.max),
            rate: bracket.rate,
            rate_label: format_percent(bracket.rate),
            taxable_amount: taxable_in_bracket,
            tax_amount: tax_in_bracket,
        });

        if bracket.contains(annual_taxable_income) {
            break;
        }
    }

    let annual_tax_before_rebate = annual_tax;
    let annual_rebate = table.primary_rebate;
    let annual_tax = (annual_tax_before_rebate - annual_rebate).max(Decimal::ZERO);

    let gross_tax = (annual_tax + annual_rebate) / MONTHS_PER_YEAR;
    let rebate = annual_rebate / MONTHS_PER_YEAR;
    let net_tax = annual_tax / MONTHS_PER_YEAR;

    let effective_rate = if monthly_taxable_income.is_zero() {
        Decimal::ZERO
    } else {
        net_tax / monthly_taxable_income * Decimal::ONE_HUNDRED
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "paye_brackets".to_string(),
        rule_name: "PAYE Progressive Brackets".to_string(),
        input: serde_json::json!({
            "monthly_taxable_income": monthly_taxable_income.to_string(),
            "annual_taxable_income": annual_taxable_income.to_string(),
            "tax_year": table.label
        }),
        output: serde_json::json!({
            "annual_tax_before_rebate": annual_tax_before_rebate.to_string(),
            "annual_rebate": annual_rebate.to_string(),
            "annual_tax": annual_tax.to_string(),
            "monthly_net_tax": net_tax.to_string(),
            "brackets_touched": brackets.len()
        }),
        reasoning: format!(
            "{} a year taxed across {} bracket(s) = {}, less primary rebate {} = {} ({} a month)",
            format_rand(annual_taxable_income),
            brackets.len(),
            format_rand(annual_tax_before_rebate),
            format_rand(annual_rebate),
            format_rand(annual_tax),
            format_rand(net_tax)
        ),
    };

    PayeResult {
        annual_taxable_income,
        annual_tax,
        gross_tax,
        rebate,
        net_tax,
        brackets,
        effective_rate,
        audit_step,
    }
}
