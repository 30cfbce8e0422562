//! Monthly payroll aggregation.
//!
//! Combines the individual calculators into a complete [`PayrollResult`]:
//! UIF, the medical aid credit, PAYE, SDL and finally the summary figures.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{TaxTable, TaxTableRegistry};
use crate::error::EngineResult;
use crate::format::format_rand;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, DeductionsSection, EmployerContributionsSection,
    FringeBenefitsSection, IncomeSection, PayrollInput, PayrollResult, PayrollSummary,
    ResolvedTaxYear, TaxSection,
};

use super::medical_aid_credit::calculate_medical_aid_credit;
use super::paye::compute_paye;
use super::sdl::calculate_sdl;
use super::uif::calculate_uif;
use super::validation::validate_input;

/// Warning code recorded when the requested tax year is not registered.
pub const TAX_YEAR_FALLBACK: &str = "TAX_YEAR_FALLBACK";

fn sum(components: &[(&'static str, Decimal)]) -> Decimal {
    components.iter().map(|(_, amount)| *amount).sum()
}

/// Validates an input, resolves its tax year and calculates the payroll.
///
/// An absent `tax_year` uses the registry default; an unknown one falls
/// back to the default with a `TAX_YEAR_FALLBACK` warning in the trace.
///
/// # Errors
///
/// Returns [`EngineError::ValidationFailed`](crate::error::EngineError::ValidationFailed)
/// if the input is rejected by [`validate_input`].
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::calculate_payroll;
/// use paye_engine::config::ConfigLoader;
/// use paye_engine::models::PayrollInput;
/// use rust_decimal::Decimal;
///
/// let registry = ConfigLoader::builtin()?;
/// let input = PayrollInput {
///     basic_salary: Decimal::new(15000, 0),
///     ..Default::default()
/// };
///
/// let result = calculate_payroll(&input, &registry)?;
/// assert_eq!(result.tax_year.year, 2026);
/// assert_eq!(result.deductions.uif, Decimal::new(150, 0));
/// assert_eq!(
///     result.summary.nett_pay,
///     result.summary.gross_pay - result.summary.total_deductions
/// );
/// # Ok::<(), paye_engine::error::EngineError>(())
/// ```
pub fn calculate_payroll(
    input: &PayrollInput,
    registry: &TaxTableRegistry,
) -> EngineResult<PayrollResult> {
    validate_input(input)?;

    let (table, fell_back) = match &input.tax_year {
        Some(key) => match registry.get(key.clone()) {
            Some(table) => (table, false),
            None => (registry.resolve(key.clone()), true),
        },
        None => (registry.default_table(), false),
    };

    Ok(aggregate(input, table, fell_back))
}

/// Calculates the payroll against a table the caller has already chosen.
///
/// No validation is performed; a negative dependent count is treated as
/// zero. The requested `tax_year` is echoed in the result but never
/// compared with `table`, so no fallback warning is recorded.
///
/// # Panics
///
/// Amounts above [`MAX_AMOUNT`](super::MAX_AMOUNT) can overflow
/// [`Decimal`]; run [`validate_input`] first for untrusted input.
pub fn compute_payroll(input: &PayrollInput, table: &TaxTable) -> PayrollResult {
    aggregate(input, table, false)
}

fn aggregate(input: &PayrollInput, table: &TaxTable, fell_back: bool) -> PayrollResult {
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    if let Some(key) = input.tax_year.as_ref().filter(|_| fell_back) {
        warnings.push(AuditWarning {
            code: TAX_YEAR_FALLBACK.to_string(),
            message: format!(
                "Tax year '{}' is not available; using {} instead",
                key, table.label
            ),
            severity: "medium".to_string(),
        });
    }

    let income_components = input.income_components();
    let fringe_components = input.fringe_benefit_components();
    let gross_income = sum(&income_components);
    let total_fringe_benefits = sum(&fringe_components);
    let taxable_income = gross_income + total_fringe_benefits;

    let uif = calculate_uif(gross_income, table, step_number);
    steps.push(uif.audit_step);
    step_number += 1;

    let dependents = u32::try_from(input.medical_aid_dependents).unwrap_or(0);
    let medical = calculate_medical_aid_credit(dependents, table, step_number);
    steps.push(medical.audit_step);
    step_number += 1;

    let paye = compute_paye(taxable_income, table, step_number);
    steps.push(paye.audit_step);
    step_number += 1;

    let sdl = calculate_sdl(gross_income, table, step_number);
    steps.push(sdl.audit_step);
    step_number += 1;

    // The credit reduces tax only; it never turns into a refund.
    let paye_tax = (paye.net_tax - medical.credit).max(Decimal::ZERO);
    let effective_rate = if taxable_income.is_zero() {
        Decimal::ZERO
    } else {
        paye_tax / taxable_income * Decimal::ONE_HUNDRED
    };

    let total_deductions = paye_tax
        + uif.employee
        + input.medical_aid_employee
        + input.provident_fund_employee
        + input.retirement_annuity;
    // Fringe benefits are taxed but never paid out in cash.
    let nett_pay = gross_income - total_deductions;

    let total_employer_contributions = input.medical_aid_employer
        + input.provident_fund_employer
        + uif.employer
        + sdl.levy;
    let cost_to_company = gross_income + total_employer_contributions;

    steps.push(AuditStep {
        step_number,
        rule_id: "payroll_summary".to_string(),
        rule_name: "Payroll Summary".to_string(),
        input: serde_json::json!({
            "gross_income": gross_income.to_string(),
            "total_fringe_benefits": total_fringe_benefits.to_string(),
            "net_tax": paye.net_tax.to_string(),
            "medical_aid_tax_credit": medical.credit.to_string()
        }),
        output: serde_json::json!({
            "paye_tax": paye_tax.to_string(),
            "total_deductions": total_deductions.to_string(),
            "nett_pay": nett_pay.to_string(),
            "cost_to_company": cost_to_company.to_string()
        }),
        reasoning: format!(
            "Gross {} less deductions {} = nett {}; cost to company {}",
            format_rand(gross_income),
            format_rand(total_deductions),
            format_rand(nett_pay),
            format_rand(cost_to_company)
        ),
    });

    debug!(
        tax_year = table.year,
        gross_income = %gross_income,
        taxable_income = %taxable_income,
        paye_tax = %paye_tax,
        nett_pay = %nett_pay,
        "Payroll calculated"
    );

    PayrollResult {
        employee_name: input.employee_name.clone(),
        company_name: input.company_name.clone(),
        period: input.period.clone(),
        tax_year: ResolvedTaxYear {
            requested: input.tax_year.clone(),
            year: table.year,
            label: table.label.clone(),
            fell_back,
        },
        income: IncomeSection {
            basic_salary: input.basic_salary,
            overtime: input.overtime,
            annual_bonus: input.annual_bonus,
            other_bonus: input.other_bonus,
            subsistence_allowance: input.subsistence_allowance,
            travel_allowance: input.travel_allowance,
            other_allowances: input.other_allowances,
            total: gross_income,
        },
        fringe_benefits: FringeBenefitsSection {
            company_car_benefit: input.company_car_benefit,
            taxable_travel_portion: input.taxable_travel_portion,
            medical_aid_fringe_benefit: input.medical_aid_fringe_benefit,
            provident_fund_fringe_benefit: input.provident_fund_fringe_benefit,
            other_fringe_benefits: input.other_fringe_benefits,
            total: total_fringe_benefits,
        },
        tax: TaxSection {
            taxable_income,
            annual_taxable_income: paye.annual_taxable_income,
            gross_tax: paye.gross_tax,
            primary_rebate: paye.rebate,
            medical_aid_tax_credit: medical.credit,
            paye_tax,
            effective_rate,
            brackets: paye.brackets,
        },
        deductions: DeductionsSection {
            paye_tax,
            uif: uif.employee,
            medical_aid_employee: input.medical_aid_employee,
            provident_fund_employee: input.provident_fund_employee,
            retirement_annuity: input.retirement_annuity,
            total: total_deductions,
        },
        employer_contributions: EmployerContributionsSection {
            medical_aid_employer: input.medical_aid_employer,
            provident_fund_employer: input.provident_fund_employer,
            uif_employer: uif.employer,
            sdl: sdl.levy,
            total: total_employer_contributions,
        },
        summary: PayrollSummary {
            gross_pay: gross_income,
            total_deductions,
            nett_pay,
            cost_to_company,
        },
        audit_trace: AuditTrace { steps, warnings },
    }
}
