//! Payroll input model.
//!
//! This module defines the [`PayrollInput`] record: the salary components a
//! caller enters for one month, grouped into income, fringe benefits,
//! employee contributions and employer contributions.

use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::config::YearKey;

/// The raw components of one monthly payroll calculation.
///
/// Every monetary field defaults to zero when it is absent or cannot be
/// parsed. Negative values are accepted here and rejected by
/// [`validate_input`](crate::calculation::validate_input).
///
/// # Example
///
/// ```
/// use paye_engine::models::PayrollInput;
/// use rust_decimal::Decimal;
///
/// let input: PayrollInput = serde_json::from_str(r#"{
///     "basic_salary": "25000",
///     "travel_allowance": 1500,
///     "tax_year": 2026
/// }"#).unwrap();
///
/// assert_eq!(input.basic_salary, Decimal::new(25000, 0));
/// assert_eq!(input.overtime, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollInput {
    /// Name printed on the payslip.
    pub employee_name: String,
    /// Employer name printed on the payslip.
    pub company_name: String,
    /// Free-text pay period label (e.g. "March 2026").
    pub period: String,
    /// Tax year selector; `None` uses the registry default.
    pub tax_year: Option<YearKey>,

    /// Basic monthly salary.
    #[serde(deserialize_with = "lenient_amount")]
    pub basic_salary: Decimal,
    /// Overtime pay.
    #[serde(deserialize_with = "lenient_amount")]
    pub overtime: Decimal,
    /// Annual bonus paid this month.
    #[serde(deserialize_with = "lenient_amount")]
    pub annual_bonus: Decimal,
    /// Any other bonus.
    #[serde(deserialize_with = "lenient_amount")]
    pub other_bonus: Decimal,
    /// Subsistence allowance.
    #[serde(deserialize_with = "lenient_amount")]
    pub subsistence_allowance: Decimal,
    /// Travel allowance.
    #[serde(deserialize_with = "lenient_amount")]
    pub travel_allowance: Decimal,
    /// Any other allowances.
    #[serde(deserialize_with = "lenient_amount")]
    pub other_allowances: Decimal,

    /// Taxable value of the right of use of a company car.
    #[serde(deserialize_with = "lenient_amount")]
    pub company_car_benefit: Decimal,
    /// Taxable portion of the travel allowance.
    #[serde(deserialize_with = "lenient_amount")]
    pub taxable_travel_portion: Decimal,
    /// Employer medical aid contributions taxed as a fringe benefit.
    #[serde(deserialize_with = "lenient_amount")]
    pub medical_aid_fringe_benefit: Decimal,
    /// Employer provident fund contributions taxed as a fringe benefit.
    #[serde(deserialize_with = "lenient_amount")]
    pub provident_fund_fringe_benefit: Decimal,
    /// Any other fringe benefits.
    #[serde(deserialize_with = "lenient_amount")]
    pub other_fringe_benefits: Decimal,

    /// Employee share of medical aid.
    #[serde(deserialize_with = "lenient_amount")]
    pub medical_aid_employee: Decimal,
    /// Employee share of provident fund.
    #[serde(deserialize_with = "lenient_amount")]
    pub provident_fund_employee: Decimal,
    /// Retirement annuity contribution.
    #[serde(deserialize_with = "lenient_amount")]
    pub retirement_annuity: Decimal,
    /// Medical aid dependents, excluding the main member.
    #[serde(deserialize_with = "lenient_count")]
    pub medical_aid_dependents: i32,

    /// Employer share of medical aid.
    #[serde(deserialize_with = "lenient_amount")]
    pub medical_aid_employer: Decimal,
    /// Employer share of provident fund.
    #[serde(deserialize_with = "lenient_amount")]
    pub provident_fund_employer: Decimal,
}

impl PayrollInput {
    /// Returns the income components with their field names.
    pub fn income_components(&self) -> [(&'static str, Decimal); 7] {
        [
            ("basic_salary", self.basic_salary),
            ("overtime", self.overtime),
            ("annual_bonus", self.annual_bonus),
            ("other_bonus", self.other_bonus),
            ("subsistence_allowance", self.subsistence_allowance),
            ("travel_allowance", self.travel_allowance),
            ("other_allowances", self.other_allowances),
        ]
    }

    /// Returns the fringe benefit components with their field names.
    pub fn fringe_benefit_components(&self) -> [(&'static str, Decimal); 5] {
        [
            ("company_car_benefit", self.company_car_benefit),
            ("taxable_travel_portion", self.taxable_travel_portion),
            ("medical_aid_fringe_benefit", self.medical_aid_fringe_benefit),
            ("provident_fund_fringe_benefit", self.provident_fund_fringe_benefit),
            ("other_fringe_benefits", self.other_fringe_benefits),
        ]
    }

    /// Returns the employee contribution components with their field names.
    pub fn employee_contribution_components(&self) -> [(&'static str, Decimal); 3] {
        [
            ("medical_aid_employee", self.medical_aid_employee),
            ("provident_fund_employee", self.provident_fund_employee),
            ("retirement_annuity", self.retirement_annuity),
        ]
    }

    /// Returns the employer contribution components with their field names.
    pub fn employer_contribution_components(&self) -> [(&'static str, Decimal); 2] {
        [
            ("medical_aid_employer", self.medical_aid_employer),
            ("provident_fund_employer", self.provident_fund_employer),
        ]
    }

    /// Returns every monetary field with its name, in declaration order.
    pub fn monetary_fields(&self) -> Vec<(&'static str, Decimal)> {
        self.income_components()
            .into_iter()
            .chain(self.fringe_benefit_components())
            .chain(self.employee_contribution_components())
            .chain(self.employer_contribution_components())
            .collect()
    }

    /// Builds an input from raw form fields.
    ///
    /// Values are trimmed, thousands separators and a leading `R` are
    /// stripped, and anything that still fails to parse becomes zero.
    /// Unknown field names are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use paye_engine::models::PayrollInput;
    /// use rust_decimal::Decimal;
    ///
    /// let input = PayrollInput::from_form_fields([
    ///     ("basic_salary", "R 76,135"),
    ///     ("overtime", "not a number"),
    ///     ("medical_aid_dependents", "2"),
    /// ]);
    ///
    /// assert_eq!(input.basic_salary, Decimal::new(76135, 0));
    /// assert_eq!(input.overtime, Decimal::ZERO);
    /// assert_eq!(input.medical_aid_dependents, 2);
    /// ```
    pub fn from_form_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut input = Self::default();
        for (name, value) in fields {
            input.set_form_field(name.as_ref(), value.as_ref());
        }
        input
    }

    fn set_form_field(&mut self, name: &str, value: &str) {
        let slot = match name {
            "employee_name" => {
                self.employee_name = value.trim().to_string();
                return;
            }
            "company_name" => {
                self.company_name = value.trim().to_string();
                return;
            }
            "period" => {
                self.period = value.trim().to_string();
                return;
            }
            "tax_year" => {
                let value = value.trim();
                self.tax_year = (!value.is_empty()).then(|| YearKey::from(value));
                return;
            }
            "medical_aid_dependents" => {
                self.medical_aid_dependents = parse_count(value);
                return;
            }
            "basic_salary" => &mut self.basic_salary,
            "overtime" => &mut self.overtime,
            "annual_bonus" => &mut self.annual_bonus,
            "other_bonus" => &mut self.other_bonus,
            "subsistence_allowance" => &mut self.subsistence_allowance,
            "travel_allowance" => &mut self.travel_allowance,
            "other_allowances" => &mut self.other_allowances,
            "company_car_benefit" => &mut self.company_car_benefit,
            "taxable_travel_portion" => &mut self.taxable_travel_portion,
            "medical_aid_fringe_benefit" => &mut self.medical_aid_fringe_benefit,
            "provident_fund_fringe_benefit" => &mut self.provident_fund_fringe_benefit,
            "other_fringe_benefits" => &mut self.other_fringe_benefits,
            "medical_aid_employee" => &mut self.medical_aid_employee,
            "provident_fund_employee" => &mut self.provident_fund_employee,
            "retirement_annuity" => &mut self.retirement_annuity,
            "medical_aid_employer" => &mut self.medical_aid_employer,
            "provident_fund_employer" => &mut self.provident_fund_employer,
            _ => {
                debug!(field = %name, "Ignoring unknown payroll field");
                return;
            }
        };
        *slot = parse_amount(value);
    }
}

/// Normalizes a monetary string: trims, drops a leading `R` and removes
/// thousands separators.
fn normalize_amount_input(s: &str) -> String {
    let trimmed = s.trim();
    let without_symbol = trimmed
        .strip_prefix('R')
        .or_else(|| trimmed.strip_prefix('r'))
        .unwrap_or(trimmed);
    without_symbol
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect()
}

/// Parses a monetary string, treating empty or invalid input as zero.
fn parse_amount(s: &str) -> Decimal {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    normalized.parse().unwrap_or_else(|e| {
        debug!(input = %s, "Unparseable amount treated as zero: {}", e);
        Decimal::ZERO
    })
}

/// Parses a whole count, treating empty or invalid input as zero.
fn parse_count(s: &str) -> i32 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0;
    }
    trimmed.parse().unwrap_or_else(|e| {
        debug!(input = %s, "Unparseable count treated as zero: {}", e);
        0
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(Decimal),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawAmount>::deserialize(deserializer)? {
        Some(RawAmount::Number(amount)) => amount,
        Some(RawAmount::Text(text)) => parse_amount(&text),
        Some(RawAmount::Other(_)) => {
            debug!("Unrepresentable amount treated as zero");
            Decimal::ZERO
        }
        None => Decimal::ZERO,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(i64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_count<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawCount>::deserialize(deserializer)? {
        Some(RawCount::Number(count)) => i32::try_from(count).unwrap_or_else(|_| {
            debug!(count, "Out-of-range count treated as zero");
            0
        }),
        Some(RawCount::Text(text)) => parse_count(&text),
        Some(RawCount::Other(_)) => {
            debug!("Non-integer count treated as zero");
            0
        }
        None => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_absent_fields_default_to_zero() {
        let input: PayrollInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input, PayrollInput::default());
        assert!(input.monetary_fields().iter().all(|(_, v)| v.is_zero()));
        assert_eq!(input.medical_aid_dependents, 0);
        assert!(input.tax_year.is_none());
    }

    #[test]
    fn test_deserialize_numbers_and_strings() {
        let json = r#"{
            "employee_name": "T. Mokoena",
            "basic_salary": 76135,
            "overtime": "4000",
            "travel_allowance": 4500.50,
            "medical_aid_dependents": 2,
            "tax_year": "2025"
        }"#;

        let input: PayrollInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.employee_name, "T. Mokoena");
        assert_eq!(input.basic_salary, dec("76135"));
        assert_eq!(input.overtime, dec("4000"));
        assert_eq!(input.travel_allowance, dec("4500.50"));
        assert_eq!(input.medical_aid_dependents, 2);
        assert_eq!(input.tax_year, Some(YearKey::Label("2025".to_string())));
    }

    #[test]
    fn test_unparseable_amounts_become_zero() {
        let json = r#"{
            "basic_salary": "lots",
            "overtime": null,
            "other_bonus": "",
            "medical_aid_dependents": "two"
        }"#;

        let input: PayrollInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.basic_salary, Decimal::ZERO);
        assert_eq!(input.overtime, Decimal::ZERO);
        assert_eq!(input.other_bonus, Decimal::ZERO);
        assert_eq!(input.medical_aid_dependents, 0);
    }

    #[test]
    fn test_unrepresentable_values_become_zero() {
        let json = r#"{
            "basic_salary": 20000,
            "overtime": 1e30,
            "annual_bonus": true,
            "medical_aid_dependents": 2.5,
            "tax_year": 3000000000
        }"#;

        let input: PayrollInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.basic_salary, dec("20000"));
        assert_eq!(input.overtime, Decimal::ZERO);
        assert_eq!(input.annual_bonus, Decimal::ZERO);
        assert_eq!(input.medical_aid_dependents, 0);
        assert_eq!(input.tax_year.as_ref().and_then(YearKey::year), None);
    }

    #[test]
    fn test_formatted_amount_strings_are_accepted() {
        let json = r#"{ "basic_salary": "R 76,135.00", "overtime": "1 500" }"#;

        let input: PayrollInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.basic_salary, dec("76135"));
        assert_eq!(input.overtime, dec("1500"));
    }

    #[test]
    fn test_negative_values_are_kept_for_validation() {
        let json = r#"{ "overtime": -10, "medical_aid_dependents": -1 }"#;

        let input: PayrollInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.overtime, dec("-10"));
        assert_eq!(input.medical_aid_dependents, -1);
    }

    #[test]
    fn test_from_form_fields() {
        let input = PayrollInput::from_form_fields([
            ("employee_name", "  Jane Doe "),
            ("basic_salary", "76135"),
            ("retirement_annuity", "1,250.75"),
            ("tax_year", "2024"),
            ("favourite_colour", "blue"),
        ]);

        assert_eq!(input.employee_name, "Jane Doe");
        assert_eq!(input.basic_salary, dec("76135"));
        assert_eq!(input.retirement_annuity, dec("1250.75"));
        assert_eq!(input.tax_year.as_ref().and_then(YearKey::year), Some(2024));
    }

    #[test]
    fn test_from_form_fields_blank_tax_year_is_none() {
        let input = PayrollInput::from_form_fields([("tax_year", "  ")]);
        assert!(input.tax_year.is_none());
    }

    #[test]
    fn test_monetary_fields_cover_every_component() {
        let input = PayrollInput::default();
        let names: Vec<&str> = input.monetary_fields().iter().map(|(n, _)| *n).collect();
        assert_eq!(names.len(), 17);
        assert_eq!(names[0], "basic_salary");
        assert_eq!(names[16], "provident_fund_employer");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("  123.45  "), dec("123.45"));
        assert_eq!(parse_amount("r99"), dec("99"));
        assert_eq!(parse_amount("-5"), dec("-5"));
        assert_eq!(parse_amount("12abc"), Decimal::ZERO);
        assert_eq!(parse_amount(""), Decimal::ZERO);
    }
}
