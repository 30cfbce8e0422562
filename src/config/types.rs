//! Configuration types for statutory tax tables.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest drift tolerated between a published cumulative base and the
/// base re-derived from the previous bracket. SARS rounds to whole rand.
const CUMULATIVE_BASE_TOLERANCE: Decimal = Decimal::ONE;

/// Metadata about the statutory tables, read from `registry.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryMetadata {
    /// The human-readable name of the table publisher.
    pub name: String,
    /// URL to the official rate publication.
    pub source_url: String,
    /// The year used whenever a requested year is not registered.
    pub default_year: i32,
}

/// A single progressive tax bracket.
///
/// Boundaries are annual amounts. The final bracket has no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of the bracket.
    pub min: Decimal,
    /// Upper bound of the bracket, `None` for the open-ended top bracket.
    pub max: Option<Decimal>,
    /// Marginal rate applied within the bracket (e.g. 0.26).
    pub rate: Decimal,
    /// Published tax owed on all income below `min`.
    pub cumulative_base: Decimal,
}

impl TaxBracket {
    /// Returns true if `annual_income` does not exceed this bracket's upper bound.
    pub fn contains(&self, annual_income: Decimal) -> bool {
        self.max.is_none_or(|max| annual_income <= max)
    }

    /// Returns the width of the bracket, `None` for the open-ended bracket.
    pub fn span(&self) -> Option<Decimal> {
        self.max.map(|max| max - self.min)
    }
}

/// Monthly medical scheme fees tax credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalAidCredits {
    /// Credit for the main member.
    pub main_member: Decimal,
    /// Credit for the first dependent.
    pub first_dependent: Decimal,
    /// Credit for each dependent after the first.
    pub additional_dependents: Decimal,
}

/// The statutory parameters for one tax year.
///
/// Loaded once from `tax_years/<year>.yaml` and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTable {
    /// The calendar year the tax year starts in (e.g. 2026).
    pub year: i32,
    /// Display label (e.g. "2026/2027").
    pub label: String,
    /// Annual primary rebate.
    pub primary_rebate: Decimal,
    /// Annual secondary rebate (age 65 to 74).
    pub secondary_rebate: Decimal,
    /// Annual tertiary rebate (age 75 and older).
    pub tertiary_rebate: Decimal,
    /// Monthly medical aid tax credits.
    pub medical_aid_credit: MedicalAidCredits,
    /// Monthly ceiling on the UIF contribution.
    pub uif_cap: Decimal,
    /// UIF contribution rate on gross income.
    pub uif_rate: Decimal,
    /// Skills Development Levy rate on gross income.
    pub sdl_rate: Decimal,
    /// Progressive brackets in ascending order.
    pub brackets: Vec<TaxBracket>,
}

impl TaxTable {
    /// Checks the structural rules every statutory table must satisfy.
    ///
    /// Brackets must start at zero, be contiguous in whole rand steps, carry
    /// non-decreasing rates in `[0, 1]`, and end with exactly one open-ended
    /// bracket. Each published cumulative base must agree with the previous
    /// bracket within R1.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidTaxTable {
            year: self.year,
            message,
        };

        let Some(first) = self.brackets.first() else {
            return Err(invalid("table has no brackets".to_string()));
        };
        if !first.min.is_zero() {
            return Err(invalid(format!(
                "first bracket starts at {} instead of 0",
                first.min
            )));
        }
        if !first.cumulative_base.is_zero() {
            return Err(invalid(format!(
                "first bracket has cumulative base {} instead of 0",
                first.cumulative_base
            )));
        }

        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(invalid(format!(
                    "bracket {} has rate {} outside [0, 1]",
                    index, bracket.rate
                )));
            }
            if let Some(max) = bracket.max.filter(|max| *max < bracket.min) {
                return Err(invalid(format!(
                    "bracket {} ends at {} before it starts at {}",
                    index, max, bracket.min
                )));
            }
        }

        for (index, pair) in self.brackets.windows(2).enumerate() {
            let (lower, upper) = (&pair[0], &pair[1]);
            let Some(lower_max) = lower.max else {
                return Err(invalid(format!(
                    "bracket {} is open-ended but is not the last bracket",
                    index
                )));
            };
            if lower_max + Decimal::ONE != upper.min {
                return Err(invalid(format!(
                    "bracket {} ends at {} but bracket {} starts at {}",
                    index,
                    lower_max,
                    index + 1,
                    upper.min
                )));
            }
            if upper.rate < lower.rate {
                return Err(invalid(format!(
                    "bracket {} rate {} is lower than bracket {} rate {}",
                    index + 1,
                    upper.rate,
                    index,
                    lower.rate
                )));
            }
            let derived = lower.cumulative_base + (lower_max - lower.min) * lower.rate;
            if (derived - upper.cumulative_base).abs() > CUMULATIVE_BASE_TOLERANCE {
                return Err(invalid(format!(
                    "bracket {} cumulative base {} disagrees with derived {}",
                    index + 1,
                    upper.cumulative_base,
                    derived
                )));
            }
        }

        if self.brackets.last().is_some_and(|b| b.max.is_some()) {
            return Err(invalid("last bracket must be open-ended".to_string()));
        }

        let scalars = [
            ("primary_rebate", self.primary_rebate),
            ("secondary_rebate", self.secondary_rebate),
            ("tertiary_rebate", self.tertiary_rebate),
            ("uif_cap", self.uif_cap),
            ("medical_aid_credit.main_member", self.medical_aid_credit.main_member),
            (
                "medical_aid_credit.first_dependent",
                self.medical_aid_credit.first_dependent,
            ),
            (
                "medical_aid_credit.additional_dependents",
                self.medical_aid_credit.additional_dependents,
            ),
        ];
        for (name, value) in scalars {
            if value < Decimal::ZERO {
                return Err(invalid(format!("{} is negative", name)));
            }
        }
        for (name, rate) in [("uif_rate", self.uif_rate), ("sdl_rate", self.sdl_rate)] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(invalid(format!("{} {} is outside [0, 1]", name, rate)));
            }
        }

        Ok(())
    }
}

/// A tax year selector as supplied by a caller.
///
/// Accepts either a number (`2026`) or text (`"2026"`). Text is trimmed
/// before it is coerced to a year. Any other value, such as `2026.0` or a
/// number outside `i32`, is kept as given and never names a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearKey {
    /// A numeric year.
    Year(i32),
    /// A textual year that may or may not parse.
    Label(String),
    /// Any other value.
    Other(serde_json::Value),
}

impl YearKey {
    /// Coerces the key to a calendar year, if it names one.
    pub fn year(&self) -> Option<i32> {
        match self {
            YearKey::Year(year) => Some(*year),
            YearKey::Label(label) => label.trim().parse().ok(),
            YearKey::Other(_) => None,
        }
    }
}

impl fmt::Display for YearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearKey::Year(year) => write!(f, "{}", year),
            YearKey::Label(label) => write!(f, "{}", label),
            YearKey::Other(value) => write!(f, "{}", value),
        }
    }
}

impl From<i32> for YearKey {
    fn from(year: i32) -> Self {
        YearKey::Year(year)
    }
}

impl From<&str> for YearKey {
    fn from(label: &str) -> Self {
        YearKey::Label(label.to_string())
    }
}

impl From<String> for YearKey {
    fn from(label: String) -> Self {
        YearKey::Label(label)
    }
}

/// An entry in the list of selectable tax years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearOption {
    /// The registry key.
    pub value: i32,
    /// The display label.
    pub label: String,
}
