//! Core data models for the payroll engine.
//!
//! This module contains the input record and the result tree exchanged
//! with callers of the engine.

mod payroll_input;
mod payroll_result;

pub use payroll_input::PayrollInput;
pub use payroll_result::{
    AuditStep, AuditTrace, AuditWarning, BracketContribution, DeductionsSection,
    EmployerContributionsSection, FringeBenefitsSection, IncomeSection, PayrollResult,
    PayrollSummary, ResolvedTaxYear, TaxSection,
};
