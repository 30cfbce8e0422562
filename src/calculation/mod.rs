//! Calculation logic for the payroll engine.
//!
//! This module contains the calculation functions for a monthly payslip:
//! input validation, progressive-bracket PAYE, the medical aid tax credit,
//! UIF and SDL, and the aggregation that combines them into a
//! [`PayrollResult`](crate::models::PayrollResult).

mod medical_aid_credit;
mod paye;
mod payroll;
mod sdl;
mod uif;
mod validation;

pub use medical_aid_credit::{MedicalAidCreditResult, calculate_medical_aid_credit};
pub use paye::{PayeResult, compute_paye};
pub use payroll::{TAX_YEAR_FALLBACK, calculate_payroll, compute_payroll};
pub use sdl::{SdlResult, calculate_sdl};
pub use uif::{UifResult, calculate_uif};
pub use validation::{MAX_AMOUNT, NO_INCOME_MESSAGE, validate_input};
