//! Monthly payroll engine for South African employees' tax.
//!
//! This crate calculates a monthly payslip from salary components: PAYE on
//! the progressive SARS brackets with the primary rebate and the medical
//! aid tax credit, UIF and SDL, nett pay and cost to company. Tax tables are
//! loaded from YAML and every calculation carries an audit trace.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
