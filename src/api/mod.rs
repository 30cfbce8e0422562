//! HTTP API module for the payroll engine.
//!
//! This module provides the REST API endpoints for calculating a monthly
//! South African payslip and listing the supported tax years.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculationRequest, FormCalculationRequest};
pub use response::{ApiError, ApiErrorResponse, CalculationResponse, TaxYearsResponse};
pub use state::AppState;
