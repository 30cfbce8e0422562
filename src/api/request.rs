//! Request types for the payroll engine API.
//!
//! JSON bodies map straight onto [`PayrollInput`]; form submissions arrive
//! as raw name/value pairs and go through the same lenient parsing a web
//! form would need.

use serde::Deserialize;

use crate::models::PayrollInput;

/// Request body for the `/calculate` endpoint.
///
/// Amounts may be JSON numbers or numeric strings; absent fields are zero.
pub type CalculationRequest = PayrollInput;

/// Request body for the `/calculate/form` endpoint.
///
/// Holds the raw `application/x-www-form-urlencoded` pairs in submission
/// order. A repeated field keeps its last value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FormCalculationRequest(
    /// Field name and raw value pairs.
    pub Vec<(String, String)>,
);

impl From<FormCalculationRequest> for PayrollInput {
    fn from(req: FormCalculationRequest) -> Self {
        PayrollInput::from_form_fields(req.0)
    }
}
