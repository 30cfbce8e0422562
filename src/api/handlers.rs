//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Form, Json, Router,
    extract::{
        State,
        rejection::{FormRejection, JsonRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_payroll;
use crate::models::PayrollInput;

use super::request::{CalculationRequest, FormCalculationRequest};
use super::response::{ApiError, ApiErrorResponse, CalculationResponse, TaxYearsResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/calculate/form", post(calculate_form_handler))
        .route("/tax-years", get(tax_years_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a JSON payroll input and returns the calculated payslip.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    ApiError::malformed_json(body_text)
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    run_calculation(&state, &input, correlation_id)
}

/// Handler for POST /calculate/form endpoint.
///
/// Accepts the same fields as `/calculate` as a urlencoded form, with
/// formatted amounts such as `R 12,500.00` allowed.
async fn calculate_form_handler(
    State(state): State<AppState>,
    payload: Result<Form<FormCalculationRequest>, FormRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing form calculation request");

    let input: PayrollInput = match payload {
        Ok(Form(form)) => form.into(),
        Err(rejection) => {
            let error = match rejection {
                FormRejection::InvalidFormContentType(_) => ApiError::new(
                    "MISSING_CONTENT_TYPE",
                    "Content-Type must be application/x-www-form-urlencoded",
                ),
                other => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %other.body_text(),
                        "Form body error"
                    );
                    ApiError::malformed_form(other.body_text())
                }
            };
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    run_calculation(&state, &input, correlation_id)
}

/// Handler for GET /tax-years endpoint.
async fn tax_years_handler(State(state): State<AppState>) -> Response {
    let registry = state.registry();
    json_response(
        StatusCode::OK,
        TaxYearsResponse {
            default_year: registry.default_year(),
            tax_years: registry.available_tax_years(),
        },
    )
}

/// Runs the engine and wraps the result in the response envelope.
fn run_calculation(state: &AppState, input: &PayrollInput, correlation_id: Uuid) -> Response {
    let start_time = Instant::now();
    match calculate_payroll(input, state.registry()) {
        Ok(result) => {
            let duration_us = start_time.elapsed().as_micros() as u64;
            if result.tax_year.fell_back {
                warn!(
                    correlation_id = %correlation_id,
                    used_year = result.tax_year.year,
                    "Requested tax year unavailable, default used"
                );
            }
            info!(
                correlation_id = %correlation_id,
                tax_year = result.tax_year.year,
                gross_pay = %result.summary.gross_pay,
                nett_pay = %result.summary.nett_pay,
                duration_us,
                "Calculation completed successfully"
            );
            json_response(
                StatusCode::OK,
                CalculationResponse {
                    calculation_id: correlation_id,
                    timestamp: Utc::now(),
                    engine_version: env!("CARGO_PKG_VERSION").to_string(),
                    duration_us,
                    result,
                },
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation rejected"
            );
            error_response(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use axum::{body::Body, http::Request};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let registry = ConfigLoader::load("./config/sars").expect("Failed to load config");
        AppState::new(registry)
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_api_001_valid_request_returns_200() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json(
                "/calculate",
                r#"{ "employee_name": "Jane Doe", "basic_salary": "20000", "tax_year": 2026 }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let envelope: CalculationResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(envelope.engine_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(envelope.result.employee_name, "Jane Doe");
        assert_eq!(envelope.result.summary.gross_pay, dec("20000"));
        assert_eq!(envelope.result.deductions.uif, dec("177.12"));
    }

    #[tokio::test]
    async fn test_api_002_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/calculate", "{invalid json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert_eq!(error["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_api_003_missing_content_type_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/calculate")
                    .body(Body::from(r#"{ "basic_salary": 1000 }"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert_eq!(error["code"], "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_api_004_validation_failure_returns_422() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json(
                "/calculate",
                r#"{ "overtime": -50, "medical_aid_dependents": -1 }"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error = body_json(response).await;
        assert_eq!(error["code"], "VALIDATION_ERROR");
        assert_eq!(
            error["errors"],
            serde_json::json!([
                "Please enter at least one income component.",
                "overtime cannot be negative.",
                "medical_aid_dependents cannot be negative."
            ])
        );
    }

    #[tokio::test]
    async fn test_api_005_form_submission() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/calculate/form")
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(Body::from("basic_salary=R+15%2C000&tax_year=2025&overtime="))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["result"]["income"]["total"], "15000");
        assert_eq!(body["result"]["tax_year"]["year"], 2025);
    }

    #[tokio::test]
    async fn test_api_006_form_without_content_type_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/calculate/form")
                    .body(Body::from("basic_salary=15000"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert_eq!(error["code"], "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_api_007_tax_years() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/tax-years")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["default_year"], 2026);
        assert_eq!(
            body["tax_years"],
            serde_json::json!([
                { "value": 2024, "label": "2024/2025" },
                { "value": 2025, "label": "2025/2026" },
                { "value": 2026, "label": "2026/2027" }
            ])
        );
    }
}
