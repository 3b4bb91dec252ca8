//! Loan-application API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{Map, Value};

use crate::error::{ApiError, ApiResult};
use crate::models::{
    ApiResponse, ListApplicationsQuery, LoanApplication, SubmitApplicationResponse,
};
use crate::state::AppState;

/// Submit a new loan application.
///
/// The body is an open field mapping; `applicantEmail` is the only required
/// field (identity is trusted as passed, auth happens upstream). Any
/// client-supplied `status`, `applicationFeeStatus` or `createdAt` is
/// discarded by the service.
pub async fn submit_application(
    State(app_state): State<AppState>,
    Json(mut body): Json<Map<String, Value>>,
) -> ApiResult<Json<ApiResponse<SubmitApplicationResponse>>> {
    let applicant_email = match body.remove("applicantEmail") {
        Some(Value::String(email)) if !email.trim().is_empty() => email,
        _ => {
            return Err(ApiError::BadRequest(
                "applicantEmail is required".to_string(),
            ))
        }
    };

    let application = app_state
        .application_service
        .submit(body, applicant_email)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to submit application: {}", e)))?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(SubmitApplicationResponse { id: application.id }),
        error: None,
    }))
}

/// List applications, optionally filtered by status, most recent first
pub async fn list_applications(
    State(app_state): State<AppState>,
    Query(query): Query<ListApplicationsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<LoanApplication>>>> {
    let applications = app_state
        .application_service
        .list(query.status)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to list applications: {}", e)))?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(applications),
        error: None,
    }))
}

/// Borrower view: one applicant's applications. An unknown email yields an
/// empty list, not an error.
pub async fn list_applications_for_user(
    State(app_state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<LoanApplication>>>> {
    let applications = app_state
        .application_service
        .list_for_user(&email)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to list applications: {}", e)))?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(applications),
        error: None,
    }))
}

/// Manager view: applications awaiting review
pub async fn list_pending_applications(
    State(app_state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<LoanApplication>>>> {
    let applications = app_state
        .application_service
        .list_pending()
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to list applications: {}", e)))?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(applications),
        error: None,
    }))
}
