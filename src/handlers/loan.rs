//! Loan catalog API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{ApiResponse, CreateLoanResponse, Loan};
use crate::state::AppState;

/// Create a loan offer from an open terms mapping
pub async fn create_loan(
    State(app_state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult<Json<ApiResponse<CreateLoanResponse>>> {
    let loan = app_state
        .loan_service
        .create(body)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to create loan: {}", e)))?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(CreateLoanResponse { id: loan.id }),
        error: None,
    }))
}

/// Full scan of the catalog
pub async fn list_loans(
    State(app_state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Loan>>>> {
    let loans = app_state
        .loan_service
        .list()
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to list loans: {}", e)))?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(loans),
        error: None,
    }))
}

/// Look up a loan by id; absence is a normal outcome with empty data
pub async fn get_loan(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Loan>>> {
    let loan = app_state
        .loan_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to look up loan: {}", e)))?;

    Ok(Json(ApiResponse {
        success: true,
        data: loan,
        error: None,
    }))
}
