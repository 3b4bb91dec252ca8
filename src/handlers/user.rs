//! User registry API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    ApiResponse, RegisterUserRequest, RegisterUserResponse, SetRoleRequest, SuspendUserRequest,
    SuspendUserResponse, User,
};
use crate::state::AppState;

/// Register a user. Idempotent on email: re-registering an existing email
/// returns the stored record unchanged with `created: false`.
pub async fn register_user(
    State(app_state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> ApiResult<Json<ApiResponse<RegisterUserResponse>>> {
    if request.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email is required".to_string()));
    }

    let response = app_state
        .user_service
        .register(request)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to register user: {}", e)))?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(response),
        error: None,
    }))
}

/// Full scan of the registry
pub async fn list_users(
    State(app_state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<User>>>> {
    let users = app_state
        .user_service
        .list()
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to list users: {}", e)))?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(users),
        error: None,
    }))
}

/// Look up a user by email. Absence is a normal outcome: the response
/// carries empty data rather than an error.
pub async fn get_user_by_email(
    State(app_state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = app_state
        .user_service
        .get_by_email(&email)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to look up user: {}", e)))?;

    Ok(Json(ApiResponse {
        success: true,
        data: user,
        error: None,
    }))
}

/// Update a user's role. Succeeds even when no record matches; callers must
/// not infer existence from this operation.
pub async fn set_user_role(
    State(app_state): State<AppState>,
    Path(email): Path<String>,
    Json(request): Json<SetRoleRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    app_state
        .user_service
        .set_role(&email, request.role)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to update role: {}", e)))?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(()),
        error: None,
    }))
}

/// Remove a user record. The only operation with a distinct not-found error
/// path; the effect is an irreversible delete, not a reversible flag.
/// `reason` and `feedback` feed an external audit trail and are echoed back.
pub async fn suspend_user(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<SuspendUserRequest>>,
) -> ApiResult<Json<ApiResponse<SuspendUserResponse>>> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    // Ids are opaque to callers; one that the store could never have issued
    // matches nothing, same as any other unknown id.
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::NotFound("User not found".to_string()))?;

    let deleted = app_state
        .user_service
        .remove(id)
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to delete user: {}", e)))?;

    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(ApiResponse {
        success: true,
        data: Some(SuspendUserResponse {
            deleted: true,
            reason: request.reason,
            feedback: request.feedback,
        }),
        error: None,
    }))
}
