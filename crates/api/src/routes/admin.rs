//! Wallet role administration routes.

use axum::extract::{DefaultBodyLimit, State};
use axum::extract::rejection::JsonRejection;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use pharma_common::error::AppError;
use pharma_common::types::{UserRole, normalize_address};

use crate::state::AppState;

/// Request bodies are tiny JSON objects.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin",
            get(list_users).post(assign_role).delete(remove_role),
        )
        // Oversized bodies fail inside the `Json` extractor, so they take the
        // same 500 path as any other unreadable body.
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

/// Request body for role assignment.
#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub address: Option<String>,
    pub role: Option<String>,
}

/// Request body for role removal.
#[derive(Debug, Deserialize)]
pub struct RemoveRoleRequest {
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// GET /api/admin: List every stored wallet role.
///
/// Always 200: store failures surface as an empty list.
async fn list_users(State(state): State<AppState>) -> Json<Vec<UserRole>> {
    Json(state.admin.get_users().await)
}

/// POST /api/admin: Store a role and sync it to the PharmaNFT contract.
async fn assign_role(
    State(state): State<AppState>,
    payload: Result<Json<AssignRoleRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let req = parse_body(payload)?;

    let address = req
        .address
        .map(|a| normalize_address(&a))
        .filter(|a| !a.is_empty());
    let role = req.role.filter(|r| !r.is_empty());
    let (Some(address), Some(role)) = (address, role) else {
        return Err(AppError::Validation("Missing information".to_string()));
    };

    state.admin.assign_role(&address, &role).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /api/admin: Remove a stored role. The contract is not touched.
async fn remove_role(
    State(state): State<AppState>,
    payload: Result<Json<RemoveRoleRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let req = parse_body(payload)?;

    let Some(address) = req
        .address
        .map(|a| normalize_address(&a))
        .filter(|a| !a.is_empty())
    else {
        return Err(AppError::Validation("Missing address".to_string()));
    };

    state.admin.remove_role(&address).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Unreadable bodies are reported as 500 with the parser's message.
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::Internal(e.body_text()))
}
