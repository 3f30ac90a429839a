use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AccountError, UpdatePhoneRequest};
use crate::services::account::AccountService;

fn map_account_error(e: AccountError) -> AppError {
    match e {
        AccountError::UserNotFound => AppError::NotFound("User not found".to_string()),
        AccountError::DatabaseError(msg) => AppError::Database(msg),
    }
}

/// GET /account/me — the caller's profile and upcoming appointments.
#[axum::debug_handler]
pub async fn get_me(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let account_service = AccountService::new(&state);

    let profile = account_service
        .get_profile(user.id)
        .await
        .map_err(map_account_error)?;

    let appointments = account_service
        .list_own_appointments(user.id)
        .await
        .map_err(map_account_error)?;

    Ok(Json(json!({
        "user": profile,
        "appointments": appointments,
    })))
}

/// PATCH /account/me/phone — set the caller's phone number.
#[axum::debug_handler]
pub async fn update_phone(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdatePhoneRequest>,
) -> Result<Json<Value>, AppError> {
    let phone = match request.phone.as_deref() {
        Some(phone) if !phone.is_empty() => phone,
        _ => return Err(AppError::BadRequest("Missing phone".to_string())),
    };

    let account_service = AccountService::new(&state);
    let profile = account_service
        .update_phone(user.id, phone)
        .await
        .map_err(map_account_error)?;

    Ok(Json(json!({
        "success": true,
        "user": profile,
    })))
}
