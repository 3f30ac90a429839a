use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::HeaderMap,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{TokenResponse, User};
use shared_models::error::AppError;
use shared_utils::jwt::{sign_token, validate_token as validate_jwt};

use crate::models::{AuthCellError, LoginRequest, SessionUser, SignupRequest};
use crate::services::users::UserService;

// Helper function to extract token
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

fn map_auth_error(e: AuthCellError) -> AppError {
    match e {
        AuthCellError::EmailTaken => AppError::BadRequest("Email already in use".to_string()),
        AuthCellError::InvalidCredentials => {
            AppError::Auth("Invalid email or password".to_string())
        }
        AuthCellError::UserNotFound => AppError::NotFound("User not found".to_string()),
        AuthCellError::Hashing(msg) => AppError::Internal(msg),
        AuthCellError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn signup(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<Value>, AppError> {
    let has_required = request.name.as_deref().is_some_and(|v| !v.is_empty())
        && request.email.as_deref().is_some_and(|v| !v.is_empty())
        && request.password.as_deref().is_some_and(|v| !v.is_empty());

    if !has_required {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }

    let service = UserService::new(&config);
    service.create_user(&request).await.map_err(map_auth_error)?;

    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = UserService::new(&config);

    let record = service
        .verify_credentials(&request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    let session_user = SessionUser::from(&record);
    let user = User {
        id: record.id,
        name: record.name.clone(),
        email: Some(record.email.clone()),
        role: record.role,
        phone: record.phone.clone(),
    };

    let token = sign_token(&user, &config.jwt_secret, config.session_ttl_hours)
        .map_err(AppError::Internal)?;

    Ok(Json(json!({
        "token": token,
        "user": session_user
    })))
}

pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_bearer_token(&headers)?;

    match validate_jwt(&token, &config.jwt_secret) {
        Ok(user) => {
            let response = TokenResponse {
                valid: true,
                user_id: user.id,
                email: user.email,
                role: user.role,
            };

            Ok(Json(response))
        }
        Err(err) => Err(AppError::Auth(err)),
    }
}
