use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{BackofficeError, PeriodQuery};
use crate::services::admin::AdminService;

fn map_backoffice_error(e: BackofficeError) -> AppError {
    match e {
        BackofficeError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        BackofficeError::DatabaseError(msg) => AppError::Database(msg),
    }
}

/// GET /backoffice/appointments?period=day|week|month — the full book.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<Value>, AppError> {
    let admin_service = AdminService::new(&state);
    let appointments = admin_service
        .list_appointments(params.period)
        .await
        .map_err(map_backoffice_error)?;

    Ok(Json(json!(appointments)))
}

/// DELETE /backoffice/appointments/{id} — staff cancellation of any booking.
#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let admin_service = AdminService::new(&state);
    admin_service
        .delete_appointment(appointment_id)
        .await
        .map_err(map_backoffice_error)?;

    Ok(Json(json!({ "success": true })))
}
