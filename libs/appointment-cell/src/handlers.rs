use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AppointmentError, BookAppointmentRequest, DayQuery};
use crate::services::booking::BookingService;

fn map_appointment_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::SlotTaken => AppError::Conflict("This slot is already taken".to_string()),
        AppointmentError::InvalidTime(msg) => AppError::BadRequest(msg),
        AppointmentError::Forbidden => {
            AppError::Forbidden("Appointment not found or access denied".to_string())
        }
        AppointmentError::DatabaseError(msg) => AppError::Database(msg),
    }
}

/// GET /appointments?date=YYYY-MM-DD — the booked slots of one day.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<DayQuery>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let date_param = params
        .date
        .ok_or_else(|| AppError::BadRequest("Missing date".to_string()))?;

    let day = NaiveDate::parse_from_str(&date_param, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date".to_string()))?;

    let booking_service = BookingService::new(&state);
    let slots = booking_service
        .list_day(day)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(slots)))
}

/// POST /appointments — book a slot for the authenticated caller.
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let (date_raw, full_name, phone, email) = match (
        request.date.as_deref(),
        request.full_name.as_deref(),
        request.phone.as_deref(),
        request.email.as_deref(),
    ) {
        (Some(date), Some(full_name), Some(phone), Some(email))
            if !date.is_empty() && !full_name.is_empty() && !phone.is_empty() && !email.is_empty() =>
        {
            (date, full_name, phone, email)
        }
        _ => return Err(AppError::BadRequest("Missing booking data".to_string())),
    };

    let date = DateTime::parse_from_rfc3339(date_raw)
        .map_err(|_| AppError::BadRequest("Invalid date".to_string()))?
        .with_timezone(&Utc);
    // Slot equality works on whole seconds.
    let date = date.with_nanosecond(0).unwrap_or(date);

    let booking_service = BookingService::new(&state);
    let appointment = booking_service
        .book(&user, date, full_name, phone, email)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(appointment)))
}

/// DELETE /appointments/{id} — owner-only cancellation.
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    booking_service
        .cancel_own(appointment_id, &user)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "success": true })))
}
