use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A row of the `appointments` table. The contact fields (full name,
/// phone, email) are captured at booking time, prefilled from the
/// customer's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// The public shape of a booked slot on the day view: enough to grey
/// out taken times without exposing contact details beyond the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlot {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub full_name: String,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Booking payload. Fields are optional so missing data surfaces as a
/// 400 with a stable message rather than a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub date: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("This slot is already taken")]
    SlotTaken,

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Not authorized to cancel this appointment")]
    Forbidden,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

// ==============================================================================
// VALIDATION MODELS
// ==============================================================================

#[derive(Debug, Clone)]
pub struct BookingRules {
    pub min_advance_booking_hours: i64,
    pub default_duration_minutes: i32,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            min_advance_booking_hours: 24,
            default_duration_minutes: 60,
        }
    }
}
