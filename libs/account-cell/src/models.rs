use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::auth::Role;

/// Profile view of the account: everything but the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
}

/// An appointment as shown on the profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnAppointment {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub full_name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePhoneRequest {
    pub phone: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
