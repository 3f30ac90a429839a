use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{StoreError, SupabaseClient};
use shared_models::auth::User;

use crate::models::{Appointment, AppointmentError, BookingRules, DaySlot};

pub struct BookingService {
    supabase: SupabaseClient,
    rules: BookingRules,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            rules: BookingRules::default(),
        }
    }

    /// Lead-time rule: a slot must be at least 24 hours away. This also
    /// rejects any timestamp in the past.
    pub fn validate_requested_time(
        &self,
        date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), AppointmentError> {
        let min_advance = ChronoDuration::hours(self.rules.min_advance_booking_hours);
        if date < now + min_advance {
            return Err(AppointmentError::InvalidTime(format!(
                "Appointments must be booked at least {} hours in advance",
                self.rules.min_advance_booking_hours
            )));
        }

        Ok(())
    }

    /// List the booked slots of one calendar day (UTC bounds), after
    /// purging appointments whose time has already passed.
    pub async fn list_day(&self, day: NaiveDate) -> Result<Vec<DaySlot>, AppointmentError> {
        self.purge_past().await?;

        let start_of_day = day.and_time(NaiveTime::MIN).and_utc();
        let end_of_day = start_of_day + ChronoDuration::days(1) - ChronoDuration::milliseconds(1);

        let path = format!(
            "/rest/v1/appointments?date=gte.{}&date=lte.{}&select=id,date,duration_minutes,full_name&order=date.asc",
            urlencoding::encode(&start_of_day.to_rfc3339()),
            urlencoding::encode(&end_of_day.to_rfc3339()),
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let slots: Vec<DaySlot> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<DaySlot>, _>>()
            .map_err(|e| AppointmentError::DatabaseError(format!("Failed to parse slots: {}", e)))?;

        Ok(slots)
    }

    /// Book a slot for the caller. The exact-timestamp pre-check gives a
    /// friendly conflict message; the unique constraint on `date` is the
    /// final arbiter when two requests race.
    pub async fn book(
        &self,
        user: &User,
        date: DateTime<Utc>,
        full_name: &str,
        phone: &str,
        email: &str,
    ) -> Result<Appointment, AppointmentError> {
        let now = Utc::now();
        self.validate_requested_time(date, now)?;

        if self.slot_is_taken(date).await? {
            warn!("Slot collision at {} for user {}", date, user.id);
            return Err(AppointmentError::SlotTaken);
        }

        let appointment_data = json!({
            "user_id": user.id,
            "date": date.to_rfc3339(),
            "duration_minutes": self.rules.default_duration_minutes,
            "full_name": full_name,
            "phone": phone,
            "email": email,
            "created_at": now.to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(appointment_data),
                Some(headers),
            )
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AppointmentError::SlotTaken,
                other => AppointmentError::DatabaseError(other.to_string()),
            })?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| AppointmentError::DatabaseError("Failed to create appointment".to_string()))?;

        let appointment: Appointment = serde_json::from_value(row).map_err(|e| {
            AppointmentError::DatabaseError(format!("Failed to parse created appointment: {}", e))
        })?;

        info!("Appointment {} booked for {}", appointment.id, appointment.date);
        Ok(appointment)
    }

    /// Cancel one of the caller's own appointments. Ownership is matched
    /// on the account email; a missing row and a foreign row are folded
    /// into the same refusal.
    pub async fn cancel_own(&self, appointment_id: Uuid, user: &User) -> Result<(), AppointmentError> {
        debug!("Cancelling appointment {} for user {}", appointment_id, user.id);

        let appointment = match self.get_appointment(appointment_id).await? {
            Some(appointment) => appointment,
            None => return Err(AppointmentError::Forbidden),
        };

        let owner_email = self.owner_email(appointment.user_id).await?;
        if user.email.as_deref() != Some(owner_email.as_str()) {
            return Err(AppointmentError::Forbidden);
        }

        self.delete_appointment(appointment_id).await?;

        info!("Appointment {} cancelled by its owner", appointment_id);
        Ok(())
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        match result.into_iter().next() {
            Some(row) => {
                let appointment: Appointment = serde_json::from_value(row).map_err(|e| {
                    AppointmentError::DatabaseError(format!("Failed to parse appointment: {}", e))
                })?;
                Ok(Some(appointment))
            }
            None => Ok(None),
        }
    }

    pub async fn delete_appointment(&self, appointment_id: Uuid) -> Result<(), AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let _: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn owner_email(&self, user_id: Uuid) -> Result<String, AppointmentError> {
        let path = format!("/rest/v1/users?id=eq.{}&select=email", user_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .next()
            .and_then(|row| row["email"].as_str().map(str::to_string))
            .ok_or(AppointmentError::Forbidden)
    }

    async fn slot_is_taken(&self, date: DateTime<Utc>) -> Result<bool, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?date=eq.{}&select=id",
            urlencoding::encode(&date.to_rfc3339())
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Ok(!result.is_empty())
    }

    async fn purge_past(&self) -> Result<(), AppointmentError> {
        let now = Utc::now();
        let path = format!(
            "/rest/v1/appointments?date=lt.{}",
            urlencoding::encode(&now.to_rfc3339())
        );

        let _: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        debug!("Purged appointments before {}", now);
        Ok(())
    }
}
