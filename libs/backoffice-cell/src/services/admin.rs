use chrono::Utc;
use reqwest::Method;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AdminAppointment, BackofficeError, PeriodFilter};

pub struct AdminService {
    supabase: SupabaseClient,
}

impl AdminService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Every appointment in the shop's book, soonest first, with the
    /// owning account embedded. An optional period narrows the window
    /// server-side.
    pub async fn list_appointments(
        &self,
        period: Option<PeriodFilter>,
    ) -> Result<Vec<AdminAppointment>, BackofficeError> {
        let mut path =
            "/rest/v1/appointments?select=*,users(name,email)&order=date.asc".to_string();

        if let Some(period) = period {
            let (start, end) = period.bounds(Utc::now());
            path.push_str(&format!(
                "&date=gte.{}&date=lte.{}",
                urlencoding::encode(&start.to_rfc3339()),
                urlencoding::encode(&end.to_rfc3339()),
            ));
        }

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BackofficeError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<AdminAppointment>, _>>()
            .map_err(|e| BackofficeError::DatabaseError(format!("Failed to parse appointments: {}", e)))
    }

    /// Remove any appointment by id. Unlike the self-service path this
    /// reports a missing row instead of folding it into a refusal.
    pub async fn delete_appointment(&self, appointment_id: Uuid) -> Result<(), BackofficeError> {
        let path = format!("/rest/v1/appointments?id=eq.{}&select=id", appointment_id);
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BackofficeError::DatabaseError(e.to_string()))?;

        if existing.is_empty() {
            return Err(BackofficeError::NotFound);
        }

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let _: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, None)
            .await
            .map_err(|e| BackofficeError::DatabaseError(e.to_string()))?;

        info!("Appointment {} removed by staff", appointment_id);
        Ok(())
    }
}
