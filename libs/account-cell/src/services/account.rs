use reqwest::Method;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{StoreError, SupabaseClient};

use crate::models::{AccountError, AccountProfile, OwnAppointment};

pub struct AccountService {
    supabase: SupabaseClient,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// The caller's profile row. A valid token whose user row has been
    /// removed resolves to `UserNotFound`.
    pub async fn get_profile(&self, user_id: Uuid) -> Result<AccountProfile, AccountError> {
        debug!("Fetching profile for user {}", user_id);

        let path = format!(
            "/rest/v1/users?id=eq.{}&select=id,name,email,phone,role",
            user_id
        );

        let rows: Vec<AccountProfile> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(map_store_error)?;

        rows.into_iter().next().ok_or(AccountError::UserNotFound)
    }

    /// The caller's appointments, soonest first.
    pub async fn list_own_appointments(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<OwnAppointment>, AccountError> {
        let path = format!(
            "/rest/v1/appointments?user_id=eq.{}&select=id,date,duration_minutes,full_name,phone,email&order=date.asc",
            user_id
        );

        self.supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(map_store_error)
    }

    pub async fn update_phone(
        &self,
        user_id: Uuid,
        phone: &str,
    ) -> Result<AccountProfile, AccountError> {
        let path = format!(
            "/rest/v1/users?id=eq.{}&select=id,name,email,phone,role",
            user_id
        );
        let body = serde_json::json!({ "phone": phone });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let rows: Vec<AccountProfile> = self
            .supabase
            .request_with_headers(Method::PATCH, &path, Some(body), Some(headers))
            .await
            .map_err(map_store_error)?;

        let profile = rows.into_iter().next().ok_or(AccountError::UserNotFound)?;

        info!("Phone number updated for user {}", user_id);
        Ok(profile)
    }
}

fn map_store_error(e: StoreError) -> AccountError {
    match e {
        StoreError::NotFound(_) => AccountError::UserNotFound,
        other => AccountError::DatabaseError(other.to_string()),
    }
}
