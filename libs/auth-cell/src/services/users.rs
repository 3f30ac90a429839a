use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_utils::password::{hash_password, verify_password};

use crate::models::{AuthCellError, SignupRequest, UserRecord};

pub struct UserService {
    supabase: SupabaseClient,
}

impl UserService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthCellError> {
        debug!("Looking up user by email");

        let path = format!("/rest/v1/users?email=eq.{}", urlencoding::encode(email));
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AuthCellError::DatabaseError(e.to_string()))?;

        match result.into_iter().next() {
            Some(row) => {
                let record: UserRecord = serde_json::from_value(row)
                    .map_err(|e| AuthCellError::DatabaseError(format!("Failed to parse user: {}", e)))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Register a new customer account. The email must be unused; the
    /// password is stored as an argon2 hash and the role is always USER.
    pub async fn create_user(&self, request: &SignupRequest) -> Result<(), AuthCellError> {
        let email = request.email.as_deref().unwrap_or_default();

        if self.find_by_email(email).await?.is_some() {
            return Err(AuthCellError::EmailTaken);
        }

        let password = request.password.as_deref().unwrap_or_default();
        let password_hash =
            hash_password(password).map_err(|e| AuthCellError::Hashing(e.to_string()))?;

        let user_data = json!({
            "name": request.name,
            "email": email,
            "password_hash": password_hash,
            "phone": request.phone,
            "role": "USER",
            "created_at": Utc::now().to_rfc3339()
        });

        let _: Vec<Value> = self
            .supabase
            .request(Method::POST, "/rest/v1/users", Some(user_data))
            .await
            .map_err(|e| AuthCellError::DatabaseError(e.to_string()))?;

        info!("User account created for {}", email);
        Ok(())
    }

    /// The credential-verification callback: email lookup plus hash
    /// comparison. Unknown email and bad password are indistinguishable
    /// to the caller.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AuthCellError> {
        let user = self
            .find_by_email(email)
            .await?
            .ok_or(AuthCellError::InvalidCredentials)?;

        let is_valid = verify_password(password, &user.password_hash)
            .map_err(|e| AuthCellError::Hashing(e.to_string()))?;

        if !is_valid {
            return Err(AuthCellError::InvalidCredentials);
        }

        Ok(user)
    }
}
