use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Role, User};

use crate::jwt::sign_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            session_ttl_hours: 72,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role: Role::User,
            phone: Some("0612345678".to_string()),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: email.to_string(),
            role,
            phone: Some("0612345678".to_string()),
        }
    }

    pub fn customer(email: &str) -> Self {
        Self::new(email, Role::User)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin)
    }

    pub fn without_phone(mut self) -> Self {
        self.phone = None;
        self
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            role: self.role,
            phone: self.phone.clone(),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        sign_token(&user.to_user(), secret, exp_hours.unwrap_or(24))
            .expect("test token signing should not fail")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn user_row(user: &TestUser, password_hash: &str) -> serde_json::Value {
        json!({
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "password_hash": password_hash,
            "phone": user.phone,
            "role": user.role.to_string(),
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(user: &TestUser, date: chrono::DateTime<Utc>) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "user_id": user.id,
            "date": date.to_rfc3339(),
            "duration_minutes": 60,
            "full_name": user.name,
            "phone": user.phone.clone().unwrap_or_default(),
            "email": user.email,
            "created_at": Utc::now().to_rfc3339()
        })
    }

    pub fn appointment_row_tomorrow(user: &TestUser) -> serde_json::Value {
        Self::appointment_row(user, Utc::now() + Duration::hours(36))
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
