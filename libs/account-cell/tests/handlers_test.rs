use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use account_cell::handlers::{get_me, update_phone};
use account_cell::models::UpdatePhoneRequest;
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreResponses, TestUser};

fn mock_config(mock_server: &MockServer) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        supabase_url: mock_server.uri(),
        supabase_service_key: "test-service-key".to_string(),
        jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
        session_ttl_hours: 72,
    })
}

fn profile_row(user: &TestUser) -> serde_json::Value {
    json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "phone": user.phone,
        "role": user.role.to_string()
    })
}

#[tokio::test]
async fn test_get_me_returns_profile_and_appointments() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let user = TestUser::customer("client@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", format!("eq.{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([profile_row(&user)])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("user_id", format!("eq.{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::appointment_row_tomorrow(&user)
        ])))
        .mount(&mock_server)
        .await;

    let result = get_me(State(config), Extension(user.to_user())).await;

    assert!(result.is_ok());
    let response = result.unwrap().0;
    assert_eq!(response["user"]["email"], "client@example.com");
    assert_eq!(response["appointments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_me_reports_missing_account() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let user = TestUser::customer("ghost@example.com");

    // Valid token, but the account row is gone
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = get_me(State(config), Extension(user.to_user())).await;

    match result.unwrap_err() {
        AppError::NotFound(msg) => assert_eq!(msg, "User not found"),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_phone_returns_updated_profile() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    // A customer who signed up without a phone number sets one
    let user = TestUser::customer("client@example.com").without_phone();
    let mut updated = profile_row(&user);
    updated["phone"] = json!("0698765432");

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", format!("eq.{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([updated])))
        .mount(&mock_server)
        .await;

    let request = UpdatePhoneRequest {
        phone: Some("0698765432".to_string()),
    };

    let result = update_phone(State(config), Extension(user.to_user()), Json(request)).await;

    assert!(result.is_ok());
    let response = result.unwrap().0;
    assert_eq!(response["success"], true);
    assert_eq!(response["user"]["phone"], "0698765432");
}

#[tokio::test]
async fn test_update_phone_rejects_missing_phone() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let user = TestUser::customer("client@example.com");

    let result = update_phone(
        State(config),
        Extension(user.to_user()),
        Json(UpdatePhoneRequest { phone: None }),
    )
    .await;

    match result.unwrap_err() {
        AppError::BadRequest(msg) => assert_eq!(msg, "Missing phone"),
        other => panic!("Expected BadRequest, got {:?}", other),
    }
}
