use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue},
    Json,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::handlers::{login, signup, validate_token};
use auth_cell::models::{LoginRequest, SignupRequest};
use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::password::hash_password;
use shared_utils::test_utils::{JwtTestUtils, MockStoreResponses, TestConfig, TestUser};

fn mock_config(mock_server: &MockServer) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        supabase_url: mock_server.uri(),
        supabase_service_key: "test-service-key".to_string(),
        jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
        session_ttl_hours: 72,
    })
}

fn create_auth_header(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "authorization",
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

fn signup_request(email: &str) -> SignupRequest {
    SignupRequest {
        name: Some("Jean Dupont".to_string()),
        email: Some(email.to_string()),
        password: Some("s3cret-pass".to_string()),
        phone: Some("0612345678".to_string()),
    }
}

#[tokio::test]
async fn test_signup_creates_account() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.new@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    let result = signup(State(config), Json(signup_request("new@example.com"))).await;

    assert!(result.is_ok());
    let response = result.unwrap().0;
    assert_eq!(response["success"], true);
}

#[tokio::test]
async fn test_signup_rejects_taken_email() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let existing = TestUser::customer("taken@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::user_row(&existing, "some-hash")
        ])))
        .mount(&mock_server)
        .await;

    let result = signup(State(config), Json(signup_request("taken@example.com"))).await;

    match result.unwrap_err() {
        AppError::BadRequest(msg) => assert_eq!(msg, "Email already in use"),
        other => panic!("Expected BadRequest, got {:?}", other),
    }
}

#[tokio::test]
async fn test_signup_treats_email_case_as_distinct() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    // No normalization: the existence lookup uses the literal email, so
    // "Client@" does not collide with an existing "client@" account.
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.Client@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    let result = signup(State(config), Json(signup_request("Client@example.com"))).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().0["success"], true);
}

#[tokio::test]
async fn test_signup_rejects_missing_fields() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let request = SignupRequest {
        name: Some("Jean Dupont".to_string()),
        email: None,
        password: Some("s3cret-pass".to_string()),
        phone: None,
    };

    let result = signup(State(config), Json(request)).await;

    match result.unwrap_err() {
        AppError::BadRequest(msg) => assert_eq!(msg, "Missing required fields"),
        other => panic!("Expected BadRequest, got {:?}", other),
    }
}

#[tokio::test]
async fn test_signup_rejects_empty_password() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    let request = SignupRequest {
        name: Some("Jean Dupont".to_string()),
        email: Some("new@example.com".to_string()),
        password: Some(String::new()),
        phone: None,
    };

    let result = signup(State(config), Json(request)).await;

    assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let user = TestUser::customer("client@example.com");
    let password_hash = hash_password("s3cret-pass").unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.client@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::user_row(&user, &password_hash)
        ])))
        .mount(&mock_server)
        .await;

    let request = LoginRequest {
        email: "client@example.com".to_string(),
        password: "s3cret-pass".to_string(),
    };

    let result = login(State(config.clone()), Json(request)).await;

    assert!(result.is_ok());
    let response = result.unwrap().0;
    assert!(!response["token"].as_str().unwrap().is_empty());
    assert_eq!(response["user"]["email"], "client@example.com");
    assert_eq!(response["user"]["role"], "USER");

    // The issued token must pass our own validation
    let token = response["token"].as_str().unwrap();
    let validated = shared_utils::jwt::validate_token(token, &config.jwt_secret).unwrap();
    assert_eq!(validated.id, user.id);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let user = TestUser::customer("client@example.com");
    let password_hash = hash_password("the-real-password").unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::user_row(&user, &password_hash)
        ])))
        .mount(&mock_server)
        .await;

    let request = LoginRequest {
        email: "client@example.com".to_string(),
        password: "not-the-password".to_string(),
    };

    let result = login(State(config), Json(request)).await;

    match result.unwrap_err() {
        AppError::Auth(msg) => assert_eq!(msg, "Invalid email or password"),
        other => panic!("Expected Auth error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_login_rejects_unknown_email() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = LoginRequest {
        email: "ghost@example.com".to_string(),
        password: "whatever".to_string(),
    };

    let result = login(State(config), Json(request)).await;

    assert!(matches!(result.unwrap_err(), AppError::Auth(_)));
}

#[tokio::test]
async fn test_validate_token_success() {
    let config = TestConfig::default().to_arc();
    let user = TestUser::customer("client@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(24));
    let headers = create_auth_header(&token);

    let result = validate_token(State(config), headers).await;

    assert!(result.is_ok());
    let response = result.unwrap().0;
    assert!(response.valid);
    assert_eq!(response.user_id, user.id);
    assert_eq!(response.email, Some(user.email));
    assert_eq!(response.role, Role::User);
}

#[tokio::test]
async fn test_validate_token_reports_admin_role() {
    let config = TestConfig::default().to_arc();
    let admin = TestUser::admin("boss@example.com");
    let token = JwtTestUtils::create_test_token(&admin, &config.jwt_secret, Some(24));
    let headers = create_auth_header(&token);

    let result = validate_token(State(config), headers).await;

    let response = result.unwrap().0;
    assert_eq!(response.role, Role::Admin);
}

#[tokio::test]
async fn test_validate_token_missing_header() {
    let config = TestConfig::default().to_arc();

    let result = validate_token(State(config), HeaderMap::new()).await;

    match result.unwrap_err() {
        AppError::Auth(msg) => assert_eq!(msg, "Missing authorization header"),
        other => panic!("Expected Auth error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_validate_token_no_bearer_prefix() {
    let config = TestConfig::default().to_arc();
    let mut headers = HeaderMap::new();
    headers.insert("authorization", HeaderValue::from_static("sometoken"));

    let result = validate_token(State(config), headers).await;

    match result.unwrap_err() {
        AppError::Auth(msg) => assert_eq!(msg, "Invalid authorization header format"),
        other => panic!("Expected Auth error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_validate_token_expired() {
    let config = TestConfig::default().to_arc();
    let user = TestUser::default();
    let token = JwtTestUtils::create_expired_token(&user, &config.jwt_secret);
    let headers = create_auth_header(&token);

    let result = validate_token(State(config), headers).await;

    assert!(matches!(result.unwrap_err(), AppError::Auth(_)));
}

#[tokio::test]
async fn test_validate_token_invalid_signature() {
    let config = TestConfig::default().to_arc();
    let user = TestUser::default();
    let token = JwtTestUtils::create_invalid_signature_token(&user);
    let headers = create_auth_header(&token);

    let result = validate_token(State(config), headers).await;

    assert!(matches!(result.unwrap_err(), AppError::Auth(_)));
}

#[tokio::test]
async fn test_validate_token_malformed() {
    let config = TestConfig::default().to_arc();
    let headers = create_auth_header(&JwtTestUtils::create_malformed_token());

    let result = validate_token(State(config), headers).await;

    assert!(matches!(result.unwrap_err(), AppError::Auth(_)));
}
