use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use account_cell::router::account_routes;
use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use backoffice_cell::router::backoffice_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "BarberBook API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/account", account_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/backoffice", backoffice_routes(state.clone()))
}
