use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::{auth_middleware, require_admin};

use crate::handlers;

pub fn backoffice_routes(state: Arc<AppConfig>) -> Router {
    // Admin check sits inside the auth layer: the token is validated
    // first, then the role.
    let staff_routes = Router::new()
        .route("/appointments", get(handlers::list_appointments))
        .route(
            "/appointments/{appointment_id}",
            delete(handlers::delete_appointment),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(staff_routes).with_state(state)
}
