use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn therapist_routes(state: Arc<AppConfig>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", post(handlers::register_therapist));

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/profile", get(handlers::get_profile).put(handlers::update_profile))
        .route("/bookings", get(handlers::list_bookings))
        .route("/clients", get(handlers::list_clients))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
