use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// `TraceLayer` wraps every route for structured request/response logging
/// via `tracing`.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/api/websites",
            get(routes::websites::list_websites).post(routes::websites::create_website),
        )
        .route(
            "/api/websites/{id}",
            get(routes::websites::get_website)
                .put(routes::websites::update_website)
                .delete(routes::websites::delete_website),
        )
        .route(
            "/api/websites/{id}/dashboard",
            get(routes::dashboard::get_dashboard),
        )
        .route(
            "/api/websites/{id}/dashboard/live",
            get(routes::dashboard::get_dashboard_live),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
