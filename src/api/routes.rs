//! Route definitions

use axum::routing::get;
use axum::Router;

use super::handlers;
use super::server::AppState;

/// Create the router
///
/// Any path other than `/health` serves the subscription.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .fallback(handlers::subscription::serve_subscription)
        .with_state(state)
}
