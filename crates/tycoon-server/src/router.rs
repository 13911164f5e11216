//! Axum router construction.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /state` -- current world state
/// - `POST /action` -- apply an action
/// - `POST /suspect` -- accuse a suspect
///
/// CORS is configured to allow any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/action", post(handlers::post_action))
        .route("/suspect", post(handlers::post_suspect))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
