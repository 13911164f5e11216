//! Endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/state` | Current world state |
//! | `POST` | `/action` | Apply an action, return the world state |
//! | `POST` | `/suspect` | Accuse a staff member of spying |

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tracing::{info, warn};
use tycoon_types::{AccusationRequest, AccusationResult, Action, ActionRequest, WorldState};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /state
// ---------------------------------------------------------------------------

/// Catch the world up and return it.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Result<Json<WorldState>, ApiError> {
    let mut engine = state.engine.lock().await;
    let world = engine.query()?;
    Ok(Json(world.clone()))
}

// ---------------------------------------------------------------------------
// POST /action
// ---------------------------------------------------------------------------

/// Apply a named action.
///
/// Unaffordable or otherwise inapplicable actions still return `200`
/// with the unchanged state. Only an unknown action name is rejected.
pub async fn post_action(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<WorldState>, ApiError> {
    let action = request.action.parse::<Action>().inspect_err(|e| {
        warn!(error = %e, "Rejected action request");
    })?;

    let mut engine = state.engine.lock().await;
    let outcome = engine.act(action)?;
    info!(%action, applied = outcome.is_applied(), "Action handled");
    Ok(Json(engine.state().clone()))
}

// ---------------------------------------------------------------------------
// POST /suspect
// ---------------------------------------------------------------------------

/// Accuse a staff member of being the spy.
pub async fn post_suspect(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AccusationRequest>,
) -> Result<Json<AccusationResult>, ApiError> {
    let mut engine = state.engine.lock().await;
    let result = engine.accuse(&request.guess)?;
    info!(guess = %request.guess, outcome = ?result.outcome, "Accusation handled");
    Ok(Json(result))
}
