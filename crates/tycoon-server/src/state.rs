//! Shared application state for the HTTP shell.

use std::sync::Arc;

use tokio::sync::Mutex;
use tycoon_core::Engine;

/// State injected into every handler via Axum's `State` extractor.
///
/// The engine is the sole owner of the world. Handlers lock it for the
/// duration of one operation.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The game engine.
    pub engine: Arc<Mutex<Engine>>,
}

impl AppState {
    /// Wrap an engine for sharing across handlers.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }
}
