//! Request and response bodies for the game API.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::AccusationOutcome;

/// Body of `POST /action`.
///
/// The action arrives as a raw string and is parsed into an
/// [`Action`](crate::Action) by the server so an unknown name can be
/// reported as a client error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionRequest {
    /// Wire name of the action (e.g. `"hire_staff"`).
    pub action: String,
}

/// Body of `POST /suspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AccusationRequest {
    /// The suspect the player believes is the spy.
    pub guess: String,
}

/// Result of an accusation, returned instead of the full state dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AccusationResult {
    /// How the accusation was resolved.
    pub outcome: AccusationOutcome,
    /// Message for the player.
    pub result: String,
    /// Cash on hand after resolution.
    pub money: i64,
    /// Reputation after resolution.
    pub reputation: u32,
}
