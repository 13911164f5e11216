//! Shared type definitions for the Tycoon idle business simulation.
//!
//! This crate is the single source of truth for the data that crosses crate
//! boundaries: the world state aggregate, the closed set of player actions,
//! the threat sub-game vocabulary, and the request/response bodies of the
//! game API. Types flow downstream to `TypeScript` via `ts-rs` so a
//! dashboard can consume the same shapes.
//!
//! # Modules
//!
//! - [`enums`] -- Player actions, suspects, spy hints, accusation outcomes
//! - [`state`] -- The [`WorldState`] aggregate
//! - [`api`] -- Request and response bodies for the game API

pub mod api;
pub mod enums;
pub mod state;

// Re-export all public types at crate root for convenience.
pub use api::{AccusationRequest, AccusationResult, ActionRequest};
pub use enums::{AccusationOutcome, Action, SpyHint, Suspect, UnknownActionError};
pub use state::WorldState;
