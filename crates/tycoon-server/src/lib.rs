//! HTTP shell for the Tycoon engine.
//!
//! This crate provides an Axum server that exposes the engine's three
//! operations:
//!
//! - **`GET /state`** catches the world up and returns the full state
//! - **`POST /action`** catches up, applies a named action, and returns
//!   the full state
//! - **`POST /suspect`** catches up and resolves a spy accusation
//!
//! # Architecture
//!
//! The [`Engine`](tycoon_core::Engine) lives behind a single async mutex
//! in [`AppState`]. Each request holds the lock for the whole
//! catch-up-then-mutate sequence, so operations never interleave.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use router::build_router;
pub use server::{listen_addr, start_server, ServerError};
pub use state::AppState;
