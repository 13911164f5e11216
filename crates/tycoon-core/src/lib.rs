//! Clock, economy, tick engine, and action resolution for the Tycoon
//! idle business simulation.
//!
//! A single [`WorldState`] advances with elapsed wall-clock time (auto
//! income, periodic settlement, an escalating internal spy) and with
//! discrete player actions. Every external operation first catches the
//! world up to "now" and then applies its own mutation.
//!
//! # Modules
//!
//! - [`clock`] -- [`Clock`] trait, system and manual clocks, interval math.
//! - [`config`] -- Configuration loading from `tycoon-config.yaml` into
//!   strongly-typed structs.
//! - [`random`] -- [`RandomSource`] trait, seeded and scripted sources.
//! - [`economy`] -- Reputation curve, bonuses, and rate arithmetic.
//! - [`tick`] -- The four-phase catch-up engine.
//! - [`actions`] -- Player action resolution.
//! - [`accusation`] -- Spy accusation resolution.
//! - [`engine`] -- [`Engine`] facade that owns state, clock, and randomness.
//!
//! [`WorldState`]: tycoon_types::WorldState
//! [`Clock`]: clock::Clock
//! [`RandomSource`]: random::RandomSource
//! [`Engine`]: engine::Engine

pub mod accusation;
pub mod actions;
pub mod clock;
pub mod config;
pub mod economy;
pub mod engine;
pub mod random;
pub mod tick;

pub use actions::ActionOutcome;
pub use engine::{Engine, EngineError};
