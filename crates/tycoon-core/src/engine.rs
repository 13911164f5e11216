//! Engine facade: the single entry point external callers drive.
//!
//! [`Engine`] owns the world state together with its configuration, clock,
//! and random source. Each public operation reads the clock exactly once,
//! catches the world up with [`tick::advance`], and only then applies its
//! own mutation, so every operation observes a fully advanced world.
//!
//! The engine is not internally synchronized. Callers that share it
//! between tasks must serialize access (the game server keeps it behind a
//! single mutex).

use tracing::debug;
use tycoon_types::{AccusationResult, Action, WorldState};

use crate::accusation;
use crate::actions::{self, ActionOutcome};
use crate::clock::Clock;
use crate::config::TycoonConfig;
use crate::economy::EconomyError;
use crate::random::RandomSource;
use crate::tick::{self, TickError, TickReport};

/// Errors surfaced by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Catching up elapsed time failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },

    /// Applying an action or accusation failed.
    #[error("economy error: {source}")]
    Economy {
        /// The underlying economy error.
        #[from]
        source: EconomyError,
    },
}

/// The game world plus everything needed to advance it.
pub struct Engine {
    state: WorldState,
    config: TycoonConfig,
    clock: Box<dyn Clock>,
    rng: Box<dyn RandomSource>,
    last_report: TickReport,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("last_report", &self.last_report)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Start a new game at the clock's current instant.
    pub fn new(config: TycoonConfig, clock: Box<dyn Clock>, rng: Box<dyn RandomSource>) -> Self {
        let state = WorldState::new(clock.now(), config.economy.starting_money);
        Self::with_state(state, config, clock, rng)
    }

    /// Resume from an existing state.
    pub fn with_state(
        state: WorldState,
        config: TycoonConfig,
        clock: Box<dyn Clock>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            state,
            config,
            clock,
            rng,
            last_report: TickReport::default(),
        }
    }

    /// The current state, without advancing time.
    pub const fn state(&self) -> &WorldState {
        &self.state
    }

    /// Mutable access to the state, for scenario setup.
    pub const fn state_mut(&mut self) -> &mut WorldState {
        &mut self.state
    }

    /// The configuration the engine runs with.
    pub const fn config(&self) -> &TycoonConfig {
        &self.config
    }

    /// What the most recent catch-up did.
    pub const fn last_report(&self) -> &TickReport {
        &self.last_report
    }

    /// Catch up elapsed time and return the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Tick`] if advancing overflows.
    pub fn query(&mut self) -> Result<&WorldState, EngineError> {
        self.catch_up()?;
        Ok(&self.state)
    }

    /// Catch up elapsed time, then apply `action`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if advancing or the action's arithmetic
    /// overflows. Unaffordable actions are not errors.
    pub fn act(&mut self, action: Action) -> Result<ActionOutcome, EngineError> {
        self.catch_up()?;
        let outcome = actions::apply_action(
            &mut self.state,
            action,
            &self.config.economy,
            &self.config.actions,
            self.rng.as_mut(),
        )?;
        Ok(outcome)
    }

    /// Catch up elapsed time, then resolve an accusation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if advancing or the penalty overflows.
    pub fn accuse(&mut self, guess: &str) -> Result<AccusationResult, EngineError> {
        self.catch_up()?;
        let result = accusation::accuse(&mut self.state, guess, &self.config.threat)?;
        Ok(result)
    }

    /// Read the clock once and advance every subsystem to that instant.
    fn catch_up(&mut self) -> Result<(), TickError> {
        let now = self.clock.now();
        let report = tick::advance(
            &mut self.state,
            &self.config.economy,
            &self.config.threat,
            now,
            self.rng.as_mut(),
        )?;
        debug!(%now, ?report, "World caught up");
        self.last_report = report;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, TimeDelta, Utc};

    use super::*;
    use crate::clock::ManualClock;
    use crate::random::ScriptedRandom;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn engine_with(rng: ScriptedRandom) -> (Engine, ManualClock) {
        let clock = ManualClock::new(t0());
        let engine = Engine::new(
            TycoonConfig::default(),
            Box::new(clock.clone()),
            Box::new(rng),
        );
        (engine, clock)
    }

    #[test]
    fn new_engine_starts_at_clock_now() {
        let (engine, _) = engine_with(ScriptedRandom::new());
        assert_eq!(engine.state().money, 100);
        assert_eq!(engine.state().last_auto_time, t0());
    }

    #[test]
    fn query_catches_up_time() {
        let (mut engine, clock) = engine_with(ScriptedRandom::new());
        engine.state_mut().auto_level = 1;
        clock.advance(TimeDelta::seconds(40));
        let state = engine.query().unwrap();
        assert_eq!(state.money, 140);
        assert_eq!(engine.last_report().auto_ticks, 4);
    }

    #[test]
    fn action_sees_income_accrued_before_it() {
        let (mut engine, clock) = engine_with(ScriptedRandom::new());
        engine.state_mut().money = 0;
        engine.state_mut().staff = 2;
        clock.advance(TimeDelta::seconds(100));
        // 10 ticks * 10 = 100 accrued first, making the upgrade affordable.
        let outcome = engine.act(Action::Upgrade).unwrap();
        assert!(outcome.is_applied());
        assert_eq!(engine.state().money, 0);
        assert_eq!(engine.state().auto_level, 1);
    }

    #[test]
    fn accuse_without_spy_reports_no_threat() {
        let (mut engine, _) = engine_with(ScriptedRandom::new());
        let result = engine.accuse("Employee A").unwrap();
        assert_eq!(result.outcome, tycoon_types::AccusationOutcome::NoActiveThreat);
        assert_eq!(result.money, 100);
    }
}
