//! Action resolver: applies one player command to the world state.
//!
//! Every action checks its precondition first. When the precondition does
//! not hold the action is ignored: the state is left untouched, nothing is
//! logged, and no error is raised. The caller is expected to have already
//! caught the world up with [`tick::advance`](crate::tick::advance).

use tracing::debug;
use tycoon_types::{Action, WorldState};

use crate::config::{ActionConfig, EconomyConfig};
use crate::economy::{self, EconomyError};
use crate::random::RandomSource;

/// Whether an action took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The precondition held and the state was mutated.
    Applied,
    /// The precondition failed; the state is unchanged.
    Ignored,
}

impl ActionOutcome {
    /// `true` if the action took effect.
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Apply `action` to `state`.
///
/// # Errors
///
/// Returns [`EconomyError::Overflow`] if a cash movement would overflow.
/// Precondition failures are not errors; they yield
/// [`ActionOutcome::Ignored`].
pub fn apply_action(
    state: &mut WorldState,
    action: Action,
    economy_config: &EconomyConfig,
    action_config: &ActionConfig,
    rng: &mut dyn RandomSource,
) -> Result<ActionOutcome, EconomyError> {
    let outcome = match action {
        Action::Work => work(state, economy_config, action_config, rng)?,
        Action::Upgrade => upgrade(state, action_config)?,
        Action::Reputation => reputation(state, economy_config, action_config)?,
        Action::HireStaff => hire_staff(state, action_config)?,
        Action::HireSecurity => hire_security(state, action_config)?,
        Action::InvestMoney => invest_money(state, action_config)?,
        Action::InvestigateSpy => investigate_spy(state, action_config)?,
        Action::PurgeSpy => purge_spy(state, action_config)?,
    };
    debug!(%action, ?outcome, money = state.money, "Action resolved");
    Ok(outcome)
}

fn work(
    state: &mut WorldState,
    economy_config: &EconomyConfig,
    config: &ActionConfig,
    rng: &mut dyn RandomSource,
) -> Result<ActionOutcome, EconomyError> {
    let draw = rng.range_inclusive(config.work_min, config.work_max);
    let bonus = economy::rep_bonus(state.reputation, economy_config);
    let earn = economy::floor_scaled(draw, bonus, "work income")?;
    economy::credit(state, earn)?;
    economy::gain_rep(state, config.work_rep_gain, economy_config);
    state.log(format!("Work income +{earn}"));
    Ok(ActionOutcome::Applied)
}

fn upgrade(state: &mut WorldState, config: &ActionConfig) -> Result<ActionOutcome, EconomyError> {
    let cost = i64::from(state.auto_level)
        .checked_add(1)
        .and_then(|next| next.checked_mul(config.upgrade_cost_step))
        .ok_or(EconomyError::Overflow {
            what: "upgrade cost",
        })?;
    if state.money < cost {
        return Ok(ActionOutcome::Ignored);
    }
    economy::debit(state, cost)?;
    state.auto_level = state.auto_level.saturating_add(1);
    state.log(format!("Auto income upgraded to level {}", state.auto_level));
    Ok(ActionOutcome::Applied)
}

fn reputation(
    state: &mut WorldState,
    economy_config: &EconomyConfig,
    config: &ActionConfig,
) -> Result<ActionOutcome, EconomyError> {
    if state.money < config.reputation_cost {
        return Ok(ActionOutcome::Ignored);
    }
    economy::debit(state, config.reputation_cost)?;
    economy::gain_rep(state, config.reputation_rep_gain, economy_config);
    state.log("Reputation campaign run");
    Ok(ActionOutcome::Applied)
}

fn hire_staff(state: &mut WorldState, config: &ActionConfig) -> Result<ActionOutcome, EconomyError> {
    if state.money < config.hire_staff_cost || state.reputation < config.hire_staff_min_reputation {
        return Ok(ActionOutcome::Ignored);
    }
    economy::debit(state, config.hire_staff_cost)?;
    state.staff = state.staff.saturating_add(1);
    state.log("Hired a staff member");
    Ok(ActionOutcome::Applied)
}

fn hire_security(
    state: &mut WorldState,
    config: &ActionConfig,
) -> Result<ActionOutcome, EconomyError> {
    if state.money < config.hire_security_cost {
        return Ok(ActionOutcome::Ignored);
    }
    economy::debit(state, config.hire_security_cost)?;
    state.security = state.security.saturating_add(1);
    state.log("Hired a security guard");
    Ok(ActionOutcome::Applied)
}

fn invest_money(
    state: &mut WorldState,
    config: &ActionConfig,
) -> Result<ActionOutcome, EconomyError> {
    let amount = state.money.min(config.invest_cap);
    if amount <= 0 {
        return Ok(ActionOutcome::Ignored);
    }
    economy::debit(state, amount)?;
    state.invested = state
        .invested
        .checked_add(amount)
        .ok_or(EconomyError::Overflow { what: "invested" })?;
    state.log(format!("Invested {amount}"));
    Ok(ActionOutcome::Applied)
}

fn investigate_spy(
    state: &mut WorldState,
    config: &ActionConfig,
) -> Result<ActionOutcome, EconomyError> {
    if state.money < config.investigate_spy_cost || !state.spy_active {
        return Ok(ActionOutcome::Ignored);
    }
    economy::debit(state, config.investigate_spy_cost)?;
    state.spy_level = state.spy_level.saturating_sub(1);
    state.log("Spy activity partially suppressed");
    Ok(ActionOutcome::Applied)
}

fn purge_spy(state: &mut WorldState, config: &ActionConfig) -> Result<ActionOutcome, EconomyError> {
    if state.money < config.purge_spy_cost
        || state.security < config.purge_spy_min_security
        || !state.spy_active
    {
        return Ok(ActionOutcome::Ignored);
    }
    economy::debit(state, config.purge_spy_cost)?;
    // The suspect and hint stay recorded; only an accusation or a new
    // infiltration replaces them.
    state.spy_active = false;
    state.spy_level = 0;
    state.log("Spy purged completely");
    Ok(ActionOutcome::Applied)
}
