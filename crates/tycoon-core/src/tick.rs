//! Tick engine: catches the world up to "now".
//!
//! Each call to [`advance`] runs four independently gated phases in a
//! fixed order:
//!
//! 1. **Auto income** -- pay out every whole auto-income interval that has
//!    elapsed since the last payout.
//! 2. **Settlement** -- when a settlement interval has elapsed, record the
//!    profit since the previous settlement. At most one settlement fires per
//!    call, however large the backlog.
//! 3. **Threat emergence** -- when no spy is active and reputation is high
//!    enough, a percentage roll may plant one.
//! 4. **Threat escalation and damage** -- an active spy gains one level per
//!    elapsed escalation interval, then skims cash and reputation.
//!
//! Income is credited before the settlement snapshot so a settlement sees
//! it. Emergence runs before escalation, so a spy planted in this call
//! starts from `now` and takes no escalation step, but does take one damage
//! step at base rate.
//!
//! Calling [`advance`] twice with the same `now` does no interval work the
//! second time; only the per-call threat roll and damage step can repeat.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use tycoon_types::{SpyHint, Suspect, WorldState};

use crate::clock::{self, ClockError};
use crate::config::{EconomyConfig, ThreatConfig};
use crate::economy::{self, EconomyError};
use crate::random::RandomSource;

/// Errors that can occur while advancing the world.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A time mark could not be advanced.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// An economy quantity overflowed.
    #[error("economy error: {source}")]
    Economy {
        /// The underlying economy error.
        #[from]
        source: EconomyError,
    },
}

/// Cash and reputation taken by the spy in one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpyDamage {
    /// Cash lost.
    pub money: i64,
    /// Reputation levels lost (before flooring at zero).
    pub reputation: u32,
}

/// Summary of one [`advance`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Number of auto-income intervals paid out.
    pub auto_ticks: i64,
    /// Total auto income credited.
    pub auto_income: i64,
    /// Profit recorded by the settlement, if one fired.
    pub settled_profit: Option<i64>,
    /// Whether a spy was planted during this call.
    pub spy_spawned: bool,
    /// Number of escalation intervals consumed.
    pub spy_escalations: i64,
    /// Damage dealt by the spy, if any.
    pub spy_damage: Option<SpyDamage>,
}

/// Advance every time-dependent subsystem to `now`.
///
/// # Errors
///
/// Returns [`TickError`] if a time mark or a cash amount would overflow.
/// Phases that completed before the error keep their effects.
pub fn advance(
    state: &mut WorldState,
    economy_config: &EconomyConfig,
    threat_config: &ThreatConfig,
    now: DateTime<Utc>,
    rng: &mut dyn RandomSource,
) -> Result<TickReport, TickError> {
    let mut report = TickReport::default();

    // --- Phase 1: Auto income ---
    let (auto_ticks, auto_income) = phase_auto_income(state, economy_config, now)?;
    report.auto_ticks = auto_ticks;
    report.auto_income = auto_income;

    // --- Phase 2: Settlement ---
    report.settled_profit = phase_settlement(state, economy_config, now)?;

    // --- Phase 3: Threat emergence ---
    report.spy_spawned = phase_threat_emergence(state, threat_config, now, rng);

    // --- Phase 4: Escalation + damage ---
    if state.spy_active {
        report.spy_escalations = phase_escalation(state, threat_config, now)?;
        report.spy_damage = phase_damage(state, threat_config)?;
    }

    Ok(report)
}

/// Pay out all whole auto-income intervals since the last payout.
fn phase_auto_income(
    state: &mut WorldState,
    config: &EconomyConfig,
    now: DateTime<Utc>,
) -> Result<(i64, i64), TickError> {
    let interval = config.auto_interval();
    let ticks = clock::whole_intervals(state.last_auto_time, now, interval);
    if ticks <= 0 {
        return Ok((0, 0));
    }

    let per_tick = economy::auto_income_per_tick(state, config)?;
    let income = per_tick
        .checked_mul(ticks)
        .ok_or(EconomyError::Overflow {
            what: "auto income",
        })?;
    economy::credit(state, income)?;
    state.last_auto_time = clock::advance_mark(state.last_auto_time, interval, ticks)?;

    if income > 0 {
        state.log(format!("Auto income +{income}"));
    }
    debug!(ticks, income, money = state.money, "Auto income accrued");
    Ok((ticks, income))
}

/// Record one settlement if at least one interval has elapsed.
fn phase_settlement(
    state: &mut WorldState,
    config: &EconomyConfig,
    now: DateTime<Utc>,
) -> Result<Option<i64>, TickError> {
    let interval = config.settle_interval();
    if clock::whole_intervals(state.last_settle_time, now, interval) < 1 {
        return Ok(None);
    }

    let profit = state
        .money
        .checked_sub(state.money_at_settle)
        .ok_or(EconomyError::Overflow {
            what: "settlement profit",
        })?;
    state.income_history.push(profit);
    state.money_at_settle = state.money;
    // One interval per call, even when several are overdue.
    state.last_settle_time = clock::advance_mark(state.last_settle_time, interval, 1)?;

    state.log(format!("Settlement profit: {profit}"));
    info!(profit, settlements = state.income_history.len(), "Settlement recorded");
    Ok(Some(profit))
}

/// Roll for a new spy. Returns whether one was planted.
fn phase_threat_emergence(
    state: &mut WorldState,
    config: &ThreatConfig,
    now: DateTime<Utc>,
    rng: &mut dyn RandomSource,
) -> bool {
    if state.spy_active || state.reputation < config.min_reputation {
        return false;
    }
    if rng.roll_percent() >= config.spawn_chance_percent {
        return false;
    }

    let suspect = Suspect::ALL
        .get(rng.pick_index(Suspect::ALL.len()))
        .copied()
        .unwrap_or(Suspect::EmployeeA);
    let hint = SpyHint::ALL
        .get(rng.pick_index(SpyHint::ALL.len()))
        .copied()
        .unwrap_or(SpyHint::ActsOnReputationGain);

    state.spy_active = true;
    state.spy_level = 0;
    state.last_spy_tick = now;
    state.internal_suspect = Some(suspect);
    state.spy_hint = Some(hint);
    state.spy_log(format!(
        "Spy infiltration! One of the staff is a traitor. Clue: {hint}"
    ));

    info!(hint = hint.description(), "Spy planted");
    true
}

/// Raise the threat level once per elapsed escalation interval.
fn phase_escalation(
    state: &mut WorldState,
    config: &ThreatConfig,
    now: DateTime<Utc>,
) -> Result<i64, TickError> {
    let interval = config.escalate_interval();
    let spy_ticks = clock::whole_intervals(state.last_spy_tick, now, interval);
    if spy_ticks <= 0 {
        return Ok(0);
    }

    let raised = i64::from(state.spy_level)
        .saturating_add(spy_ticks)
        .min(i64::from(config.max_level));
    state.spy_level = u32::try_from(raised).unwrap_or(config.max_level);
    state.last_spy_tick = clock::advance_mark(state.last_spy_tick, interval, spy_ticks)?;

    state.spy_log(format!(
        "Spy activity intensifies (threat level {})",
        state.spy_level
    ));
    debug!(spy_ticks, spy_level = state.spy_level, "Spy escalated");
    Ok(spy_ticks)
}

/// Skim cash and reputation. Runs on every call while a spy is active.
fn phase_damage(
    state: &mut WorldState,
    config: &ThreatConfig,
) -> Result<Option<SpyDamage>, TickError> {
    let rate = economy::spy_loss_rate(state.spy_level, state.security, config);
    let loss = economy::floor_scaled(state.money, rate, "spy damage")?;
    if loss <= 0 {
        return Ok(None);
    }

    economy::debit(state, loss)?;
    let rep_loss = state.spy_level.checked_div(2).unwrap_or(0).saturating_add(1);
    state.reputation = state.reputation.saturating_sub(rep_loss);
    state.spy_log(format!(
        "[Spy damage] -{loss} money / reputation -{rep_loss}"
    ));

    debug!(loss, rep_loss, money = state.money, "Spy damage applied");
    Ok(Some(SpyDamage {
        money: loss,
        reputation: rep_loss,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::random::ScriptedRandom;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn run(state: &mut WorldState, now: DateTime<Utc>, rng: &mut ScriptedRandom) -> TickReport {
        advance(
            state,
            &EconomyConfig::default(),
            &ThreatConfig::default(),
            now,
            rng,
        )
        .unwrap()
    }

    fn secs(s: i64) -> TimeDelta {
        TimeDelta::seconds(s)
    }

    #[test]
    fn no_elapsed_time_is_a_no_op() {
        let mut state = WorldState::new(t0(), 100);
        state.auto_level = 1;
        let before = state.clone();
        let report = run(&mut state, t0(), &mut ScriptedRandom::new());
        assert_eq!(report, TickReport::default());
        assert_eq!(state, before);
    }

    #[test]
    fn auto_income_is_interval_quantized() {
        let mut state = WorldState::new(t0(), 100);
        state.auto_level = 1;
        let mut rng = ScriptedRandom::new();

        // 2.5 intervals -> 2 ticks.
        let report = run(&mut state, t0() + TimeDelta::milliseconds(25_000), &mut rng);
        assert_eq!(report.auto_ticks, 2);
        assert_eq!(state.money, 120);
        assert_eq!(state.last_auto_time, t0() + secs(20));

        // Another 0.5 interval completes the third tick.
        let report = run(&mut state, t0() + secs(30), &mut rng);
        assert_eq!(report.auto_ticks, 1);
        assert_eq!(state.money, 130);
        assert_eq!(state.last_auto_time, t0() + secs(30));
    }

    #[test]
    fn zero_income_advances_mark_without_logging() {
        let mut state = WorldState::new(t0(), 100);
        let report = run(&mut state, t0() + secs(35), &mut ScriptedRandom::new());
        assert_eq!(report.auto_ticks, 3);
        assert_eq!(report.auto_income, 0);
        assert_eq!(state.last_auto_time, t0() + secs(30));
        assert!(state.logs.is_empty());
    }

    #[test]
    fn repeated_now_does_no_extra_work() {
        let mut state = WorldState::new(t0(), 100);
        state.staff = 2;
        let mut rng = ScriptedRandom::new();
        let now = t0() + secs(200);
        run(&mut state, now, &mut rng);
        let after_first = state.clone();
        let report = run(&mut state, now, &mut rng);
        assert_eq!(report, TickReport::default());
        assert_eq!(state, after_first);
    }

    #[test]
    fn settlement_sees_income_credited_in_same_call() {
        let mut state = WorldState::new(t0(), 100);
        state.auto_level = 1;
        let report = run(&mut state, t0() + secs(180), &mut ScriptedRandom::new());
        // 18 ticks * 10
        assert_eq!(report.auto_income, 180);
        assert_eq!(report.settled_profit, Some(180));
        assert_eq!(state.income_history, vec![180]);
        assert_eq!(state.money_at_settle, 280);
    }

    #[test]
    fn settlement_fires_once_per_call_despite_backlog() {
        let mut state = WorldState::new(t0(), 100);
        let mut rng = ScriptedRandom::new();
        run(&mut state, t0() + secs(3 * 180), &mut rng);
        assert_eq!(state.income_history.len(), 1);
        assert_eq!(state.last_settle_time, t0() + secs(180));

        // The backlog drains one interval per call.
        run(&mut state, t0() + secs(3 * 180), &mut rng);
        run(&mut state, t0() + secs(3 * 180), &mut rng);
        run(&mut state, t0() + secs(3 * 180), &mut rng);
        assert_eq!(state.income_history.len(), 3);
        assert_eq!(state.last_settle_time, t0() + secs(3 * 180));
    }

    #[test]
    fn settlement_logs_negative_profit() {
        let mut state = WorldState::new(t0(), 100);
        state.money = 40;
        run(&mut state, t0() + secs(180), &mut ScriptedRandom::new());
        assert_eq!(state.income_history, vec![-60]);
        assert_eq!(state.logs.last().unwrap(), "Settlement profit: -60");
    }

    #[test]
    fn low_reputation_never_rolls_for_a_spy() {
        let mut state = WorldState::new(t0(), 100);
        state.reputation = 4;
        let mut rng = ScriptedRandom::new().with_rolls([0]);
        let report = run(&mut state, t0(), &mut rng);
        assert!(!report.spy_spawned);
        assert_eq!(rng.rolls_remaining(), 1);
    }

    #[test]
    fn failed_roll_plants_nothing() {
        let mut state = WorldState::new(t0(), 100);
        state.reputation = 5;
        let report = run(&mut state, t0(), &mut ScriptedRandom::new().with_rolls([15]));
        assert!(!report.spy_spawned);
        assert!(!state.spy_active);
    }

    #[test]
    fn spawn_takes_base_damage_without_escalating() {
        let mut state = WorldState::new(t0() - secs(600), 1000);
        state.last_auto_time = t0();
        state.last_settle_time = t0();
        state.reputation = 6;
        let mut rng = ScriptedRandom::new().with_rolls([14]).with_picks([1, 2]);

        let report = run(&mut state, t0(), &mut rng);

        assert!(report.spy_spawned);
        assert_eq!(report.spy_escalations, 0);
        assert!(state.spy_active);
        assert_eq!(state.spy_level, 0);
        assert_eq!(state.last_spy_tick, t0());
        assert_eq!(state.internal_suspect, Some(Suspect::EmployeeB));
        assert_eq!(state.spy_hint, Some(SpyHint::SkipsStaffMeetings));
        // floor(1000 * 0.05), reputation -1
        assert_eq!(
            report.spy_damage,
            Some(SpyDamage {
                money: 50,
                reputation: 1
            })
        );
        assert_eq!(state.money, 950);
        assert_eq!(state.reputation, 5);
    }

    #[test]
    fn spawn_alert_shows_hint_but_not_suspect() {
        let mut state = WorldState::new(t0(), 1000);
        state.reputation = 5;
        let mut rng = ScriptedRandom::new().with_rolls([0]).with_picks([0, 1]);
        run(&mut state, t0(), &mut rng);

        let alert = state.spy_logs.first().unwrap();
        assert!(alert.contains(SpyHint::InterestedInInvestment.description()));
        for suspect in Suspect::ALL {
            assert!(!alert.contains(suspect.label()));
        }
        for entry in &state.spy_logs {
            assert!(state.logs.contains(entry));
        }
    }

    #[test]
    fn escalation_consumes_whole_intervals_and_caps() {
        let mut state = WorldState::new(t0(), 0);
        state.spy_active = true;
        state.internal_suspect = Some(Suspect::EmployeeC);
        let mut rng = ScriptedRandom::new();

        let report = run(&mut state, t0() + secs(75), &mut rng);
        assert_eq!(report.spy_escalations, 2);
        assert_eq!(state.spy_level, 2);
        assert_eq!(state.last_spy_tick, t0() + secs(60));

        run(&mut state, t0() + secs(60 + 30 * 10), &mut rng);
        assert_eq!(state.spy_level, 5);
        assert_eq!(state.last_spy_tick, t0() + secs(360));
    }

    #[test]
    fn damage_scales_with_level_and_security() {
        let mut state = WorldState::new(t0(), 1000);
        state.spy_active = true;
        state.spy_level = 4;
        state.security = 1;
        state.reputation = 10;
        let report = run(&mut state, t0(), &mut ScriptedRandom::new());
        // (0.05 + 0.12) * 0.8 = 0.136 -> 136; rep loss 1 + 4/2 = 3
        assert_eq!(
            report.spy_damage,
            Some(SpyDamage {
                money: 136,
                reputation: 3
            })
        );
        assert_eq!(state.money, 864);
        assert_eq!(state.reputation, 7);
    }

    #[test]
    fn damage_floors_reputation_at_zero() {
        let mut state = WorldState::new(t0(), 1000);
        state.spy_active = true;
        state.spy_level = 5;
        state.reputation = 1;
        run(&mut state, t0(), &mut ScriptedRandom::new());
        assert_eq!(state.reputation, 0);
    }

    #[test]
    fn no_damage_when_loss_rounds_to_zero() {
        let mut state = WorldState::new(t0(), 10);
        state.spy_active = true;
        state.reputation = 3;
        let report = run(&mut state, t0(), &mut ScriptedRandom::new());
        assert_eq!(report.spy_damage, None);
        assert_eq!(state.money, 10);
        assert_eq!(state.reputation, 3);
        assert!(state.spy_logs.is_empty());
    }
}
