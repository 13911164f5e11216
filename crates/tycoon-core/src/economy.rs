//! Economy model: reputation curve, bonuses, and rate arithmetic.
//!
//! Everything here is a pure function of the current state and
//! configuration. The only mutating helpers are [`gain_rep`] and the
//! cash movements, which document exactly what they touch.
//!
//! Fractional rates are exact [`Decimal`] values. Scaling an integer by a
//! rate always rounds toward negative infinity ([`floor_scaled`]).

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::info;
use tycoon_types::WorldState;

use crate::config::{EconomyConfig, ThreatConfig};

/// Errors from economy arithmetic.
#[derive(Debug, thiserror::Error)]
pub enum EconomyError {
    /// A quantity left the representable range.
    #[error("arithmetic overflow computing {what}")]
    Overflow {
        /// The quantity being computed.
        what: &'static str,
    },
}

/// Experience needed to advance from `level` to `level + 1`.
///
/// `rep_base_need + level * rep_need_growth`, strictly increasing in
/// `level` whenever `rep_need_growth > 0`.
pub const fn rep_need(level: u32, config: &EconomyConfig) -> u32 {
    config
        .rep_base_need
        .saturating_add(level.saturating_mul(config.rep_need_growth))
}

/// Add reputation experience, crossing as many levels as it covers.
///
/// Appends one level-up log entry per level gained. Afterwards
/// `rep_exp < rep_need(reputation)` holds. Returns the number of levels
/// gained.
pub fn gain_rep(state: &mut WorldState, amount: u32, config: &EconomyConfig) -> u32 {
    state.rep_exp = state.rep_exp.saturating_add(amount);
    let mut levels = 0_u32;
    loop {
        let need = rep_need(state.reputation, config);
        // A zero threshold would never terminate; validation forbids it.
        if need == 0 || state.rep_exp < need {
            break;
        }
        state.rep_exp = state.rep_exp.saturating_sub(need);
        state.reputation = state.reputation.saturating_add(1);
        levels = levels.saturating_add(1);
        state.log(format!("Reputation rose to level {}", state.reputation));
        info!(reputation = state.reputation, "Reputation level up");
    }
    levels
}

/// Multiplier applied to manual income: `1 + reputation * rep_bonus_per_level`.
pub fn rep_bonus(reputation: u32, config: &EconomyConfig) -> Decimal {
    Decimal::from(reputation)
        .checked_mul(config.rep_bonus_per_level)
        .and_then(|bonus| bonus.checked_add(Decimal::ONE))
        .unwrap_or(Decimal::MAX)
}

/// Fraction of spy damage mitigated by security guards:
/// `min(security * per_guard, cap)`.
pub fn security_reduction(security: u32, config: &ThreatConfig) -> Decimal {
    Decimal::from(security)
        .checked_mul(config.security_reduction_per_guard)
        .map_or(config.security_reduction_cap, |raw| {
            raw.min(config.security_reduction_cap)
        })
}

/// Fraction of cash a spy at `level` takes per call, after mitigation:
/// `(base_loss + level * loss_per_level) * (1 - security_reduction)`.
pub fn spy_loss_rate(level: u32, security: u32, config: &ThreatConfig) -> Decimal {
    let raw = Decimal::from(level)
        .checked_mul(config.loss_per_level)
        .and_then(|per_level| per_level.checked_add(config.base_loss))
        .unwrap_or(Decimal::MAX);
    let kept = Decimal::ONE
        .checked_sub(security_reduction(security, config))
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);
    raw.checked_mul(kept).unwrap_or(Decimal::MAX)
}

/// `floor(value * rate)` as an integer.
///
/// # Errors
///
/// Returns [`EconomyError::Overflow`] if the product does not fit in `i64`.
pub fn floor_scaled(value: i64, rate: Decimal, what: &'static str) -> Result<i64, EconomyError> {
    Decimal::from(value)
        .checked_mul(rate)
        .and_then(|product| product.floor().to_i64())
        .ok_or(EconomyError::Overflow { what })
}

/// Income produced by one auto-income tick:
/// `auto_level * per_level + staff * staff_effect + floor(invested * invest_mult)`.
///
/// # Errors
///
/// Returns [`EconomyError::Overflow`] if the income does not fit in `i64`.
pub fn auto_income_per_tick(state: &WorldState, config: &EconomyConfig) -> Result<i64, EconomyError> {
    let overflow = || EconomyError::Overflow {
        what: "auto income",
    };
    let from_level = i64::from(state.auto_level)
        .checked_mul(config.auto_income_per_level)
        .ok_or_else(overflow)?;
    let from_staff = i64::from(state.staff)
        .checked_mul(config.staff_effect)
        .ok_or_else(overflow)?;
    let from_investment = floor_scaled(state.invested, config.invest_mult, "investment return")?;
    from_level
        .checked_add(from_staff)
        .and_then(|sum| sum.checked_add(from_investment))
        .ok_or_else(overflow)
}

/// Add `amount` to cash.
///
/// # Errors
///
/// Returns [`EconomyError::Overflow`] if cash would overflow.
pub fn credit(state: &mut WorldState, amount: i64) -> Result<(), EconomyError> {
    state.money = state
        .money
        .checked_add(amount)
        .ok_or(EconomyError::Overflow { what: "money" })?;
    Ok(())
}

/// Remove `amount` from cash. Affordability is the caller's concern.
///
/// # Errors
///
/// Returns [`EconomyError::Overflow`] if cash would underflow.
pub fn debit(state: &mut WorldState, amount: i64) -> Result<(), EconomyError> {
    state.money = state
        .money
        .checked_sub(amount)
        .ok_or(EconomyError::Overflow { what: "money" })?;
    Ok(())
}
