//! Accusation resolver: the player names the employee they believe is the
//! spy.
//!
//! A correct guess ends the threat for good. A wrong guess costs a share of
//! cash and one reputation level, and the spy keeps operating.

use tracing::info;
use tycoon_types::{AccusationOutcome, AccusationResult, Suspect, WorldState};

use crate::config::ThreatConfig;
use crate::economy::{self, EconomyError};

/// Resolve `guess` against the hidden spy identity.
///
/// With no active spy nothing changes and the outcome is
/// [`AccusationOutcome::NoActiveThreat`]. Guesses that do not name a known
/// suspect count as wrong.
///
/// # Errors
///
/// Returns [`EconomyError::Overflow`] if the penalty cannot be computed.
pub fn accuse(
    state: &mut WorldState,
    guess: &str,
    config: &ThreatConfig,
) -> Result<AccusationResult, EconomyError> {
    if !state.spy_active {
        return Ok(result(
            state,
            AccusationOutcome::NoActiveThreat,
            "There is no spy to accuse!".to_owned(),
        ));
    }

    let spy = state.internal_suspect;
    if let Some(suspect) = Suspect::parse_guess(guess).filter(|named| Some(*named) == spy) {
        let label = suspect.label();
        state.clear_threat();
        state.log(format!(
            "Found the traitor {label} and removed the spy for good!"
        ));
        info!(suspect = label, "Spy identified");
        return Ok(result(
            state,
            AccusationOutcome::Correct,
            "Correct! The spy has been removed.".to_owned(),
        ));
    }

    let penalty = economy::floor_scaled(state.money.max(0), config.accusation_penalty, "penalty")?;
    economy::debit(state, penalty)?;
    state.reputation = state.reputation.saturating_sub(1);
    state.log(format!(
        "{guess} is not the traitor. Money -{penalty}, reputation -1"
    ));
    info!(guess, penalty, "Wrong accusation");
    Ok(result(
        state,
        AccusationOutcome::Wrong,
        format!("Wrong. {guess} is not the traitor."),
    ))
}

fn result(state: &WorldState, outcome: AccusationOutcome, message: String) -> AccusationResult {
    AccusationResult {
        outcome,
        result: message,
        money: state.money,
        reputation: state.reputation,
    }
}
