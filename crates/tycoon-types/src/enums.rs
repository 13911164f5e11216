//! Enumeration types for the Tycoon simulation.
//!
//! Player actions arrive on the wire as plain strings (`"work"`,
//! `"hire_staff"`, ...). They are parsed once at the boundary into the
//! closed [`Action`] enum so the resolver can match exhaustively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Player actions
// ---------------------------------------------------------------------------

/// A discrete player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Action {
    /// Manual work for a randomized payout scaled by reputation.
    Work,
    /// Buy the next auto-income level.
    Upgrade,
    /// Pay for reputation management.
    Reputation,
    /// Hire a staff member (requires some reputation).
    HireStaff,
    /// Hire a security guard, mitigating spy damage.
    HireSecurity,
    /// Move cash into investments that pay out on every auto-income tick.
    InvestMoney,
    /// Suppress an active spy by one threat level.
    InvestigateSpy,
    /// Remove an active spy outright (requires security staff).
    PurgeSpy,
}

impl Action {
    /// Every action, in menu order.
    pub const ALL: [Self; 8] = [
        Self::Work,
        Self::Upgrade,
        Self::Reputation,
        Self::HireStaff,
        Self::HireSecurity,
        Self::InvestMoney,
        Self::InvestigateSpy,
        Self::PurgeSpy,
    ];

    /// The wire identifier of this action.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Upgrade => "upgrade",
            Self::Reputation => "reputation",
            Self::HireStaff => "hire_staff",
            Self::HireSecurity => "hire_security",
            Self::InvestMoney => "invest_money",
            Self::InvestigateSpy => "investigate_spy",
            Self::PurgeSpy => "purge_spy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an action name does not match any [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {name}")]
pub struct UnknownActionError {
    /// The name that failed to parse.
    pub name: String,
}

impl FromStr for Action {
    type Err = UnknownActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownActionError { name: s.to_owned() })
    }
}

// ---------------------------------------------------------------------------
// Threat sub-game
// ---------------------------------------------------------------------------

/// One of the employees who may be the internal spy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Suspect {
    /// Employee A.
    EmployeeA,
    /// Employee B.
    EmployeeB,
    /// Employee C.
    EmployeeC,
}

impl Suspect {
    /// The full suspect pool a new threat is drawn from.
    pub const ALL: [Self; 3] = [Self::EmployeeA, Self::EmployeeB, Self::EmployeeC];

    /// Wire identifier (`employee_a`, ...).
    pub const fn id(self) -> &'static str {
        match self {
            Self::EmployeeA => "employee_a",
            Self::EmployeeB => "employee_b",
            Self::EmployeeC => "employee_c",
        }
    }

    /// Human-readable name shown to the player.
    pub const fn label(self) -> &'static str {
        match self {
            Self::EmployeeA => "Employee A",
            Self::EmployeeB => "Employee B",
            Self::EmployeeC => "Employee C",
        }
    }

    /// Interpret a player's guess.
    ///
    /// Accepts either the label or the wire id, ignoring case and
    /// surrounding whitespace. Anything else is `None`, which the
    /// accusation resolver treats as a wrong guess.
    pub fn parse_guess(guess: &str) -> Option<Self> {
        let guess = guess.trim();
        Self::ALL.into_iter().find(|suspect| {
            guess.eq_ignore_ascii_case(suspect.id()) || guess.eq_ignore_ascii_case(suspect.label())
        })
    }
}

impl fmt::Display for Suspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A clue published when a spy infiltrates the company.
///
/// Hints are flavour for the deduction game; they never name the suspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SpyHint {
    /// The spy becomes active whenever reputation rises.
    ActsOnReputationGain,
    /// The spy shows interest in investments.
    InterestedInInvestment,
    /// The spy often skips staff meetings.
    SkipsStaffMeetings,
}

impl SpyHint {
    /// The full hint pool a new threat draws its clue from.
    pub const ALL: [Self; 3] = [
        Self::ActsOnReputationGain,
        Self::InterestedInInvestment,
        Self::SkipsStaffMeetings,
    ];

    /// Wire identifier (`acts_on_reputation_gain`, ...).
    pub const fn id(self) -> &'static str {
        match self {
            Self::ActsOnReputationGain => "acts_on_reputation_gain",
            Self::InterestedInInvestment => "interested_in_investment",
            Self::SkipsStaffMeetings => "skips_staff_meetings",
        }
    }

    /// Match clue text or a wire identifier back to a hint.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|hint| text == hint.description() || text == hint.id())
    }

    /// Clue text shown to the player.
    pub const fn description(self) -> &'static str {
        match self {
            Self::ActsOnReputationGain => "acts whenever reputation rises",
            Self::InterestedInInvestment => "shows interest in investments",
            Self::SkipsStaffMeetings => "often skips staff meetings",
        }
    }
}

impl fmt::Display for SpyHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// How an accusation was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AccusationOutcome {
    /// The guess named the spy; the threat is gone.
    Correct,
    /// The guess was wrong; a penalty was applied.
    Wrong,
    /// There was no active threat to accuse anyone of.
    NoActiveThreat,
}
