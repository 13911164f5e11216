//! The world state aggregate.
//!
//! [`WorldState`] is deliberately plain data: every rule that mutates it
//! lives in `tycoon-core`. It serializes as a flat JSON object that the
//! game API returns verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{SpyHint, Suspect};

/// The single mutable aggregate advanced by the tick engine and mutated
/// by player actions.
///
/// Timestamps are high-water marks. The tick engine only ever moves them
/// forward by whole multiples of their interval, so partial progress
/// toward the next tick is never lost between calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldState {
    /// Cash on hand.
    pub money: i64,
    /// Reputation level.
    pub reputation: u32,
    /// Progress toward the next reputation level.
    pub rep_exp: u32,
    /// Purchased auto-income level.
    pub auto_level: u32,
    /// Staff headcount.
    pub staff: u32,
    /// Security guard headcount.
    pub security: u32,
    /// Cumulative capital moved into investments.
    pub invested: i64,

    /// Auto-income high-water mark.
    pub last_auto_time: DateTime<Utc>,
    /// Settlement high-water mark.
    pub last_settle_time: DateTime<Utc>,
    /// Money snapshot taken at the last settlement.
    pub money_at_settle: i64,

    /// Whether a spy is currently operating.
    pub spy_active: bool,
    /// Threat level of the active spy (0 when inactive).
    pub spy_level: u32,
    /// Escalation high-water mark.
    pub last_spy_tick: DateTime<Utc>,
    /// Identity of the spy, if one has been planted.
    pub internal_suspect: Option<Suspect>,
    /// Clue published when the spy appeared. Serialized as the clue text.
    #[serde(with = "hint_text", default)]
    #[ts(type = "string | null")]
    pub spy_hint: Option<SpyHint>,

    /// Append-only activity log.
    pub logs: Vec<String>,
    /// Threat-related subset of `logs`.
    pub spy_logs: Vec<String>,
    /// Profit of each settlement interval, oldest first.
    pub income_history: Vec<i64>,
}

impl WorldState {
    /// Fresh state for a new company.
    ///
    /// All time marks start at `now` and the settlement snapshot equals
    /// the starting cash, so the first interval measures profit from zero.
    pub const fn new(now: DateTime<Utc>, starting_money: i64) -> Self {
        Self {
            money: starting_money,
            reputation: 0,
            rep_exp: 0,
            auto_level: 0,
            staff: 0,
            security: 0,
            invested: 0,
            last_auto_time: now,
            last_settle_time: now,
            money_at_settle: starting_money,
            spy_active: false,
            spy_level: 0,
            last_spy_tick: now,
            internal_suspect: None,
            spy_hint: None,
            logs: Vec::new(),
            spy_logs: Vec::new(),
            income_history: Vec::new(),
        }
    }

    /// Append an entry to the activity log.
    pub fn log(&mut self, message: impl Into<String>) {
        self.logs.push(message.into());
    }

    /// Append a threat-related entry to both the spy log and the activity log.
    pub fn spy_log(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.spy_logs.push(message.clone());
        self.logs.push(message);
    }

    /// Clear the threat sub-state completely, including the suspect and hint.
    pub const fn clear_threat(&mut self) {
        self.spy_active = false;
        self.spy_level = 0;
        self.internal_suspect = None;
        self.spy_hint = None;
    }
}

/// Serde adapter carrying a hint as the text the player reads.
///
/// Reading also accepts the wire id, and an empty string as no hint.
mod hint_text {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::enums::SpyHint;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(hint: &Option<SpyHint>, s: S) -> Result<S::Ok, S::Error> {
        match hint {
            Some(hint) => s.serialize_some(hint.description()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SpyHint>, D::Error> {
        let Some(text) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        SpyHint::parse(&text)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unknown spy hint: {text}")))
    }
}
