//! Random source abstraction.
//!
//! The engine makes three kinds of random draws: a percentage roll for
//! threat emergence, an inclusive integer range for manual work income,
//! and a uniform index pick for the suspect and hint. [`RandomSource`]
//! exposes exactly those, so tests can script outcomes with
//! [`ScriptedRandom`] while production uses the seedable [`SeededRandom`].

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of the random draws the engine needs.
pub trait RandomSource: Send {
    /// Uniform roll in `0..100`.
    fn roll_percent(&mut self) -> u32;

    /// Uniform integer in `low..=high`. Returns `low` if the range is empty.
    fn range_inclusive(&mut self, low: i64, high: i64) -> i64;

    /// Uniform index in `0..len`. Returns 0 if `len` is 0.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Production random source backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Deterministic source: the same seed replays the same game.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from operating system entropy.
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seed from `seed` when given, otherwise from the OS.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os, Self::from_seed)
    }
}

impl RandomSource for SeededRandom {
    fn roll_percent(&mut self) -> u32 {
        self.rng.random_range(0..100)
    }

    fn range_inclusive(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// A random source that replays queued values, for deterministic tests.
///
/// When a queue runs dry the source falls back to a fixed answer: rolls
/// return 99 (so percentage checks fail), ranges return `low`, and picks
/// return 0. Scripted range values are clamped into the requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    rolls: VecDeque<u32>,
    draws: VecDeque<i64>,
    picks: VecDeque<usize>,
}

impl ScriptedRandom {
    /// An empty script: every draw takes its fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue percentage rolls.
    #[must_use]
    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = u32>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    /// Queue inclusive-range draws.
    #[must_use]
    pub fn with_draws(mut self, draws: impl IntoIterator<Item = i64>) -> Self {
        self.draws.extend(draws);
        self
    }

    /// Queue index picks.
    #[must_use]
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Number of queued rolls not yet consumed.
    pub fn rolls_remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn roll_percent(&mut self) -> u32 {
        self.rolls.pop_front().unwrap_or(99).min(99)
    }

    fn range_inclusive(&mut self, low: i64, high: i64) -> i64 {
        self.draws
            .pop_front()
            .map_or(low, |draw| draw.clamp(low, high.max(low)))
    }

    fn pick_index(&mut self, len: usize) -> usize {
        let pick = self.picks.pop_front().unwrap_or(0);
        pick.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_random_is_reproducible() {
        let mut a = SeededRandom::from_seed(42);
        let mut b = SeededRandom::from_seed(42);
        for _ in 0..50 {
            assert_eq!(a.roll_percent(), b.roll_percent());
            assert_eq!(a.range_inclusive(20, 40), b.range_inclusive(20, 40));
            assert_eq!(a.pick_index(3), b.pick_index(3));
        }
    }

    #[test]
    fn seeded_random_stays_in_range() {
        let mut rng = SeededRandom::from_seed(7);
        for _ in 0..500 {
            assert!(rng.roll_percent() < 100);
            let draw = rng.range_inclusive(20, 40);
            assert!((20..=40).contains(&draw));
            assert!(rng.pick_index(3) < 3);
        }
    }

    #[test]
    fn seeded_random_degenerate_ranges() {
        let mut rng = SeededRandom::from_seed(1);
        assert_eq!(rng.range_inclusive(30, 30), 30);
        assert_eq!(rng.range_inclusive(40, 20), 40);
        assert_eq!(rng.pick_index(0), 0);
    }

    #[test]
    fn scripted_random_replays_then_falls_back() {
        let mut rng = ScriptedRandom::new()
            .with_rolls([3])
            .with_draws([30])
            .with_picks([2]);
        assert_eq!(rng.roll_percent(), 3);
        assert_eq!(rng.roll_percent(), 99);
        assert_eq!(rng.range_inclusive(20, 40), 30);
        assert_eq!(rng.range_inclusive(20, 40), 20);
        assert_eq!(rng.pick_index(3), 2);
        assert_eq!(rng.pick_index(3), 0);
    }

    #[test]
    fn scripted_random_clamps() {
        let mut rng = ScriptedRandom::new().with_draws([500]).with_picks([9]);
        assert_eq!(rng.range_inclusive(20, 40), 40);
        assert_eq!(rng.pick_index(3), 2);
    }
}
