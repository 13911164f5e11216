//! Clock source and interval arithmetic for the Tycoon simulation.
//!
//! The engine never reads the system time directly. Each external call
//! asks the injected [`Clock`] for "now" exactly once and threads that
//! instant through every sub-advance, so a single call observes a single
//! point in time.
//!
//! # Design Principles
//!
//! - Elapsed time is measured in whole milliseconds and quantized into
//!   whole intervals with checked integer arithmetic (no floating point).
//! - High-water marks are moved forward by exact interval multiples via
//!   [`advance_mark`], never snapped to "now", so the fractional remainder
//!   toward the next interval carries over to the next call.
//! - A "now" earlier than a mark (clock skew) counts as zero intervals.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};

/// Errors that can occur during clock arithmetic.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Advancing a time mark left the representable range.
    #[error("time mark overflow: cannot advance {mark} by {count} x {interval_ms}ms")]
    MarkOverflow {
        /// The mark being advanced.
        mark: DateTime<Utc>,
        /// Number of intervals requested.
        count: i64,
        /// Interval length in milliseconds.
        interval_ms: i64,
    },
}

/// A source of the current instant.
///
/// Implementations must be cheap to call; the engine reads the clock once
/// per external operation.
pub trait Clock: Send + Sync {
    /// Return the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock for tests and replays.
///
/// Clones share the same underlying instant, so a test can hand one clone
/// to the engine and keep another to move time forward.
#[derive(Debug, Clone)]
pub struct ManualClock {
    /// Current instant as milliseconds since the Unix epoch.
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    /// Move the clock forward (or backward, for a negative delta).
    ///
    /// Saturates at the earliest and latest instants `chrono` can
    /// represent.
    pub fn advance(&self, delta: TimeDelta) {
        let step = |millis: i64| {
            let current = instant_from_millis(millis);
            let next = current.checked_add_signed(delta).unwrap_or(if delta < TimeDelta::zero() {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            });
            Some(next.timestamp_millis())
        };
        // The closure never declines, so the update always succeeds.
        let _ = self
            .millis
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, step);
    }

    /// Jump the clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.millis
            .store(instant.timestamp_millis(), Ordering::Release);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        instant_from_millis(self.millis.load(Ordering::Acquire))
    }
}

fn instant_from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Count how many whole `interval`s fit between `mark` and `now`.
///
/// Returns 0 when `now` is not after `mark` or when `interval` is not
/// positive.
pub fn whole_intervals(mark: DateTime<Utc>, now: DateTime<Utc>, interval: TimeDelta) -> i64 {
    let elapsed_ms = now.signed_duration_since(mark).num_milliseconds();
    if elapsed_ms <= 0 {
        return 0;
    }
    let interval_ms = interval.num_milliseconds();
    if interval_ms <= 0 {
        return 0;
    }
    elapsed_ms.checked_div(interval_ms).unwrap_or(0)
}

/// Move `mark` forward by exactly `count` intervals.
///
/// # Errors
///
/// Returns [`ClockError::MarkOverflow`] if the result is not representable.
pub fn advance_mark(
    mark: DateTime<Utc>,
    interval: TimeDelta,
    count: i64,
) -> Result<DateTime<Utc>, ClockError> {
    let interval_ms = interval.num_milliseconds();
    let overflow = || ClockError::MarkOverflow {
        mark,
        count,
        interval_ms,
    };
    let step_ms = interval_ms.checked_mul(count).ok_or_else(overflow)?;
    let step = TimeDelta::try_milliseconds(step_ms).ok_or_else(overflow)?;
    mark.checked_add_signed(step).ok_or_else(overflow)
}

/// Convert a configured interval in whole seconds to a [`TimeDelta`],
/// saturating at [`TimeDelta::MAX`].
pub fn interval_from_secs(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}
