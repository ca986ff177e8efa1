//! Owned periodic sources for a running countdown.
//!
//! A [`TickSubscription`] is created when the engine starts and dropped when
//! it stops. It holds both intervals itself, so dropping the handle cancels
//! every pending tick; nothing is left scheduled behind it.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Engine countdown cadence.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);
/// Motivational message refresh cadence.
pub const ROTATE_PERIOD: Duration = Duration::from_secs(30);

/// What a subscription yielded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pulse {
    /// One second elapsed.
    Tick,
    /// Time to show a new message.
    Rotate,
}

/// Handle over the tick and rotate intervals.
///
/// Creating a subscription only records the current instant; the timers
/// are registered with the runtime on the first [`next`](Self::next), so a
/// subscription may be created and dropped outside of a tokio runtime.
#[derive(Debug)]
pub struct TickSubscription {
    created: Instant,
    tick_period: Duration,
    rotate_period: Duration,
    intervals: Option<(Interval, Interval)>,
}

impl TickSubscription {
    /// Subscribe with the given periods. The first pulse of each kind
    /// arrives one full period after creation.
    pub fn new(tick_period: Duration, rotate_period: Duration) -> Self {
        Self {
            created: Instant::now(),
            tick_period,
            rotate_period,
            intervals: None,
        }
    }

    /// Whether the intervals have been registered with a runtime yet.
    pub fn is_armed(&self) -> bool {
        self.intervals.is_some()
    }

    /// Wait for the next pulse. Ticks win over rotations that fall due at
    /// the same instant. Cancellation safe.
    ///
    /// # Panics
    ///
    /// Panics if polled outside of a tokio runtime with the time driver
    /// enabled.
    pub async fn next(&mut self) -> Pulse {
        let (created, tick_period, rotate_period) =
            (self.created, self.tick_period, self.rotate_period);
        let (tick, rotate) = self.intervals.get_or_insert_with(|| {
            (
                skipping_interval(created, tick_period),
                skipping_interval(created, rotate_period),
            )
        });
        tokio::select! {
            biased;
            _ = tick.tick() => Pulse::Tick,
            _ = rotate.tick() => Pulse::Rotate,
        }
    }
}

impl Default for TickSubscription {
    fn default() -> Self {
        Self::new(TICK_PERIOD, ROTATE_PERIOD)
    }
}

// Missed ticks are dropped rather than replayed: a suspended host simply
// resumes from the last remaining value.
fn skipping_interval(created: Instant, period: Duration) -> Interval {
    let mut interval = interval_at(created + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}
