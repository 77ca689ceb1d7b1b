//! Simulated nanosecond clock on top of a paused tokio runtime.
//!
//! Tokio timers resolve to whole milliseconds, so one simulated
//! nanosecond is mapped onto one tokio millisecond [`TICK`]. Every sleep,
//! deadline and timestamp in simulated time goes through this mapping,
//! which keeps schedules exact down to 1 ns.
//!
//! On a paused runtime the mapping costs no wall time: timers complete as
//! soon as every task is idle.

use std::time::Duration;
use tokio::time::Instant;

/// Runtime time that stands for one simulated nanosecond.
pub const TICK: Duration = Duration::from_millis(1);

/// Runtime duration covering `ns` simulated nanoseconds.
pub fn ticks(ns: u64) -> Duration {
    Duration::from_millis(ns)
}

/// Runtime duration covering the simulated span `span`.
pub fn ticks_for(span: Duration) -> Duration {
    ticks(span.as_nanos().min(u64::MAX as u128) as u64)
}

/// A simulated clock anchored at the runtime instant it was started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimClock {
    origin: Instant,
}

impl SimClock {
    /// Start a clock reading 0 ns now.
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Current simulated time in nanoseconds.
    pub fn now_ns(&self) -> u64 {
        self.ns_at(Instant::now())
    }

    /// Simulated time of a runtime instant.
    pub fn ns_at(&self, at: Instant) -> u64 {
        let elapsed = at.saturating_duration_since(self.origin);
        (elapsed.as_nanos() / TICK.as_nanos()) as u64
    }

    /// Runtime instant of simulated time `ns`.
    pub fn instant_at(&self, ns: u64) -> Instant {
        self.origin + ticks(ns)
    }

    /// Suspend for `ns` simulated nanoseconds.
    pub async fn sleep_ns(&self, ns: u64) {
        tokio::time::sleep(ticks(ns)).await;
    }

    /// Suspend for a simulated span.
    pub async fn sleep(&self, span: Duration) {
        tokio::time::sleep(ticks_for(span)).await;
    }

    /// Suspend until simulated time `ns`.
    pub async fn sleep_until_ns(&self, ns: u64) {
        tokio::time::sleep_until(self.instant_at(ns)).await;
    }
}
