//! Cooperative once-per-second tick source.

use std::{ops::ControlFlow, time::Duration};

use log::debug;
use tokio::{
    sync::Mutex,
    time::{self, Instant, MissedTickBehavior},
};

/// Drives a shared target with periodic ticks.
///
/// Ticks never overlap: if the target is still locked when a tick comes
/// due, that tick is skipped rather than queued. Ticks missed while the
/// process was stalled are dropped too, so a long suspension does not
/// replay as a burst.
#[derive(Debug, Clone, Copy)]
pub struct TickScheduler {
    period: Duration,
}

impl TickScheduler {
    /// A scheduler firing once per second.
    pub fn every_second() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    /// A scheduler with a custom period.
    pub fn with_period(period: Duration) -> Self {
        Self { period }
    }

    /// Calls `on_tick` once per period until it returns
    /// [`ControlFlow::Break`]. Returns the number of ticks delivered.
    ///
    /// The first tick fires one full period after the call.
    pub async fn run<T, F>(self, target: &Mutex<T>, mut on_tick: F) -> u64
    where
        F: FnMut(&mut T) -> ControlFlow<()>,
    {
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut delivered = 0;
        loop {
            interval.tick().await;
            let Ok(mut guard) = target.try_lock() else {
                debug!("Previous update still in progress, skipping tick");
                continue;
            };
            delivered += 1;
            if on_tick(&mut guard).is_break() {
                return delivered;
            }
        }
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::every_second()
    }
}
