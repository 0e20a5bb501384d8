//! Clock adapters.
//!
//! [`SystemClock`] is the production wall clock. [`ManualClock`] is a
//! hand-cranked clock for replays and tests, where sustain windows
//! must be stepped deterministically.

use std::cell::Cell;

use chrono::{DateTime, TimeDelta, Utc};

use crate::app::ports::Clock;

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Cell::new(start) }
    }

    /// Move time forward by whole milliseconds of `secs`.
    pub fn advance_secs(&self, secs: f64) {
        let delta = TimeDelta::milliseconds((secs * 1000.0) as i64);
        self.now.set(self.now.get() + delta);
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance_secs(2.5);
        assert_eq!((clock.now() - start).num_milliseconds(), 2500);
    }
}
