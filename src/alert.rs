//! Alert debouncer.
//!
//! Level-triggered re-evaluation run on every reading: the band a
//! device is in is re-derived from the incoming distance each time
//! (nothing stores "current state"), and the tracker reacts by
//! comparing that band against which `since`/`sent` slots are
//! populated.
//!
//! ## Slot lifecycle
//!
//! 1. A reading lands in an alert band (full / partial / empty).
//! 2. If that condition's `since` is unset, it is stamped `now`.
//! 3. Once the condition has held for the sustain window (or the
//!    window is `<= 0`), the tracker reports a fire exactly once and
//!    latches `sent`. `since`/`sent` stay put while the band keeps
//!    matching, so a dwell can never fire twice.
//! 4. The two conditions the band excludes are reset unconditionally;
//!    leaving a band and re-entering it later restarts sustain timing
//!    and re-arms the notification.
//! 5. The normal band resets all three slots.
//!
//! Side effects (notifier message, device command) belong to the
//! caller: the tracker returns an [`AlertFire`] and the ingestion
//! path decides what to do with it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::info;

use crate::config::AlertSettings;
use crate::fill::PARTIAL_BAND_FACTOR;

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// The three mutually exclusive alert conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertCondition {
    Full,
    Partial,
    Empty,
}

impl AlertCondition {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
            Self::Empty => "empty",
        }
    }

    /// The two conditions this one excludes.
    const fn others(self) -> [Self; 2] {
        match self {
            Self::Full => [Self::Partial, Self::Empty],
            Self::Partial => [Self::Full, Self::Empty],
            Self::Empty => [Self::Full, Self::Partial],
        }
    }
}

impl core::fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Per-device state
// ---------------------------------------------------------------------------

/// One `(since, sent)` pair. Invariant: `since == None` implies
/// `sent == false`.
#[derive(Debug, Clone, Copy, Default)]
struct ConditionSlot {
    since: Option<DateTime<Utc>>,
    sent: bool,
}

impl ConditionSlot {
    fn reset(&mut self) {
        self.since = None;
        self.sent = false;
    }
}

/// Alert slots for a single device. Created lazily on the first
/// reading and kept for the process lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceAlertState {
    full: ConditionSlot,
    partial: ConditionSlot,
    empty: ConditionSlot,
}

impl DeviceAlertState {
    fn slot_mut(&mut self, condition: AlertCondition) -> &mut ConditionSlot {
        match condition {
            AlertCondition::Full => &mut self.full,
            AlertCondition::Partial => &mut self.partial,
            AlertCondition::Empty => &mut self.empty,
        }
    }

    fn slot(&self, condition: AlertCondition) -> &ConditionSlot {
        match condition {
            AlertCondition::Full => &self.full,
            AlertCondition::Partial => &self.partial,
            AlertCondition::Empty => &self.empty,
        }
    }

    /// When the condition started holding, if it currently holds.
    pub fn since(&self, condition: AlertCondition) -> Option<DateTime<Utc>> {
        self.slot(condition).since
    }

    /// Whether the condition's notification has been sent this dwell.
    pub fn sent(&self, condition: AlertCondition) -> bool {
        self.slot(condition).sent
    }

    /// How many of the three `since` stamps are populated (the
    /// mutual-exclusion invariant says at most one).
    pub fn populated(&self) -> usize {
        [self.full, self.partial, self.empty]
            .iter()
            .filter(|s| s.since.is_some())
            .count()
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// A notification decision for one sustained condition entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertFire {
    pub condition: AlertCondition,
    /// Seconds the condition had held when the fire was decided.
    pub elapsed_secs: f64,
}

/// Per-device sustain debouncer. Owns all device alert slots; no
/// ambient globals.
#[derive(Debug, Default)]
pub struct AlertTracker {
    devices: HashMap<String, DeviceAlertState>,
}

impl AlertTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate one reading against the current settings.
    ///
    /// Bands are derived in the same fixed order as the classifier:
    /// full (`d <= threshold`), partial (`d <= threshold * 1.33`),
    /// empty (`d >= empty_threshold`), else normal. Settings are read
    /// fresh on every call, so a settings change applies from the
    /// next reading onward.
    ///
    /// Returns `Some(AlertFire)` at most once per sustained dwell.
    pub fn evaluate(
        &mut self,
        device_id: &str,
        distance: f64,
        now: DateTime<Utc>,
        settings: &AlertSettings,
    ) -> Option<AlertFire> {
        let threshold = settings.threshold_cm;
        let sustain = settings.alert_sustain_secs;
        let empty_threshold = settings.empty_threshold_cm;
        let partial_threshold = threshold * PARTIAL_BAND_FACTOR;

        let state = self.devices.entry(device_id.to_owned()).or_default();

        let matched = if distance <= threshold {
            Some(AlertCondition::Full)
        } else if distance <= partial_threshold {
            Some(AlertCondition::Partial)
        } else if distance >= empty_threshold {
            Some(AlertCondition::Empty)
        } else {
            None
        };

        let Some(condition) = matched else {
            // Normal band: everything re-arms.
            state.full.reset();
            state.partial.reset();
            state.empty.reset();
            return None;
        };

        for other in condition.others() {
            state.slot_mut(other).reset();
        }

        let slot = state.slot_mut(condition);
        let since = *slot.since.get_or_insert(now);
        let elapsed_secs = (now - since).num_milliseconds() as f64 / 1000.0;

        if (sustain <= 0.0 || elapsed_secs >= sustain) && !slot.sent {
            slot.sent = true;
            info!(
                "alert raised: device={} condition={} distance={:.2}cm held {:.1}s",
                device_id, condition, distance, elapsed_secs
            );
            return Some(AlertFire {
                condition,
                elapsed_secs,
            });
        }

        None
    }

    /// Alert slots for a device, if it has ever reported.
    pub fn device(&self, device_id: &str) -> Option<&DeviceAlertState> {
        self.devices.get(device_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + TimeDelta::seconds(secs)
    }

    fn settings(sustain: f64) -> AlertSettings {
        AlertSettings {
            threshold_cm: 5.0,
            empty_threshold_cm: 15.0,
            alert_sustain_secs: sustain,
        }
    }

    #[test]
    fn fires_once_after_sustain_window() {
        let mut tracker = AlertTracker::new();
        let s = settings(2.0);

        assert!(tracker.evaluate("bin-1", 3.0, at(0), &s).is_none());
        assert!(tracker.evaluate("bin-1", 3.0, at(1), &s).is_none());

        let fire = tracker.evaluate("bin-1", 3.0, at(2), &s).unwrap();
        assert_eq!(fire.condition, AlertCondition::Full);
        assert!((fire.elapsed_secs - 2.0).abs() < 1e-9);

        // Continuing the dwell never re-fires.
        assert!(tracker.evaluate("bin-1", 3.0, at(3), &s).is_none());
        assert!(tracker.evaluate("bin-1", 3.0, at(60), &s).is_none());
    }

    #[test]
    fn zero_sustain_fires_immediately() {
        let mut tracker = AlertTracker::new();
        let fire = tracker.evaluate("bin-1", 2.0, at(0), &settings(0.0));
        assert_eq!(fire.unwrap().condition, AlertCondition::Full);
    }

    #[test]
    fn leaving_and_re_entering_re_arms() {
        let mut tracker = AlertTracker::new();
        let s = settings(0.0);

        assert!(tracker.evaluate("bin-1", 3.0, at(0), &s).is_some());

        // Bin emptied: the full slot resets while empty fires its own alert.
        let fire = tracker.evaluate("bin-1", 20.0, at(1), &s).unwrap();
        assert_eq!(fire.condition, AlertCondition::Empty);
        let state = tracker.device("bin-1").unwrap();
        assert!(!state.sent(AlertCondition::Full));
        assert!(state.since(AlertCondition::Full).is_none());

        // Back to full: sustain timing restarts and the alert re-fires.
        assert!(tracker.evaluate("bin-1", 3.0, at(2), &s).is_some());
    }

    #[test]
    fn sustain_restarts_on_re_entry() {
        let mut tracker = AlertTracker::new();
        let s = settings(2.0);

        assert!(tracker.evaluate("bin-1", 3.0, at(0), &s).is_none());
        // Normal band interrupts the dwell before the window elapses.
        assert!(tracker.evaluate("bin-1", 10.0, at(1), &s).is_none());
        // Re-entry at t=2: the old since stamp must not count.
        assert!(tracker.evaluate("bin-1", 3.0, at(2), &s).is_none());
        assert!(tracker.evaluate("bin-1", 3.0, at(3), &s).is_none());
        assert!(tracker.evaluate("bin-1", 3.0, at(4), &s).is_some());
    }

    #[test]
    fn normal_band_resets_every_slot() {
        let mut tracker = AlertTracker::new();
        let s = settings(0.0);

        tracker.evaluate("bin-1", 3.0, at(0), &s);
        tracker.evaluate("bin-1", 10.0, at(1), &s);

        let state = tracker.device("bin-1").unwrap();
        assert_eq!(state.populated(), 0);
        assert!(!state.sent(AlertCondition::Full));
        assert!(!state.sent(AlertCondition::Partial));
        assert!(!state.sent(AlertCondition::Empty));
    }

    #[test]
    fn at_most_one_since_populated() {
        let mut tracker = AlertTracker::new();
        let s = settings(5.0);

        for (i, d) in [3.0, 6.0, 20.0, 3.0, 10.0, 6.0].iter().enumerate() {
            tracker.evaluate("bin-1", *d, at(i as i64), &s);
            assert!(tracker.device("bin-1").unwrap().populated() <= 1);
        }
    }

    #[test]
    fn devices_are_independent() {
        let mut tracker = AlertTracker::new();
        let s = settings(0.0);

        assert!(tracker.evaluate("bin-1", 3.0, at(0), &s).is_some());
        // A second device entering the same band fires on its own clock.
        assert!(tracker.evaluate("bin-2", 3.0, at(0), &s).is_some());
        assert!(tracker.evaluate("bin-1", 3.0, at(1), &s).is_none());
    }

    #[test]
    fn partial_band_fires_partial() {
        let mut tracker = AlertTracker::new();
        let fire = tracker.evaluate("bin-1", 6.0, at(0), &settings(0.0)).unwrap();
        assert_eq!(fire.condition, AlertCondition::Partial);
    }

    #[test]
    fn settings_change_applies_to_next_reading() {
        let mut tracker = AlertTracker::new();

        assert!(tracker.evaluate("bin-1", 3.0, at(0), &settings(10.0)).is_none());
        // Sustain dropped to zero mid-dwell: the pending dwell fires now.
        assert!(tracker.evaluate("bin-1", 3.0, at(1), &settings(0.0)).is_some());
    }
}
