//! Property tests for the classifier, the sustain debouncer, and the
//! command queue.

use chrono::{TimeDelta, TimeZone, Utc};
use proptest::prelude::*;

use binwatch::alert::{AlertCondition, AlertTracker};
use binwatch::app::commands::{CommandAction, CommandQueue};
use binwatch::config::AlertSettings;
use binwatch::fill::{FillStatus, classify};

// ── Classifier band properties ────────────────────────────────

proptest! {
    /// Any distance at or below the full threshold classifies full,
    /// regardless of where the empty threshold sits.
    #[test]
    fn at_or_below_threshold_is_full(
        threshold in 0.1f64..100.0,
        empty in 0.1f64..500.0,
        frac in 0.0f64..=1.0,
    ) {
        let d = threshold * frac;
        prop_assert_eq!(classify(Some(d), threshold, empty), FillStatus::Full);
    }

    /// Distances strictly inside (threshold, threshold * 1.33] are
    /// partial whenever the empty threshold sits above the band.
    #[test]
    fn partial_band_wins_below_empty(
        threshold in 0.1f64..100.0,
        frac in 0.001f64..=0.33,
    ) {
        let d = threshold * (1.0 + frac);
        let empty = threshold * 2.0; // clear of the partial band
        prop_assert_eq!(classify(Some(d), threshold, empty), FillStatus::Partial);
    }

    /// Beyond the partial band, at or past the empty threshold is empty.
    #[test]
    fn past_empty_threshold_is_empty(
        threshold in 0.1f64..100.0,
        excess in 0.0f64..100.0,
    ) {
        let empty = threshold * 1.34 + 1.0;
        let d = empty + excess;
        prop_assert_eq!(classify(Some(d), threshold, empty), FillStatus::Empty);
    }

    /// A missing distance is the only way to get `unknown`.
    #[test]
    fn present_distance_never_unknown(
        d in -100.0f64..1000.0,
        threshold in 0.1f64..100.0,
        empty in 0.1f64..500.0,
    ) {
        prop_assert_ne!(classify(Some(d), threshold, empty), FillStatus::Unknown);
    }
}

#[test]
fn missing_distance_is_unknown() {
    assert_eq!(classify(None, 5.0, 15.0), FillStatus::Unknown);
}

// ── Debouncer invariants ──────────────────────────────────────

/// Replay an arbitrary reading sequence and check the structural
/// invariants that must hold after every step: at most one condition
/// slot is timing, and a cleared slot is never latched as sent.
fn check_slot_invariants(distances: Vec<f64>, step_secs: Vec<u32>, sustain: f64) {
    let settings = AlertSettings {
        threshold_cm: 5.0,
        empty_threshold_cm: 15.0,
        alert_sustain_secs: sustain,
    };
    let mut tracker = AlertTracker::new();
    let mut now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

    for (d, step) in distances.iter().zip(step_secs.iter().cycle()) {
        let _ = tracker.evaluate("bin-1", *d, now, &settings);

        let state = tracker.device("bin-1").copied().unwrap_or_default();
        assert!(state.populated() <= 1, "more than one condition timing at once");
        for c in [
            AlertCondition::Full,
            AlertCondition::Partial,
            AlertCondition::Empty,
        ] {
            if state.since(c).is_none() {
                assert!(!state.sent(c), "cleared slot still latched as sent");
            }
        }

        now += TimeDelta::seconds(i64::from(*step));
    }
}

proptest! {
    #[test]
    fn debouncer_slot_invariants_hold(
        distances in proptest::collection::vec(0.0f64..30.0, 1..60),
        steps in proptest::collection::vec(0u32..10, 1..10),
        sustain in 0.0f64..10.0,
    ) {
        check_slot_invariants(distances, steps, sustain);
    }

    /// An unbroken dwell in one band fires at most once, however long
    /// it runs.
    #[test]
    fn unbroken_dwell_fires_at_most_once(
        d in 0.0f64..=5.0,
        steps in proptest::collection::vec(0u32..100, 1..40),
        sustain in 0.0f64..30.0,
    ) {
        let settings = AlertSettings {
            threshold_cm: 5.0,
            empty_threshold_cm: 15.0,
            alert_sustain_secs: sustain,
        };
        let mut tracker = AlertTracker::new();
        let mut now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let mut fires = 0;
        for step in &steps {
            if tracker.evaluate("bin-1", d, now, &settings).is_some() {
                fires += 1;
            }
            now += TimeDelta::seconds(i64::from(*step));
        }
        prop_assert!(fires <= 1, "dwell fired {} times", fires);
    }
}

// ── Command queue ─────────────────────────────────────────────

proptest! {
    /// Command ids are strictly increasing per device and the pending
    /// slot always holds the newest command.
    #[test]
    fn command_ids_strictly_increase(n in 1usize..50) {
        let mut queue = CommandQueue::new();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let mut last_id = 0;
        for _ in 0..n {
            let cmd = queue.enqueue("bin-1", CommandAction::Auto, now);
            prop_assert!(cmd.command_id > last_id);
            last_id = cmd.command_id;
        }

        let pending = queue.pending_since("bin-1", 0).unwrap();
        prop_assert_eq!(pending.command_id, last_id);
        prop_assert!(queue.pending_since("bin-1", last_id).is_none());
    }
}
