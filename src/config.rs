//! Alerting configuration.
//!
//! The three tunables that drive fill classification and alert
//! debouncing. Values arrive from the settings file or a dashboard
//! update and are persisted as JSON with the wire names the devices
//! and dashboard already speak (`thresholdCm`, `emptyThresholdCm`,
//! `alertSustainSec`).

use serde::{Deserialize, Serialize};

/// Distance at or below which a bin counts as full (cm).
pub const DEFAULT_THRESHOLD_CM: f64 = 5.0;
/// Distance at or above which a bin counts as empty (cm).
pub const DEFAULT_EMPTY_THRESHOLD_CM: f64 = 15.0;
/// How long a condition must hold before its alert fires (seconds).
pub const DEFAULT_ALERT_SUSTAIN_SECS: f64 = 3.0;

/// Tunable alert parameters, process-wide.
///
/// `Copy` on purpose: the ingestion path takes a snapshot per reading,
/// so a settings update takes effect on the *next* reading and never
/// rewrites in-flight sustain arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertSettings {
    /// Full threshold (cm). Lower distance = more full.
    pub threshold_cm: f64,
    /// Empty threshold (cm).
    pub empty_threshold_cm: f64,
    /// Debounce window (seconds). Zero or negative fires immediately.
    #[serde(rename = "alertSustainSec")]
    pub alert_sustain_secs: f64,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            threshold_cm: DEFAULT_THRESHOLD_CM,
            empty_threshold_cm: DEFAULT_EMPTY_THRESHOLD_CM,
            alert_sustain_secs: DEFAULT_ALERT_SUSTAIN_SECS,
        }
    }
}

impl AlertSettings {
    /// Clamp every field to a usable value: negatives become 0,
    /// non-finite values fall back to the default for that field.
    pub fn sanitized(self) -> Self {
        fn clamp(v: f64, default: f64) -> f64 {
            if v.is_finite() { v.max(0.0) } else { default }
        }
        Self {
            threshold_cm: clamp(self.threshold_cm, DEFAULT_THRESHOLD_CM),
            empty_threshold_cm: clamp(self.empty_threshold_cm, DEFAULT_EMPTY_THRESHOLD_CM),
            alert_sustain_secs: clamp(self.alert_sustain_secs, DEFAULT_ALERT_SUSTAIN_SECS),
        }
    }
}

/// Partial settings update from the dashboard. Absent fields keep
/// their current value.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub threshold_cm: Option<f64>,
    pub empty_threshold_cm: Option<f64>,
    #[serde(rename = "alertSustainSec")]
    pub alert_sustain_secs: Option<f64>,
}

impl SettingsPatch {
    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.threshold_cm.is_none()
            && self.empty_threshold_cm.is_none()
            && self.alert_sustain_secs.is_none()
    }
}
