//! Fill classifier.
//!
//! Maps a distance reading to a categorical fill level. The sensor
//! looks down from the bin lid, so a *lower* distance means a *fuller*
//! bin.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The partial band tops out at `threshold * 1.33` ("3/4 full").
pub const PARTIAL_BAND_FACTOR: f64 = 1.33;

/// Categorical fill level derived from a distance reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStatus {
    Unknown,
    Full,
    Partial,
    Empty,
}

impl FillStatus {
    /// Wire/CSV spelling of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Full => "full",
            Self::Partial => "partial",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for FillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a distance reading against the configured thresholds.
///
/// Checks are evaluated in a fixed order and the first match wins:
/// full (`d <= threshold`), partial (`d <= threshold * 1.33`), empty
/// (`d >= empty_threshold`), then a fallback of partial for the band
/// in between. The ordering is load-bearing: if `empty_threshold`
/// overlaps the partial band, the partial check shadows it. The
/// fallback deliberately treats the unclassified middle ground as
/// still non-empty; do not "fix" it.
pub fn classify(distance: Option<f64>, threshold_cm: f64, empty_threshold_cm: f64) -> FillStatus {
    let Some(d) = distance else {
        return FillStatus::Unknown;
    };

    let partial_threshold = threshold_cm * PARTIAL_BAND_FACTOR;

    if d <= threshold_cm {
        FillStatus::Full
    } else if d <= partial_threshold {
        FillStatus::Partial
    } else if d >= empty_threshold_cm {
        FillStatus::Empty
    } else {
        FillStatus::Partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_distance_is_unknown() {
        assert_eq!(classify(None, 5.0, 15.0), FillStatus::Unknown);
    }

    #[test]
    fn at_or_below_threshold_is_full() {
        assert_eq!(classify(Some(5.0), 5.0, 15.0), FillStatus::Full);
        assert_eq!(classify(Some(0.0), 5.0, 15.0), FillStatus::Full);
        assert_eq!(classify(Some(-1.0), 5.0, 15.0), FillStatus::Full);
    }

    #[test]
    fn partial_band_is_exclusive_of_threshold() {
        assert_eq!(classify(Some(5.01), 5.0, 15.0), FillStatus::Partial);
        assert_eq!(classify(Some(6.65), 5.0, 15.0), FillStatus::Partial);
    }

    #[test]
    fn at_or_above_empty_threshold_is_empty() {
        assert_eq!(classify(Some(15.0), 5.0, 15.0), FillStatus::Empty);
        assert_eq!(classify(Some(200.0), 5.0, 15.0), FillStatus::Empty);
    }

    #[test]
    fn middle_band_falls_back_to_partial() {
        // 6.65 < d < 15 is neither band; still reported non-empty.
        assert_eq!(classify(Some(10.0), 5.0, 15.0), FillStatus::Partial);
        assert_eq!(classify(Some(14.99), 5.0, 15.0), FillStatus::Partial);
    }

    #[test]
    fn partial_check_shadows_overlapping_empty_threshold() {
        // empty_threshold inside the partial band: partial wins by order.
        assert_eq!(classify(Some(6.0), 5.0, 5.5), FillStatus::Partial);
        // Past the partial band the empty check applies.
        assert_eq!(classify(Some(7.0), 5.0, 5.5), FillStatus::Empty);
    }
}
