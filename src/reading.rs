//! Device readings, inbound and augmented.
//!
//! Firmware in the field is sloppy about JSON types — distances arrive
//! as numbers or numeric strings, booleans as `true`/`"yes"`/`1` — so
//! the inbound struct parses leniently and never rejects a reading
//! over a single bad field. An unparsable distance simply becomes
//! `None` (classified `unknown`, no alert evaluation, no state change).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::fill::FillStatus;

// ---------------------------------------------------------------------------
// Lenient field parsing
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Num(f64),
    Text(String),
    Flag(bool),
}

fn lenient_f64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<RawValue>::deserialize(de)? {
        Some(RawValue::Num(n)) => Some(n),
        Some(RawValue::Text(s)) => s.trim().parse().ok(),
        Some(RawValue::Flag(b)) => Some(if b { 1.0 } else { 0.0 }),
        None => None,
    })
}

fn lenient_i64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
    Ok(lenient_f64(de)?.map(|n| n as i64))
}

fn lenient_bool<'de, D: Deserializer<'de>>(de: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<RawValue>::deserialize(de)? {
        Some(RawValue::Flag(b)) => Some(b),
        Some(RawValue::Num(n)) => Some(n != 0.0),
        Some(RawValue::Text(s)) => Some(matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "y" | "on"
        )),
        None => None,
    })
}

// ---------------------------------------------------------------------------
// Inbound reading
// ---------------------------------------------------------------------------

/// One telemetry post from a device, as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReading {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub device_timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub device_uptime_ms: Option<i64>,
    /// Lid-to-surface distance (cm). `None` when absent or unparsable.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub motion: Option<bool>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub servo_position: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub target_position: Option<i64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub should_activate_servo: Option<bool>,
}

impl DeviceReading {
    /// Device id with the "unknown" fallback for missing or blank ids.
    pub fn device_id_or_unknown(&self) -> String {
        match self.device_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => "unknown".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Augmented record
// ---------------------------------------------------------------------------

/// A reading after server-side augmentation: timestamped, classified,
/// and flagged. This is what history queries return and what the
/// persistence sink receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingRecord {
    pub server_timestamp: DateTime<Utc>,
    pub device_id: String,
    pub device_timestamp: Option<String>,
    pub device_uptime_ms: Option<i64>,
    pub distance: Option<f64>,
    pub motion: Option<bool>,
    pub servo_position: Option<i64>,
    pub target_position: Option<i64>,
    pub should_activate_servo: Option<bool>,
    pub is_full: bool,
    pub fill_status: FillStatus,
}

impl ReadingRecord {
    pub fn new(
        device_id: &str,
        reading: &DeviceReading,
        now: DateTime<Utc>,
        is_full: bool,
        fill_status: FillStatus,
    ) -> Self {
        Self {
            server_timestamp: now,
            device_id: device_id.to_owned(),
            device_timestamp: reading.device_timestamp.clone(),
            device_uptime_ms: reading.device_uptime_ms,
            distance: reading.distance,
            motion: reading.motion,
            servo_position: reading.servo_position,
            target_position: reading.target_position,
            should_activate_servo: reading.should_activate_servo,
            is_full,
            fill_status,
        }
    }
}

/// Acknowledgement returned to the posting device.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingAck {
    pub status: &'static str,
    pub device_id: String,
    pub server_timestamp: DateTime<Utc>,
}
