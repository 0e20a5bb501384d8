//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured intake events to the
//! process logger. A future metrics or webhook adapter would implement
//! the same trait.

use log::info;

use crate::app::events::IntakeEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`IntakeEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &IntakeEvent) {
        match event {
            IntakeEvent::ReadingAccepted {
                device_id,
                distance,
                fill_status,
            } => match distance {
                Some(d) => info!(
                    "READING | device={} | distance={:.2}cm | fill={}",
                    device_id, d, fill_status
                ),
                None => info!("READING | device={} | distance=? | fill={}", device_id, fill_status),
            },
            IntakeEvent::AlertFired {
                device_id,
                condition,
                elapsed_secs,
            } => {
                info!(
                    "ALERT | device={} | condition={} | sustained={:.1}s",
                    device_id,
                    condition.as_str(),
                    elapsed_secs
                );
            }
            IntakeEvent::CommandQueued {
                device_id,
                command_id,
                action,
            } => {
                info!("COMMAND | device={} | id={} | action={:?}", device_id, command_id, action);
            }
            IntakeEvent::SettingsUpdated(s) => {
                info!(
                    "SETTINGS | threshold={:.1}cm | empty={:.1}cm | sustain={:.1}s",
                    s.threshold_cm, s.empty_threshold_cm, s.alert_sustain_secs
                );
            }
        }
    }
}
