//! Outbound application events.
//!
//! The [`IntakeService`](super::service::IntakeService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters
//! on the other side decide what to do with them — write a process
//! log line, feed a metrics pipeline, or capture them in a test.

use crate::alert::AlertCondition;
use crate::config::AlertSettings;
use crate::fill::FillStatus;

use super::commands::CommandAction;

/// Structured events emitted by the intake core.
#[derive(Debug, Clone)]
pub enum IntakeEvent {
    /// A reading was accepted and classified.
    ReadingAccepted {
        device_id: String,
        distance: Option<f64>,
        fill_status: FillStatus,
    },

    /// A sustained condition fired its notification.
    AlertFired {
        device_id: String,
        condition: AlertCondition,
        elapsed_secs: f64,
    },

    /// A command was queued for a device.
    CommandQueued {
        device_id: String,
        command_id: u64,
        action: CommandAction,
    },

    /// Settings were updated (carries the new values).
    SettingsUpdated(AlertSettings),
}
