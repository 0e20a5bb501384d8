//! Device-directed commands.
//!
//! The dashboard queues commands, devices poll for them. Each device
//! keeps only its latest pending command (last-write-wins, not a FIFO)
//! with a per-device monotonically increasing id so a polling device
//! can tell a new command from one it already executed. A device that
//! is slow to poll misses superseded commands; that is accepted
//! behaviour, not a bug.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::AlertCondition;
use crate::error::Error;

/// Servo angles are physical degrees, 0–180.
pub fn clamp_deg(angle: i64) -> i64 {
    angle.clamp(0, 180)
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// What a command asks the device to do. Serialised flat into the
/// command JSON under the `action` tag, e.g.
/// `{"action":"setAngle","targetPosition":90}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CommandAction {
    #[serde(rename_all = "camelCase")]
    SetAngle { target_position: i64 },
    Auto,
    Notify,
    NotifyFull,
    NotifyPartial,
    NotifyEmpty,
}

impl CommandAction {
    /// Normalise a raw dashboard request into an action.
    ///
    /// `open`/`activate` and `close`/`deactivate` are aliases for
    /// `setAngle` at 90 and 0 degrees when no target is given; any
    /// other action falls through to `setAngle`, which requires a
    /// target (clamped to 0–180).
    pub fn from_request(action: &str, target: Option<i64>) -> Result<Self, Error> {
        match (action.trim(), target) {
            ("auto", _) => Ok(Self::Auto),
            ("notify", _) => Ok(Self::Notify),
            ("open" | "activate", None) => Ok(Self::SetAngle {
                target_position: 90,
            }),
            ("close" | "deactivate", None) => Ok(Self::SetAngle { target_position: 0 }),
            (_, Some(t)) => Ok(Self::SetAngle {
                target_position: clamp_deg(t),
            }),
            (_, None) => Err(Error::InvalidCommand(
                "targetPosition required for setAngle",
            )),
        }
    }
}

impl From<AlertCondition> for CommandAction {
    fn from(condition: AlertCondition) -> Self {
        match condition {
            AlertCondition::Full => Self::NotifyFull,
            AlertCondition::Partial => Self::NotifyPartial,
            AlertCondition::Empty => Self::NotifyEmpty,
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A queued device-directed command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub device_id: String,
    /// Monotonic per device, starts at 1.
    pub command_id: u64,
    #[serde(flatten)]
    pub action: CommandAction,
    pub server_timestamp: DateTime<Utc>,
}

/// Pending-command slots and per-device sequence counters.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: HashMap<String, Command>,
    seq: HashMap<String, u64>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command, overwriting any previous one for the device.
    pub fn enqueue(&mut self, device_id: &str, action: CommandAction, now: DateTime<Utc>) -> Command {
        let seq = self.seq.entry(device_id.to_owned()).or_insert(0);
        *seq += 1;

        let command = Command {
            device_id: device_id.to_owned(),
            command_id: *seq,
            action,
            server_timestamp: now,
        };
        self.pending.insert(device_id.to_owned(), command.clone());
        command
    }

    /// The pending command for a device, but only if it is newer than
    /// `last_id` (the highest id the device reports having seen).
    pub fn pending_since(&self, device_id: &str, last_id: u64) -> Option<&Command> {
        self.pending
            .get(device_id)
            .filter(|cmd| cmd.command_id > last_id)
    }
}
