//! Intake service — the hexagonal core.
//!
//! [`IntakeService`] owns the alert tracker, command queue, history
//! store, and the live settings. It exposes a clean, I/O-free API;
//! all side channels flow through port traits injected at call
//! sites, making the whole ingestion path testable with mock
//! adapters and a manual clock.
//!
//! ```text
//!  DeviceReading ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                    │        IntakeService          │ ──▶ Notifier
//!                    │ classify · debounce · enqueue │ ──▶ ReadingSink
//!  Command poll  ◀── └──────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::alert::{AlertCondition, AlertTracker, DeviceAlertState};
use crate::config::{AlertSettings, SettingsPatch};
use crate::error::{Error, Result};
use crate::fill::{FillStatus, classify};
use crate::history::HistoryStore;
use crate::reading::{DeviceReading, ReadingAck, ReadingRecord};

use super::commands::{Command, CommandAction, CommandQueue};
use super::events::IntakeEvent;
use super::ports::{EventSink, Notifier, ReadingSink, SettingsStore};

/// The intake service orchestrates the whole per-reading pipeline.
///
/// Entry points take `&mut self`: the core assumes one caller at a
/// time (the original deployment was single-process request
/// handling). A host serving concurrent requests wraps the service
/// in a `Mutex`; cross-device work needs no finer coordination.
pub struct IntakeService {
    settings: AlertSettings,
    tracker: AlertTracker,
    commands: CommandQueue,
    history: HistoryStore,
}

impl IntakeService {
    /// Construct the service with already-loaded settings.
    pub fn new(settings: AlertSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            tracker: AlertTracker::new(),
            commands: CommandQueue::new(),
            history: HistoryStore::new(),
        }
    }

    // ── Ingestion ─────────────────────────────────────────────

    /// Run one reading through the pipeline: classify → record →
    /// debounce (side effects on fire) → persist → ack.
    ///
    /// Nothing in here fails the ingestion path. A missing or
    /// unparsable distance classifies as `unknown` and skips alert
    /// evaluation entirely; notifier and sink errors are logged and
    /// swallowed.
    pub fn handle_reading(
        &mut self,
        reading: &DeviceReading,
        now: DateTime<Utc>,
        notifier: &impl Notifier,
        sink: &mut impl ReadingSink,
        events: &mut impl EventSink,
    ) -> ReadingAck {
        let device_id = reading.device_id_or_unknown();
        // Snapshot: a concurrent settings update applies from the next reading.
        let settings = self.settings;

        let fill_status = classify(
            reading.distance,
            settings.threshold_cm,
            settings.empty_threshold_cm,
        );
        let is_full = fill_status == FillStatus::Full;

        let record = ReadingRecord::new(&device_id, reading, now, is_full, fill_status);
        self.history.record(&device_id, record.clone());

        events.emit(&IntakeEvent::ReadingAccepted {
            device_id: device_id.clone(),
            distance: reading.distance,
            fill_status,
        });

        if let Some(distance) = reading.distance {
            if let Some(fire) = self.tracker.evaluate(&device_id, distance, now, &settings) {
                self.dispatch_alert(&device_id, distance, fire.condition, fire.elapsed_secs,
                    &settings, now, notifier, events);
            }
        }

        if let Err(e) = sink.append(&record) {
            warn!("reading sink append failed for {}: {}", device_id, e);
        }

        ReadingAck {
            status: "ok",
            device_id,
            server_timestamp: now,
        }
    }

    /// Side effects for one alert fire: a human-readable message for
    /// the full condition (the partial/empty message paths are
    /// intentionally disabled) and a device-directed notify command
    /// for all three.
    #[allow(clippy::too_many_arguments)]
    fn dispatch_alert(
        &mut self,
        device_id: &str,
        distance: f64,
        condition: AlertCondition,
        elapsed_secs: f64,
        settings: &AlertSettings,
        now: DateTime<Utc>,
        notifier: &impl Notifier,
        events: &mut impl EventSink,
    ) {
        if condition == AlertCondition::Full {
            let message = format!(
                "Alert: Device {} distance {:.2} cm is at/below threshold {:.2} cm for {:.1}s (>= {:.1}s).",
                device_id, distance, settings.threshold_cm, elapsed_secs, settings.alert_sustain_secs
            );
            if let Err(e) = notifier.send(&message) {
                warn!("notifier send failed for {}: {}", device_id, e);
            }
        }

        let command = self.commands.enqueue(device_id, CommandAction::from(condition), now);

        events.emit(&IntakeEvent::AlertFired {
            device_id: device_id.to_owned(),
            condition,
            elapsed_secs,
        });
        events.emit(&IntakeEvent::CommandQueued {
            device_id: device_id.to_owned(),
            command_id: command.command_id,
            action: command.action,
        });
    }

    // ── Commands ──────────────────────────────────────────────

    /// Queue a dashboard-originated command for a device.
    pub fn enqueue_command(
        &mut self,
        device_id: &str,
        action: CommandAction,
        now: DateTime<Utc>,
        events: &mut impl EventSink,
    ) -> Command {
        let command = self.commands.enqueue(device_id, action, now);
        events.emit(&IntakeEvent::CommandQueued {
            device_id: device_id.to_owned(),
            command_id: command.command_id,
            action: command.action,
        });
        command
    }

    /// Device polling: the pending command newer than `last_id`, if
    /// any. When no device id is given, the first device that ever
    /// reported is assumed (single-bin deployments poll without ids).
    pub fn poll_command(&self, device_id: Option<&str>, last_id: u64) -> Option<Command> {
        let device_id = match device_id {
            Some(id) => id,
            None => self.history.first_device()?,
        };
        self.commands.pending_since(device_id, last_id).cloned()
    }

    // ── Settings ──────────────────────────────────────────────

    /// Copy of the live settings (copy-on-read; callers never hold a
    /// reference into the service).
    pub fn settings(&self) -> AlertSettings {
        self.settings
    }

    /// Apply a partial settings update and persist best-effort.
    ///
    /// An empty patch and non-finite values are rejected; accepted
    /// values are clamped to `>= 0`. A failed save is logged and
    /// otherwise ignored — the in-memory settings still change, which
    /// mirrors the availability-first posture of the rest of the core.
    pub fn update_settings(
        &mut self,
        patch: SettingsPatch,
        store: &impl SettingsStore,
        events: &mut impl EventSink,
    ) -> Result<AlertSettings> {
        if patch.is_empty() {
            return Err(Error::InvalidSettings("no valid settings provided"));
        }
        for value in [
            patch.threshold_cm,
            patch.empty_threshold_cm,
            patch.alert_sustain_secs,
        ]
        .into_iter()
        .flatten()
        {
            if !value.is_finite() {
                return Err(Error::InvalidSettings("settings values must be numbers"));
            }
        }

        let mut next = self.settings;
        if let Some(v) = patch.threshold_cm {
            next.threshold_cm = v.max(0.0);
        }
        if let Some(v) = patch.empty_threshold_cm {
            next.empty_threshold_cm = v.max(0.0);
        }
        if let Some(v) = patch.alert_sustain_secs {
            next.alert_sustain_secs = v.max(0.0);
        }

        self.settings = next;
        info!(
            "settings updated: threshold={}cm empty={}cm sustain={}s",
            next.threshold_cm, next.empty_threshold_cm, next.alert_sustain_secs
        );

        if let Err(e) = store.save(&next) {
            warn!("settings save failed: {}", e);
        }
        events.emit(&IntakeEvent::SettingsUpdated(next));

        Ok(next)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Known device ids, first-seen order.
    pub fn devices(&self) -> Vec<String> {
        self.history.devices()
    }

    /// Latest reading for a device.
    pub fn latest(&self, device_id: &str) -> Option<&ReadingRecord> {
        self.history.latest(device_id)
    }

    /// Up to the last `limit` readings for a device, oldest first.
    pub fn history(&self, device_id: &str, limit: usize) -> Vec<ReadingRecord> {
        self.history.series(device_id, limit)
    }

    /// One page of history, newest first, plus the total count.
    pub fn history_page(
        &self,
        device_id: &str,
        page: usize,
        page_size: usize,
    ) -> (Vec<ReadingRecord>, usize) {
        self.history.page(device_id, page, page_size)
    }

    /// Alert slots for a device (observability / tests).
    pub fn alert_state(&self, device_id: &str) -> Option<&DeviceAlertState> {
        self.tracker.device(device_id)
    }
}
