//! Port traits — the hexagonal boundary between the intake core and
//! the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ IntakeService (domain)
//! ```
//!
//! Driven adapters (wall clock, webhook transport, settings file, CSV
//! writer, log/telemetry fan-out) implement these traits. The
//! [`IntakeService`](super::service::IntakeService) consumes them via
//! generics at call sites, so the core never touches the filesystem,
//! network, or real time directly — which is what makes the sustain
//! debouncing deterministically testable.

use chrono::{DateTime, Utc};

use crate::config::AlertSettings;
use crate::reading::ReadingRecord;

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Source of "now" for sustain arithmetic and server timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

// ───────────────────────────────────────────────────────────────
// Notifier port (domain → humans)
// ───────────────────────────────────────────────────────────────

/// Outbound human-readable notification channel (e.g. a chat
/// webhook). Best-effort: the ingestion path logs failures and moves
/// on, and implementations must not retry or block unboundedly.
pub trait Notifier {
    fn send(&self, message: &str) -> Result<(), NotifyError>;
}

// ───────────────────────────────────────────────────────────────
// Settings store port (domain ↔ persistent settings)
// ───────────────────────────────────────────────────────────────

/// Loads and persists [`AlertSettings`].
///
/// `load` never surfaces corruption: implementations fall back to
/// defaults on a missing or unreadable file (availability over
/// strictness). `save` is best-effort and its failure is the caller's
/// to ignore.
pub trait SettingsStore {
    fn load(&self) -> Result<AlertSettings, SettingsError>;
    fn save(&self, settings: &AlertSettings) -> Result<(), SettingsError>;
}

// ───────────────────────────────────────────────────────────────
// Reading sink port (domain → persistence)
// ───────────────────────────────────────────────────────────────

/// Append-only record of every classified reading. Format and
/// location are the adapter's business.
pub trait ReadingSink {
    fn append(&mut self, record: &ReadingRecord) -> Result<(), SinkError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`IntakeEvent`](super::events::IntakeEvent)s
/// through this port. Adapters decide where they go (process log,
/// metrics pipeline, test capture buffer).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::IntakeEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`SettingsStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    /// Stored settings failed to deserialize.
    Corrupted,
    /// Underlying file I/O failed.
    Io,
}

/// Errors from [`Notifier`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError {
    /// No outbound channel is configured; the message was dropped.
    NotConfigured,
    /// The transport failed (timeout, refused, non-2xx response).
    Transport,
}

/// Errors from [`ReadingSink`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    /// Underlying file I/O failed.
    Io,
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "settings corrupted"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "notifier not configured"),
            Self::Transport => write!(f, "notifier transport failed"),
        }
    }
}

impl core::fmt::Display for SinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for SettingsError {}
impl std::error::Error for NotifyError {}
impl std::error::Error for SinkError {}
