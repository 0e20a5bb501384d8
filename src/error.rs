//! Unified error types.
//!
//! One crate-level `Error` that every fallible operation funnels into,
//! keeping the ingestion path's error handling uniform. Nothing here
//! is fatal: the design favours availability of the intake path — a
//! missed alert is tolerable, a crashed reading handler is not.

use core::fmt;

use crate::app::ports::{NotifyError, SettingsError, SinkError};

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Settings could not be loaded or persisted.
    Settings(SettingsError),
    /// The outbound notifier failed (always swallowed by ingestion).
    Notify(NotifyError),
    /// The persistence sink failed (always swallowed by ingestion).
    Sink(SinkError),
    /// A dashboard command request was malformed.
    InvalidCommand(&'static str),
    /// A settings patch was malformed.
    InvalidSettings(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settings(e) => write!(f, "settings: {e}"),
            Self::Notify(e) => write!(f, "notify: {e}"),
            Self::Sink(e) => write!(f, "sink: {e}"),
            Self::InvalidCommand(msg) => write!(f, "invalid command: {msg}"),
            Self::InvalidSettings(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<SettingsError> for Error {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e)
    }
}

impl From<NotifyError> for Error {
    fn from(e: NotifyError) -> Self {
        Self::Notify(e)
    }
}

impl From<SinkError> for Error {
    fn from(e: SinkError) -> Self {
        Self::Sink(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
