//! Log-based notifier adapter.
//!
//! Stands in for an outbound chat webhook: alert messages land in the
//! process log at warn level so operators still see them. A real
//! webhook transport would implement the same [`Notifier`] trait and
//! keep the best-effort contract (no retries, no blocking the intake
//! path).

use log::warn;

use crate::app::ports::{Notifier, NotifyError};

/// Adapter that writes alert messages to the process log.
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for LogNotifier {
    fn send(&self, message: &str) -> Result<(), NotifyError> {
        warn!("NOTIFY | {}", message);
        Ok(())
    }
}
