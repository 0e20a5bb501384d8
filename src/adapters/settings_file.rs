//! JSON file settings store.
//!
//! Settings live in one small JSON document on disk. Reads are
//! forgiving: a missing, unreadable, or corrupt file yields the
//! defaults (with a warning) rather than an error, so a damaged
//! settings file can never take ingestion down. Writes rewrite the
//! whole document.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::app::ports::{SettingsError, SettingsStore};
use crate::config::AlertSettings;

pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<AlertSettings, SettingsError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(AlertSettings::default());
            }
            Err(e) => {
                warn!("settings read failed ({}), using defaults: {}", self.path.display(), e);
                return Ok(AlertSettings::default());
            }
        };

        match serde_json::from_str::<AlertSettings>(&raw) {
            Ok(settings) => Ok(settings.sanitized()),
            Err(e) => {
                warn!("settings corrupt ({}), using defaults: {}", self.path.display(), e);
                Ok(AlertSettings::default())
            }
        }
    }

    fn save(&self, settings: &AlertSettings) -> Result<(), SettingsError> {
        let raw = serde_json::to_string_pretty(settings).map_err(|_| SettingsError::Corrupted)?;
        fs::write(&self.path, raw).map_err(|_| SettingsError::Io)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_path() -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "binwatch-settings-{}-{}.json",
            std::process::id(),
            n
        ))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = JsonSettingsStore::new(temp_path());
        assert_eq!(store.load().unwrap(), AlertSettings::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_path();
        let store = JsonSettingsStore::new(&path);
        let settings = AlertSettings {
            threshold_cm: 7.5,
            empty_threshold_cm: 20.0,
            alert_sustain_secs: 1.0,
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let path = temp_path();
        fs::write(&path, "{not json").unwrap();
        let store = JsonSettingsStore::new(&path);
        assert_eq!(store.load().unwrap(), AlertSettings::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn partial_document_fills_missing_keys() {
        let path = temp_path();
        fs::write(&path, r#"{"thresholdCm": 9.0}"#).unwrap();
        let store = JsonSettingsStore::new(&path);
        let loaded = store.load().unwrap();
        assert_eq!(loaded.threshold_cm, 9.0);
        assert_eq!(
            loaded.empty_threshold_cm,
            AlertSettings::default().empty_threshold_cm
        );
        let _ = fs::remove_file(path);
    }

    #[test]
    fn loaded_values_are_sanitized() {
        let path = temp_path();
        fs::write(&path, r#"{"thresholdCm": -3.0}"#).unwrap();
        let store = JsonSettingsStore::new(&path);
        assert_eq!(store.load().unwrap().threshold_cm, 0.0);
        let _ = fs::remove_file(path);
    }
}
