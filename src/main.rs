//! binwatch — bin telemetry intake, replay entry point.
//!
//! Reads newline-delimited JSON readings from stdin, runs each one
//! through the intake pipeline, and prints the acknowledgement for
//! every accepted reading. Settings and the CSV log live under a data
//! directory (`BINWATCH_DATA_DIR`, default `data/`).
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  SystemClock    JsonSettingsStore    CsvReadingSink        │
//! │  (Clock)        (SettingsStore)      (ReadingSink)         │
//! │  LogNotifier    LogEventSink                               │
//! │  (Notifier)     (EventSink)                                │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ──────────────        │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │          IntakeService (pure logic)              │      │
//! │  │  classify · debounce · enqueue · history         │      │
//! │  └──────────────────────────────────────────────────┘      │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};

use binwatch::adapters::clock::SystemClock;
use binwatch::adapters::csv_sink::CsvReadingSink;
use binwatch::adapters::log_sink::LogEventSink;
use binwatch::adapters::notifier::LogNotifier;
use binwatch::adapters::settings_file::JsonSettingsStore;
use binwatch::app::ports::{Clock, SettingsStore};
use binwatch::app::service::IntakeService;
use binwatch::reading::DeviceReading;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let data_dir = PathBuf::from(
        std::env::var("BINWATCH_DATA_DIR").unwrap_or_else(|_| "data".to_owned()),
    );
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    let settings_store = JsonSettingsStore::new(data_dir.join("settings.json"));
    let mut sink = CsvReadingSink::new(data_dir.join("readings.csv"));
    let clock = SystemClock;
    let notifier = LogNotifier::new();
    let mut events = LogEventSink::new();

    let settings = settings_store
        .load()
        .context("loading alert settings")?;
    info!(
        "binwatch starting | data_dir={} | threshold={:.1}cm empty={:.1}cm sustain={:.1}s",
        data_dir.display(),
        settings.threshold_cm,
        settings.empty_threshold_cm,
        settings.alert_sustain_secs
    );

    let mut service = IntakeService::new(settings);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let reading: DeviceReading = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping malformed reading: {}", e);
                continue;
            }
        };

        let ack = service.handle_reading(&reading, clock.now(), &notifier, &mut sink, &mut events);
        println!("{}", serde_json::to_string(&ack)?);
    }

    info!("stdin closed, shutting down");
    Ok(())
}
