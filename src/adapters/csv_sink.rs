//! Append-only CSV log of classified readings.
//!
//! One row per reading, header written when the file is created.
//! This is the durable record — the in-memory history ring is a
//! bounded cache over the same data. Absent optional fields serialize
//! as empty cells, booleans as `1`/`0`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app::ports::{ReadingSink, SinkError};
use crate::reading::ReadingRecord;

/// Column order is part of the file format; never reorder.
const CSV_FIELDS: [&str; 11] = [
    "serverTimestamp",
    "deviceId",
    "deviceTimestamp",
    "deviceUptimeMs",
    "distance",
    "motion",
    "servoPosition",
    "targetPosition",
    "shouldActivateServo",
    "isFull",
    "fillStatus",
];

pub struct CsvReadingSink {
    path: PathBuf,
}

impl CsvReadingSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format_row(record: &ReadingRecord) -> String {
        let cells = [
            record.server_timestamp.to_rfc3339(),
            record.device_id.clone(),
            record.device_timestamp.clone().unwrap_or_default(),
            record
                .device_uptime_ms
                .map(|v| v.to_string())
                .unwrap_or_default(),
            record.distance.map(|v| v.to_string()).unwrap_or_default(),
            record.motion.map(bool_cell).unwrap_or_default(),
            record
                .servo_position
                .map(|v| v.to_string())
                .unwrap_or_default(),
            record
                .target_position
                .map(|v| v.to_string())
                .unwrap_or_default(),
            record
                .should_activate_servo
                .map(bool_cell)
                .unwrap_or_default(),
            bool_cell(record.is_full),
            record.fill_status.as_str().to_owned(),
        ];
        let escaped: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
        escaped.join(",")
    }
}

fn bool_cell(v: bool) -> String {
    if v { "1".to_owned() } else { "0".to_owned() }
}

fn escape_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_owned()
    }
}

impl ReadingSink for CsvReadingSink {
    fn append(&mut self, record: &ReadingRecord) -> Result<(), SinkError> {
        let fresh = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|_| SinkError::Io)?;

        if fresh {
            writeln!(file, "{}", CSV_FIELDS.join(",")).map_err(|_| SinkError::Io)?;
        }
        writeln!(file, "{}", Self::format_row(record)).map_err(|_| SinkError::Io)?;
        Ok(())
    }
}

/// Read-back helpers over an existing CSV log. Used by the replay
/// binary and dashboards that want device lists without replaying
/// the whole intake pipeline.
impl CsvReadingSink {
    /// All data rows, raw cells. Returns an empty vec when the file
    /// does not exist yet.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        raw.lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .map(split_row)
            .collect()
    }

    /// Unique device ids in first-seen order.
    pub fn devices(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for row in self.rows() {
            if let Some(id) = row.get(1) {
                if !id.is_empty() && !seen.contains(id) {
                    seen.push(id.clone());
                }
            }
        }
        seen
    }

    /// Device id of the last row, if any.
    pub fn last_device(&self) -> Option<String> {
        self.rows().last().and_then(|row| row.get(1).cloned())
    }
}

fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut cell)),
            _ => cell.push(c),
        }
    }
    cells.push(cell);
    cells
}
