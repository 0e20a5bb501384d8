//! Bounded in-memory history.
//!
//! Each device gets a fixed-capacity ring of recent readings plus a
//! latest-reading slot. The ring auto-discards the oldest entry at
//! capacity, so a chatty device can never grow the process without
//! bound. Devices are remembered in first-seen order, which keeps
//! "pick any device" queries deterministic.

use std::collections::HashMap;

use heapless::Deque;

use crate::reading::ReadingRecord;

/// Ring capacity per device.
pub const MAX_HISTORY_IN_MEMORY: usize = 500;

type Ring = Deque<ReadingRecord, MAX_HISTORY_IN_MEMORY>;

/// Per-device reading history and latest-value registry.
#[derive(Debug, Default)]
pub struct HistoryStore {
    latest: HashMap<String, ReadingRecord>,
    series: HashMap<String, Box<Ring>>,
    /// Device ids in first-seen order.
    order: Vec<String>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading: update the latest slot and append to the
    /// ring, evicting the oldest entry when full.
    pub fn record(&mut self, device_id: &str, record: ReadingRecord) {
        if !self.latest.contains_key(device_id) {
            self.order.push(device_id.to_owned());
        }
        self.latest.insert(device_id.to_owned(), record.clone());

        let ring = self
            .series
            .entry(device_id.to_owned())
            .or_insert_with(|| Box::new(Ring::new()));
        if ring.is_full() {
            ring.pop_front();
        }
        // Cannot fail: a slot was just freed if the ring was full.
        let _ = ring.push_back(record);
    }

    /// Latest reading for a device.
    pub fn latest(&self, device_id: &str) -> Option<&ReadingRecord> {
        self.latest.get(device_id)
    }

    /// Known device ids, first-seen order.
    pub fn devices(&self) -> Vec<String> {
        self.order.clone()
    }

    /// First device that ever reported, if any.
    pub fn first_device(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    /// Up to the last `limit` readings for a device, oldest first.
    pub fn series(&self, device_id: &str, limit: usize) -> Vec<ReadingRecord> {
        let Some(ring) = self.series.get(device_id) else {
            return Vec::new();
        };
        let skip = ring.len().saturating_sub(limit);
        ring.iter().skip(skip).cloned().collect()
    }

    /// One page of history, newest first, plus the total row count.
    /// Page numbers are 1-based; out-of-range values fall back to
    /// page 1 / page size 25.
    pub fn page(&self, device_id: &str, page: usize, page_size: usize) -> (Vec<ReadingRecord>, usize) {
        let Some(ring) = self.series.get(device_id) else {
            return (Vec::new(), 0);
        };
        let page = if page == 0 { 1 } else { page };
        let page_size = if page_size == 0 { 25 } else { page_size };

        let total = ring.len();
        let start = (page - 1) * page_size;
        let rows = ring
            .iter()
            .rev()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();
        (rows, total)
    }
}
