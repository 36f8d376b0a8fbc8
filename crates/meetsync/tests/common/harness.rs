//! Engine harness for isolated reconciliation passes.
//!
//! Wires a temp-directory store and the four fakes into a real
//! [`SyncEngine`] and exposes the store contents for assertions. The clock
//! is pinned one day before the default record's start so "upcoming" is
//! deterministic.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use meetsync::store::{EventRecord, FileStore};
use meetsync::sync::{PassSummary, SyncConfig, SyncEngine};

use crate::common::builders::SyncConfigBuilder;
use crate::common::fakes::{FakeBanner, FakeCalendar, FakeListing, FakeStreaming};

/// The fixed "now" every pass in the suites runs at.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap()
}

pub struct EngineHarness {
    // Held so the store directory outlives the engine.
    _temp: TempDir,
    store_path: PathBuf,
    pub streaming: Arc<FakeStreaming>,
    pub listing: Arc<FakeListing>,
    pub calendar: Arc<FakeCalendar>,
    pub banner: Arc<FakeBanner>,
    pub engine: SyncEngine,
}

impl EngineHarness {
    pub fn new(records: Vec<EventRecord>, config: SyncConfig) -> Self {
        let temp = TempDir::new().unwrap();
        let store_path = temp.path().join("events.yaml");
        FileStore::new(&store_path).save(&records).unwrap();

        let streaming = Arc::new(FakeStreaming::new());
        let listing = Arc::new(FakeListing::new());
        let calendar = Arc::new(FakeCalendar::new());
        let banner = Arc::new(FakeBanner::new());

        let engine = SyncEngine::new(
            FileStore::new(&store_path),
            config,
            streaming.clone(),
            listing.clone(),
            calendar.clone(),
            banner.clone(),
        );

        Self {
            _temp: temp,
            store_path,
            streaming,
            listing,
            calendar,
            banner,
            engine,
        }
    }

    /// Harness with the default configuration (all stages on).
    pub fn with_records(records: Vec<EventRecord>) -> Self {
        Self::new(records, SyncConfigBuilder::new().build())
    }

    pub async fn run_pass(&self) -> PassSummary {
        self.engine
            .check_events(test_now())
            .await
            .expect("reconciliation pass failed")
    }

    /// Reloads the store from disk.
    pub fn records(&self) -> Vec<EventRecord> {
        FileStore::new(&self.store_path).load().unwrap()
    }

    /// Reloads the store and returns the record at `idx`.
    pub fn record(&self, idx: usize) -> EventRecord {
        let mut records = self.records();
        records.remove(idx)
    }

    pub fn clear_calls(&self) {
        self.streaming.clear_calls();
        self.listing.clear_calls();
    }
}
