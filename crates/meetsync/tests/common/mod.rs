//! Shared utilities for the meetsync integration suites.
//!
//! - `fakes` holds call-recording platform fakes with injectable failures
//! - `builders` holds record and configuration builders
//! - `harness` wires both into a real engine over a temp-directory store

pub mod builders;
pub mod fakes;
pub mod harness;

pub use builders::{EventRecordBuilder, SyncConfigBuilder};
pub use harness::{test_now, EngineHarness};
