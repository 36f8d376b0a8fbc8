//! Flat-file event store.
//!
//! The store is a single YAML file holding the full collection of managed
//! events. It is the source of truth: every pass loads it, reconciles, and
//! writes the updated collection back.

pub mod file;
pub mod record;

pub use file::FileStore;
pub use record::{AgendaItem, EventRecord, Organizer, Speaker, StreamRefs, ValidationError};
