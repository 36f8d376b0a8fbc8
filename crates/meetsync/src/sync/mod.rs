//! Reconciliation: the engine that drives records through the platform
//! stages, the diffs it acts on, and the scheduler that runs it.

pub mod config;
pub mod diff;
pub mod engine;
pub mod scheduler;
pub mod title;

pub use config::SyncConfig;
pub use diff::{ListingDiff, StreamDiff};
pub use engine::{PassSummary, StageOutcome, SyncEngine};
pub use scheduler::SyncScheduler;
pub use title::{format_display_window, BannerTitle};
