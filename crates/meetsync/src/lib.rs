pub mod auth;
pub mod banner;
pub mod calendar;
pub mod config;
pub mod error;
pub mod listing;
pub mod store;
pub mod streaming;
pub mod sync;

pub use auth::{check_session_token, TokenFile, TokenStore};
pub use banner::{BannerRenderer, HttpBannerRenderer};
pub use calendar::{CalendarService, GoogleCalendarClient};
pub use config::{load_config, Config, DestinationKind, FeatureToggles};
pub use error::{ConfigError, MeetsyncError, Result, StoreError};
pub use listing::{ListingService, MeetupClient};
pub use store::{EventRecord, FileStore, StreamRefs};
pub use streaming::{StreamingService, StreamyardClient};
pub use sync::{PassSummary, SyncConfig, SyncEngine, SyncScheduler};
