use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeetsyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Event store error: {0}")]
    Store(#[from] StoreError),

    #[error("Credential error: {0}")]
    Auth(#[from] crate::auth::AuthError),

    #[error("Streaming platform error: {0}")]
    Streaming(#[from] crate::streaming::StreamingError),

    #[error("Listing platform error: {0}")]
    Listing(#[from] crate::listing::ListingError),

    #[error("Calendar platform error: {0}")]
    Calendar(#[from] crate::calendar::CalendarError),

    #[error("Banner renderer error: {0}")]
    Banner(#[from] crate::banner::BannerError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read event store '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse event store '{path}': {message}")]
    ParseYaml { path: PathBuf, message: String },

    #[error("Failed to serialize event store: {0}")]
    Serialize(String),

    #[error("Failed to write event store '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace event store '{path}': {source}")]
    ReplaceFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MeetsyncError>;
