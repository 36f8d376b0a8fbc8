//! Streaming platform surface.
//!
//! The engine talks to the streaming platform through [`StreamingService`] so
//! tests can inject a fake. The real client lives in [`streamyard`].

pub mod streamyard;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::config::DestinationKind;

pub use streamyard::StreamyardClient;

#[derive(Error, Debug)]
pub enum StreamingError {
    /// Failed to construct the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    ClientSetup(String),

    /// The request never produced a response.
    #[error("Streaming platform request failed: {0}")]
    Request(String),

    /// The platform answered with a non-success status.
    #[error("Streaming platform returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to parse streaming platform response: {0}")]
    Parse(String),

    /// The stream has no destination of the requested kind.
    #[error("Stream '{stream_id}' has no '{kind}' destination")]
    MissingDestination { stream_id: String, kind: String },

    /// The banner image to upload could not be read.
    #[error("Failed to read banner image '{path}': {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StreamingError>;

/// Destination metadata the stream stage persists onto the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub id: String,
    pub link: String,
}

/// Remote stream state, as fetched for change detection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteStream {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// Everything a destination create or update carries.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSpec {
    pub title: String,
    pub description: String,
    pub public: bool,
    pub start_at: DateTime<FixedOffset>,
    pub image_path: String,
}

#[async_trait]
pub trait StreamingService: Send + Sync {
    /// Creates a bare stream and returns its ID.
    async fn create_stream(&self, title: &str) -> Result<String>;

    /// Attaches a destination of `kind` to an existing stream and returns the
    /// destination's ID and public link.
    async fn create_destination(
        &self,
        kind: DestinationKind,
        stream_id: &str,
        spec: &StreamSpec,
    ) -> Result<Destination>;

    async fn get_stream(&self, stream_id: &str) -> Result<RemoteStream>;

    /// Renames the stream itself. Destination updates do not touch the
    /// stream title.
    async fn update_stream(&self, stream_id: &str, title: &str) -> Result<()>;

    /// Pushes destination metadata. The image is re-uploaded only when
    /// `force_image_upload` is set.
    async fn update_destination(
        &self,
        kind: DestinationKind,
        stream_id: &str,
        spec: &StreamSpec,
        force_image_upload: bool,
    ) -> Result<()>;

    /// The studio URL speakers join through.
    fn studio_url(&self, stream_id: &str) -> String;
}
