//! Event-listing platform surface.
//!
//! [`ListingService`] is the seam the engine reconciles listings through;
//! [`meetup`] holds the real client and [`markup`] the rich-text conversions
//! shared between submission and change detection.

pub mod markup;
pub mod meetup;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use thiserror::Error;

pub use meetup::MeetupClient;

#[derive(Error, Debug)]
pub enum ListingError {
    /// Failed to construct the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    ClientSetup(String),

    /// The request never produced a response.
    #[error("Listing platform request failed: {0}")]
    Request(String),

    /// The platform answered with a non-success status.
    #[error("Listing platform returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to parse listing platform response: {0}")]
    Parse(String),

    /// The photo to upload could not be read.
    #[error("Failed to read photo '{path}': {source}")]
    ReadPhoto {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ListingError>;

/// Draft-creation payload. The description is already in the platform's
/// rich-text form with the video link appended.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub description_html: String,
    pub start_at: DateTime<FixedOffset>,
    pub duration_mins: u32,
    pub public: bool,
    pub video_link: String,
    /// Platform member IDs resolved through the organizer mapping.
    pub organizer_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingUpdate {
    pub title: String,
    pub description_html: String,
    pub start_at: DateTime<FixedOffset>,
    pub duration_mins: u32,
    pub video_link: String,
    /// Set when a freshly uploaded photo should become the featured one.
    pub featured_photo_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedListing {
    pub id: String,
    pub link: String,
}

/// Remote listing state, as fetched for change detection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteListing {
    pub id: String,
    pub title: String,
    pub description_html: String,
    pub link: String,
}

#[async_trait]
pub trait ListingService: Send + Sync {
    /// Creates the listing as a draft and returns its ID and public link.
    async fn create_draft_event(&self, draft: &ListingDraft) -> Result<CreatedListing>;

    /// Uploads a photo to the listing and returns the photo ID.
    async fn upload_photo(&self, listing_id: &str, image_path: &str) -> Result<String>;

    async fn update_event(&self, listing_id: &str, update: &ListingUpdate) -> Result<()>;

    async fn get_event(&self, listing_id: &str) -> Result<RemoteListing>;
}
