//! Calendar platform surface.
//!
//! Deliberately minimal: calendar events are created once and never touched
//! again, so [`CalendarService`] only knows how to create.

pub mod google;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use thiserror::Error;

pub use google::GoogleCalendarClient;

#[derive(Error, Debug)]
pub enum CalendarError {
    /// Failed to construct the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    ClientSetup(String),

    /// The request never produced a response.
    #[error("Calendar platform request failed: {0}")]
    Request(String),

    /// The platform answered with a non-success status.
    #[error("Calendar platform returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to parse calendar platform response: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, CalendarError>;

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub title: String,
    pub description: String,
    pub start_at: DateTime<FixedOffset>,
    pub end_at: DateTime<FixedOffset>,
    /// Attendee emails, already deduplicated.
    pub attendees: Vec<String>,
}

#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Creates the event and returns its ID.
    async fn create_event(&self, calendar_id: &str, event: &CalendarEvent) -> Result<String>;
}
