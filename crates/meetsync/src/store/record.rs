//! Event record schema for the YAML event store.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural problems that make a record unsafe to reconcile.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is not set")]
    MissingTitle,

    #[error("description is not set")]
    MissingDescription,

    #[error("start date is not set")]
    MissingStartDate,

    #[error("duration is not set")]
    MissingDuration,

    #[error("organizers is not set")]
    MissingOrganizers,
}

/// The (stream ID, video link) pair dependent stages are gated on.
///
/// Only available once the stream stage has both created the stream and
/// captured its destination link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRefs {
    pub stream_id: String,
    pub video_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organizer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaItem {
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub speakers: Vec<Speaker>,
}

/// One managed event.
///
/// Empty strings mean "not assigned yet" for the platform identifier and
/// link fields; absent YAML keys deserialize to their defaults so sparse
/// records stay loadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub track_event: bool,
    #[serde(default)]
    pub generate_banner: bool,
    #[serde(default)]
    pub update_image_on_platforms: bool,
    #[serde(default)]
    pub featured_image_path: String,
    #[serde(default = "default_start_date")]
    pub start_date: DateTime<FixedOffset>,
    /// Event length in minutes.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub stream_id: String,
    #[serde(default)]
    pub video_link: String,
    #[serde(default)]
    pub listing_id: String,
    #[serde(default)]
    pub listing_photo_id: String,
    #[serde(default)]
    pub listing_link: String,
    #[serde(default)]
    pub calendar_event_id: String,
    #[serde(default)]
    pub organizers: Vec<Organizer>,
    #[serde(default)]
    pub agenda: Vec<AgendaItem>,
}

fn default_start_date() -> DateTime<FixedOffset> {
    DateTime::UNIX_EPOCH.fixed_offset()
}

impl Default for EventRecord {
    fn default() -> Self {
        EventRecord {
            track_event: false,
            generate_banner: false,
            update_image_on_platforms: false,
            featured_image_path: String::new(),
            start_date: default_start_date(),
            duration: 0,
            title: String::new(),
            description: String::new(),
            is_online: false,
            is_public: false,
            stream_id: String::new(),
            video_link: String::new(),
            listing_id: String::new(),
            listing_photo_id: String::new(),
            listing_link: String::new(),
            calendar_event_id: String::new(),
            organizers: Vec::new(),
            agenda: Vec::new(),
        }
    }
}

impl EventRecord {
    /// Checks the fields every stage relies on. A record that fails here is
    /// skipped for the whole pass.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        if self.start_date == default_start_date() {
            return Err(ValidationError::MissingStartDate);
        }
        if self.duration == 0 {
            return Err(ValidationError::MissingDuration);
        }
        if self.organizers.is_empty() {
            return Err(ValidationError::MissingOrganizers);
        }
        Ok(())
    }

    /// Returns the stream references once both halves exist. Listing and
    /// calendar stages only run when this is `Some`.
    pub fn stream_refs(&self) -> Option<StreamRefs> {
        if self.stream_id.is_empty() || self.video_link.is_empty() {
            return None;
        }
        Some(StreamRefs {
            stream_id: self.stream_id.clone(),
            video_link: self.video_link.clone(),
        })
    }

    /// True when the event starts strictly after `now`. Records that are not
    /// upcoming are frozen and never reconciled.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_date > now
    }

    /// Title plus a concrete time window. The banner stage needs all three.
    pub fn has_schedule(&self) -> bool {
        !self.title.is_empty() && self.start_date != default_start_date() && self.duration != 0
    }

    pub fn end_date(&self) -> DateTime<FixedOffset> {
        self.start_date + Duration::minutes(i64::from(self.duration))
    }

    /// Deduplicated union of organizer and agenda speaker emails, in a
    /// stable sorted order. Empty emails are dropped.
    pub fn attendee_emails(&self) -> Vec<String> {
        let mut emails = BTreeSet::new();
        for organizer in &self.organizers {
            if !organizer.email.is_empty() {
                emails.insert(organizer.email.clone());
            }
        }
        for item in &self.agenda {
            for speaker in &item.speakers {
                if !speaker.email.is_empty() {
                    emails.insert(speaker.email.clone());
                }
            }
        }
        emails.into_iter().collect()
    }
}
