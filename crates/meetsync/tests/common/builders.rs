//! Builders for records and engine configuration used across the
//! integration suites.

#![allow(dead_code)]

use chrono::DateTime;

use meetsync::config::{DestinationKind, FeatureToggles};
use meetsync::store::{AgendaItem, EventRecord, Organizer, Speaker};
use meetsync::sync::SyncConfig;

/// Start date shared by the default test record, one day after
/// [`test_now`](crate::common::harness::test_now).
pub const TEST_START: &str = "2026-09-02T19:30:00+08:00";

/// Builder for event records. The default record is tracked, online,
/// public, validates cleanly, and carries a pre-set featured image so the
/// stream stage runs without the banner stage.
pub struct EventRecordBuilder {
    record: EventRecord,
}

impl EventRecordBuilder {
    pub fn new() -> Self {
        let mut record = EventRecord::default();
        record.track_event = true;
        record.title = "Series 10 - Topic Name".to_string();
        record.description =
            "A talk about things.\nSee https://example.org for more.".to_string();
        record.start_date = DateTime::parse_from_rfc3339(TEST_START).unwrap();
        record.duration = 120;
        record.is_online = true;
        record.is_public = true;
        record.featured_image_path = "assets/banner.png".to_string();
        record.organizers = vec![Organizer {
            name: "Alice Tan".to_string(),
            email: "alice@example.org".to_string(),
        }];
        Self { record }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.record.title = title.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.record.description = description.to_string();
        self
    }

    pub fn start_date(mut self, rfc3339: &str) -> Self {
        self.record.start_date = DateTime::parse_from_rfc3339(rfc3339).unwrap();
        self
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.record.duration = minutes;
        self
    }

    pub fn untracked(mut self) -> Self {
        self.record.track_event = false;
        self
    }

    pub fn offline(mut self) -> Self {
        self.record.is_online = false;
        self
    }

    pub fn private(mut self) -> Self {
        self.record.is_public = false;
        self
    }

    pub fn generate_banner(mut self) -> Self {
        self.record.generate_banner = true;
        self
    }

    pub fn image_update_pending(mut self) -> Self {
        self.record.update_image_on_platforms = true;
        self
    }

    pub fn featured_image(mut self, path: &str) -> Self {
        self.record.featured_image_path = path.to_string();
        self
    }

    /// Links the record to an existing stream.
    pub fn with_stream(mut self, stream_id: &str) -> Self {
        self.record.stream_id = stream_id.to_string();
        self.record.video_link = format!("https://watch.example/{}", stream_id);
        self
    }

    pub fn stream_id_only(mut self, stream_id: &str) -> Self {
        self.record.stream_id = stream_id.to_string();
        self
    }

    pub fn video_link_only(mut self, link: &str) -> Self {
        self.record.video_link = link.to_string();
        self
    }

    /// Links the record to an existing listing with its photo attached.
    pub fn with_listing(mut self, listing_id: &str, photo_id: &str) -> Self {
        self.record.listing_id = listing_id.to_string();
        self.record.listing_photo_id = photo_id.to_string();
        self.record.listing_link = format!("https://listings.example/{}", listing_id);
        self
    }

    pub fn listing_id_only(mut self, listing_id: &str) -> Self {
        self.record.listing_id = listing_id.to_string();
        self.record.listing_link = format!("https://listings.example/{}", listing_id);
        self
    }

    pub fn with_calendar_event(mut self, event_id: &str) -> Self {
        self.record.calendar_event_id = event_id.to_string();
        self
    }

    pub fn organizers(mut self, organizers: Vec<(&str, &str)>) -> Self {
        self.record.organizers = organizers
            .into_iter()
            .map(|(name, email)| Organizer {
                name: name.to_string(),
                email: email.to_string(),
            })
            .collect();
        self
    }

    pub fn agenda_talk(mut self, topic: &str, speakers: Vec<(&str, &str)>) -> Self {
        self.record.agenda.push(AgendaItem {
            item_type: "talk".to_string(),
            topic: topic.to_string(),
            synopsis: String::new(),
            speakers: speakers
                .into_iter()
                .map(|(name, email)| Speaker {
                    name: name.to_string(),
                    email: email.to_string(),
                })
                .collect(),
        });
        self
    }

    pub fn build(self) -> EventRecord {
        self.record
    }
}

impl Default for EventRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the engine configuration. Defaults enable every stage, map
/// the default record's organizer, and use a template with the
/// `{stream_url}` placeholder.
pub struct SyncConfigBuilder {
    config: SyncConfig,
}

impl SyncConfigBuilder {
    pub fn new() -> Self {
        let mut config = SyncConfig {
            features: FeatureToggles::default(),
            destination: DestinationKind::Youtube,
            organizer_mapping: Default::default(),
            calendar_id: "team@example.org".to_string(),
            invitation_template: "Join as a speaker: {stream_url}".to_string(),
        };
        config
            .organizer_mapping
            .insert("alice@example.org".to_string(), "111".to_string());
        Self { config }
    }

    pub fn stream_sync(mut self, enabled: bool) -> Self {
        self.config.features.stream_sync = enabled;
        self
    }

    pub fn listing_sync(mut self, enabled: bool) -> Self {
        self.config.features.listing_sync = enabled;
        self
    }

    pub fn calendar_sync(mut self, enabled: bool) -> Self {
        self.config.features.calendar_sync = enabled;
        self
    }

    pub fn banner_sync(mut self, enabled: bool) -> Self {
        self.config.features.banner_sync = enabled;
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.config.features.dry_run = true;
        self
    }

    pub fn destination(mut self, kind: DestinationKind) -> Self {
        self.config.destination = kind;
        self
    }

    pub fn organizer(mut self, email: &str, member_id: &str) -> Self {
        self.config
            .organizer_mapping
            .insert(email.to_string(), member_id.to_string());
        self
    }

    pub fn invitation_template(mut self, template: &str) -> Self {
        self.config.invitation_template = template.to_string();
        self
    }

    pub fn build(self) -> SyncConfig {
        self.config
    }
}

impl Default for SyncConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
