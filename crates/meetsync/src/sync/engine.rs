//! The reconciliation engine.
//!
//! One [`SyncEngine::check_events`] call is one pass: load the collection,
//! walk it in file order, drive each record through the banner, stream,
//! listing, and calendar stages, and persist whatever identifiers the
//! platforms assigned. The pass is strictly sequential and holds no lock;
//! callers must not overlap passes.
//!
//! Stages never touch content fields. They are only allowed to assign the
//! platform identifiers, derived links, and the banner fields
//! (`featured_image_path`, `update_image_on_platforms`), so "did anything
//! change" reduces to comparing the record against a snapshot.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::banner::BannerRenderer;
use crate::calendar::{CalendarEvent, CalendarService};
use crate::error::StoreError;
use crate::listing::markup::{append_video_link, to_listing_html};
use crate::listing::{ListingDraft, ListingService, ListingUpdate};
use crate::store::{EventRecord, FileStore, StreamRefs};
use crate::streaming::{StreamSpec, StreamingService};
use crate::sync::config::SyncConfig;
use crate::sync::diff::{ListingDiff, StreamDiff};
use crate::sync::title::{format_display_window, BannerTitle};

/// What a stage did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// A guard turned the stage into a no-op.
    Skipped,
    /// The stage ran and found nothing to do.
    Unchanged,
    /// The stage created or updated something.
    Applied,
    /// A platform call failed; the record was left as it was.
    Failed,
}

/// Counters for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub records_total: usize,
    pub skipped_untracked: usize,
    pub invalid: usize,
    pub records_changed: usize,
    pub stage_failures: usize,
}

impl fmt::Display for PassSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records ({} changed, {} untracked, {} invalid, {} stage failures)",
            self.records_total,
            self.records_changed,
            self.skipped_untracked,
            self.invalid,
            self.stage_failures
        )
    }
}

pub struct SyncEngine {
    store: FileStore,
    config: SyncConfig,
    streaming: Arc<dyn StreamingService>,
    listing: Arc<dyn ListingService>,
    calendar: Arc<dyn CalendarService>,
    banner: Arc<dyn BannerRenderer>,
}

impl SyncEngine {
    pub fn new(
        store: FileStore,
        config: SyncConfig,
        streaming: Arc<dyn StreamingService>,
        listing: Arc<dyn ListingService>,
        calendar: Arc<dyn CalendarService>,
        banner: Arc<dyn BannerRenderer>,
    ) -> Self {
        Self {
            store,
            config,
            streaming,
            listing,
            calendar,
            banner,
        }
    }

    /// Runs one reconciliation pass against the collection.
    ///
    /// Fails closed: a store that cannot be loaded runs no stages at all.
    /// Platform failures never abort the pass; they are logged, counted, and
    /// retried naturally on the next pass.
    pub async fn check_events(&self, now: DateTime<Utc>) -> Result<PassSummary, StoreError> {
        let pass_id = Uuid::new_v4();
        info!("Reconciliation pass {} starting", pass_id);

        let mut records = self.store.load()?;
        let mut summary = PassSummary {
            records_total: records.len(),
            ..PassSummary::default()
        };

        for idx in 0..records.len() {
            let before = records[idx].clone();
            let title = before.title.clone();

            if !records[idx].track_event {
                warn!("Event '{}' is not tracked; skipping", title);
                summary.skipped_untracked += 1;
                continue;
            }

            if let Err(e) = records[idx].validate() {
                error!("Event '{}' is invalid ({}); all stages skipped", title, e);
                summary.invalid += 1;
                continue;
            }

            let record = &mut records[idx];

            let banner_outcome = self.banner_stage(record, now).await;
            let stream_outcome = self.stream_stage(record, now).await;

            let (listing_outcome, calendar_outcome) = match record.stream_refs() {
                Some(refs) => (
                    self.listing_stage(record, &refs, now).await,
                    self.calendar_stage(record, &refs, now).await,
                ),
                None => {
                    debug!(
                        "Event '{}' has no stream link yet; listing and calendar wait for the next pass",
                        title
                    );
                    (StageOutcome::Skipped, StageOutcome::Skipped)
                }
            };

            for outcome in [
                banner_outcome,
                stream_outcome,
                listing_outcome,
                calendar_outcome,
            ] {
                if outcome == StageOutcome::Failed {
                    summary.stage_failures += 1;
                }
            }

            // The image flag is one-shot: set by the banner stage, consumed
            // by the stream and listing stages within the same pass.
            if !self.config.features.dry_run {
                records[idx].update_image_on_platforms = false;
            }

            if records[idx] != before {
                summary.records_changed += 1;
                // Commit assigned identifiers right away so a crash later in
                // the pass cannot orphan what the platforms already created.
                if let Err(e) = self.store.save(&records) {
                    warn!("Incremental save after '{}' failed: {}", title, e);
                }
            }
        }

        self.store.save(&records)?;

        info!("Reconciliation pass {} complete: {}", pass_id, summary);
        Ok(summary)
    }

    /// Renders the banner a record asked for, ahead of the platform stages.
    async fn banner_stage(&self, record: &mut EventRecord, now: DateTime<Utc>) -> StageOutcome {
        if !self.config.features.banner_sync {
            debug!("Banner sync disabled; '{}' skipped", record.title);
            return StageOutcome::Skipped;
        }
        if !record.is_upcoming(now) {
            debug!("Event '{}' is not upcoming; banner stage skipped", record.title);
            return StageOutcome::Skipped;
        }
        if !record.is_online {
            debug!("Event '{}' is not online; banner stage skipped", record.title);
            return StageOutcome::Skipped;
        }
        if !record.generate_banner {
            debug!("Event '{}' does not ask for a banner", record.title);
            return StageOutcome::Skipped;
        }
        if !record.has_schedule() {
            debug!(
                "Event '{}' is missing title, start, or duration; banner stage skipped",
                record.title
            );
            return StageOutcome::Skipped;
        }

        let banner_title = match BannerTitle::parse(&record.title) {
            Some(parsed) => parsed,
            None => {
                warn!(
                    "Title '{}' does not split into series and topic; banner generation aborted",
                    record.title
                );
                return StageOutcome::Skipped;
            }
        };

        // A stream that already carries this title means the banner was
        // rendered on an earlier pass.
        if !record.stream_id.is_empty() {
            match self.streaming.get_stream(&record.stream_id).await {
                Ok(remote) if remote.title == record.title => {
                    debug!("Banner for '{}' is current; render skipped", record.title);
                    return StageOutcome::Unchanged;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        "Stream fetch for banner check on '{}' failed: {}",
                        record.title, e
                    );
                    return StageOutcome::Failed;
                }
            }
        }

        let window = format_display_window(record.start_date, record.end_date());

        if self.config.features.dry_run {
            info!(
                "Dry run: would render banner for '{}' / '{}' ({})",
                banner_title.series_name, banner_title.talk_title, window
            );
            return StageOutcome::Unchanged;
        }

        match self
            .banner
            .render(&banner_title.series_name, &banner_title.talk_title, &window)
            .await
        {
            Ok(path) => {
                record.featured_image_path = path.to_string_lossy().into_owned();
                record.update_image_on_platforms = true;
                info!(
                    "Banner for '{}' rendered to {}",
                    record.title, record.featured_image_path
                );
                StageOutcome::Applied
            }
            Err(e) => {
                warn!("Banner render for '{}' failed: {}", record.title, e);
                StageOutcome::Failed
            }
        }
    }

    /// Creates or updates the record's stream and its destination.
    async fn stream_stage(&self, record: &mut EventRecord, now: DateTime<Utc>) -> StageOutcome {
        if !self.config.features.stream_sync {
            debug!("Stream sync disabled; '{}' skipped", record.title);
            return StageOutcome::Skipped;
        }
        if !record.is_upcoming(now) {
            debug!("Event '{}' is not upcoming; stream stage skipped", record.title);
            return StageOutcome::Skipped;
        }
        if !record.is_online {
            debug!("Event '{}' is not online; stream stage skipped", record.title);
            return StageOutcome::Skipped;
        }
        if !record.video_link.is_empty() && record.stream_id.is_empty() {
            error!(
                "Event '{}' has a video link but no stream ID; fix the record by hand",
                record.title
            );
            return StageOutcome::Failed;
        }
        if record.featured_image_path.is_empty() {
            error!(
                "Event '{}' has no featured image; set one or enable banner generation",
                record.title
            );
            return StageOutcome::Failed;
        }

        let kind = self.config.destination;
        let spec = StreamSpec {
            title: record.title.clone(),
            description: record.description.clone(),
            public: record.is_public,
            start_at: record.start_date,
            image_path: record.featured_image_path.clone(),
        };

        if record.stream_id.is_empty() {
            if self.config.features.dry_run {
                info!(
                    "Dry run: would create stream '{}' with a {} destination",
                    record.title,
                    kind.as_str()
                );
                return StageOutcome::Unchanged;
            }

            let stream_id = match self.streaming.create_stream(&record.title).await {
                Ok(id) => id,
                Err(e) => {
                    warn!("Stream create for '{}' failed: {}", record.title, e);
                    return StageOutcome::Failed;
                }
            };
            // Persist the ID before the destination call so a failure there
            // resumes instead of creating a second stream.
            record.stream_id = stream_id;

            match self
                .streaming
                .create_destination(kind, &record.stream_id, &spec)
                .await
            {
                Ok(destination) => {
                    record.video_link = destination.link;
                    info!(
                        "Stream {} created for '{}' ({})",
                        record.stream_id, record.title, record.video_link
                    );
                    StageOutcome::Applied
                }
                Err(e) => {
                    warn!(
                        "Destination attach for '{}' failed: {}; will resume next pass",
                        record.title, e
                    );
                    StageOutcome::Failed
                }
            }
        } else if record.video_link.is_empty() {
            // Stream exists but the destination attach never finished.
            if self.config.features.dry_run {
                info!(
                    "Dry run: would attach a {} destination to stream {}",
                    kind.as_str(),
                    record.stream_id
                );
                return StageOutcome::Unchanged;
            }

            match self
                .streaming
                .create_destination(kind, &record.stream_id, &spec)
                .await
            {
                Ok(destination) => {
                    record.video_link = destination.link;
                    info!(
                        "Destination attached to stream {} for '{}' ({})",
                        record.stream_id, record.title, record.video_link
                    );
                    StageOutcome::Applied
                }
                Err(e) => {
                    warn!(
                        "Destination attach for '{}' failed: {}; will resume next pass",
                        record.title, e
                    );
                    StageOutcome::Failed
                }
            }
        } else {
            let remote = match self.streaming.get_stream(&record.stream_id).await {
                Ok(remote) => remote,
                Err(e) => {
                    warn!("Stream fetch for '{}' failed: {}", record.title, e);
                    return StageOutcome::Failed;
                }
            };

            let diff = StreamDiff::compute(record, &remote);
            if !diff.has_changes() {
                debug!("Stream for '{}' is up to date", record.title);
                return StageOutcome::Unchanged;
            }

            info!(
                "Stream changes for '{}': title {}, description {}, image {}",
                record.title, diff.title_changed, diff.description_changed, diff.image_pending
            );

            if self.config.features.dry_run {
                info!("Dry run: would update stream {}", record.stream_id);
                return StageOutcome::Unchanged;
            }

            if let Err(e) = self
                .streaming
                .update_destination(kind, &record.stream_id, &spec, diff.image_pending)
                .await
            {
                warn!("Destination update for '{}' failed: {}", record.title, e);
                return StageOutcome::Failed;
            }

            // The destination update does not rename the stream itself.
            if diff.title_changed {
                if let Err(e) = self
                    .streaming
                    .update_stream(&record.stream_id, &record.title)
                    .await
                {
                    warn!("Stream rename for '{}' failed: {}", record.title, e);
                    return StageOutcome::Failed;
                }
            }

            StageOutcome::Applied
        }
    }

    /// Creates or updates the record's listing. Two-phase on create: the
    /// draft first, then the photo attach; either half can resume.
    async fn listing_stage(
        &self,
        record: &mut EventRecord,
        refs: &StreamRefs,
        now: DateTime<Utc>,
    ) -> StageOutcome {
        if !self.config.features.listing_sync {
            debug!("Listing sync disabled; '{}' skipped", record.title);
            return StageOutcome::Skipped;
        }
        if !record.is_upcoming(now) {
            debug!("Event '{}' is not upcoming; listing stage skipped", record.title);
            return StageOutcome::Skipped;
        }
        if !record.is_online {
            debug!("Event '{}' is not online; listing stage skipped", record.title);
            return StageOutcome::Skipped;
        }
        if record.featured_image_path.is_empty() {
            error!(
                "Event '{}' has no featured image; listing sync needs one",
                record.title
            );
            return StageOutcome::Failed;
        }

        let canonical_description = append_video_link(&record.description, &refs.video_link);

        if record.listing_id.is_empty() {
            let organizer_ids = self.resolve_organizers(record);

            if self.config.features.dry_run {
                info!(
                    "Dry run: would create draft listing '{}' with {} hosts",
                    record.title,
                    organizer_ids.len()
                );
                return StageOutcome::Unchanged;
            }

            let draft = ListingDraft {
                title: record.title.clone(),
                description_html: to_listing_html(&canonical_description),
                start_at: record.start_date,
                duration_mins: record.duration,
                public: record.is_public,
                video_link: refs.video_link.clone(),
                organizer_ids,
            };

            let created = match self.listing.create_draft_event(&draft).await {
                Ok(created) => created,
                Err(e) => {
                    warn!("Listing create for '{}' failed: {}", record.title, e);
                    return StageOutcome::Failed;
                }
            };
            // Persist the ID before the photo phase so a failure there
            // resumes instead of creating a duplicate draft.
            record.listing_id = created.id;
            record.listing_link = created.link;
            info!(
                "Listing {} created for '{}' ({})",
                record.listing_id, record.title, record.listing_link
            );

            self.attach_listing_photo(record, refs, &canonical_description)
                .await
        } else if record.listing_photo_id.is_empty() {
            // Draft exists but the photo was never attached.
            if self.config.features.dry_run {
                info!(
                    "Dry run: would attach a featured photo to listing {}",
                    record.listing_id
                );
                return StageOutcome::Unchanged;
            }

            self.attach_listing_photo(record, refs, &canonical_description)
                .await
        } else {
            let remote = match self.listing.get_event(&record.listing_id).await {
                Ok(remote) => remote,
                Err(e) => {
                    warn!("Listing fetch for '{}' failed: {}", record.title, e);
                    return StageOutcome::Failed;
                }
            };

            let diff = ListingDiff::compute(record, &canonical_description, &remote);
            if !diff.has_changes() {
                debug!("Listing for '{}' is up to date", record.title);
                return StageOutcome::Unchanged;
            }

            info!(
                "Listing changes for '{}': title {}, description {}, image {}",
                record.title, diff.title_changed, diff.description_changed, diff.image_pending
            );

            if self.config.features.dry_run {
                info!("Dry run: would update listing {}", record.listing_id);
                return StageOutcome::Unchanged;
            }

            let fresh_photo_id = if diff.image_pending {
                match self
                    .listing
                    .upload_photo(&record.listing_id, &record.featured_image_path)
                    .await
                {
                    Ok(photo_id) => Some(photo_id),
                    Err(e) => {
                        warn!("Photo upload for '{}' failed: {}", record.title, e);
                        return StageOutcome::Failed;
                    }
                }
            } else {
                None
            };

            let update = ListingUpdate {
                title: record.title.clone(),
                description_html: to_listing_html(&canonical_description),
                start_at: record.start_date,
                duration_mins: record.duration,
                video_link: refs.video_link.clone(),
                featured_photo_id: fresh_photo_id.clone(),
            };

            match self.listing.update_event(&record.listing_id, &update).await {
                Ok(()) => {
                    if let Some(photo_id) = fresh_photo_id {
                        record.listing_photo_id = photo_id;
                    }
                    StageOutcome::Applied
                }
                Err(e) => {
                    warn!("Listing update for '{}' failed: {}", record.title, e);
                    StageOutcome::Failed
                }
            }
        }
    }

    /// Second half of listing creation: upload the banner photo and make it
    /// the listing's featured photo. The photo ID is only persisted once the
    /// attach succeeds, so a half-done attach reruns cleanly.
    async fn attach_listing_photo(
        &self,
        record: &mut EventRecord,
        refs: &StreamRefs,
        canonical_description: &str,
    ) -> StageOutcome {
        let photo_id = match self
            .listing
            .upload_photo(&record.listing_id, &record.featured_image_path)
            .await
        {
            Ok(photo_id) => photo_id,
            Err(e) => {
                warn!(
                    "Photo upload for '{}' failed: {}; will resume next pass",
                    record.title, e
                );
                return StageOutcome::Failed;
            }
        };

        let update = ListingUpdate {
            title: record.title.clone(),
            description_html: to_listing_html(canonical_description),
            start_at: record.start_date,
            duration_mins: record.duration,
            video_link: refs.video_link.clone(),
            featured_photo_id: Some(photo_id.clone()),
        };

        match self.listing.update_event(&record.listing_id, &update).await {
            Ok(()) => {
                record.listing_photo_id = photo_id;
                info!(
                    "Featured photo {} attached to listing {}",
                    record.listing_photo_id, record.listing_id
                );
                StageOutcome::Applied
            }
            Err(e) => {
                warn!(
                    "Featured photo attach for '{}' failed: {}; will resume next pass",
                    record.title, e
                );
                StageOutcome::Failed
            }
        }
    }

    /// Creates the calendar invite. Create once, never update: an existing
    /// event ID ends the stage immediately.
    async fn calendar_stage(
        &self,
        record: &mut EventRecord,
        refs: &StreamRefs,
        now: DateTime<Utc>,
    ) -> StageOutcome {
        if !self.config.features.calendar_sync {
            debug!("Calendar sync disabled; '{}' skipped", record.title);
            return StageOutcome::Skipped;
        }
        if !record.is_upcoming(now) {
            debug!("Event '{}' is not upcoming; calendar stage skipped", record.title);
            return StageOutcome::Skipped;
        }
        if !record.is_online {
            debug!("Event '{}' is not online; calendar stage skipped", record.title);
            return StageOutcome::Skipped;
        }
        if !record.calendar_event_id.is_empty() {
            debug!(
                "Calendar event for '{}' already exists; left alone",
                record.title
            );
            return StageOutcome::Skipped;
        }

        let attendees = record.attendee_emails();
        let description = self
            .config
            .invitation_template
            .replace("{stream_url}", &self.streaming.studio_url(&refs.stream_id));

        if self.config.features.dry_run {
            info!(
                "Dry run: would create calendar event '{}' with {} attendees",
                record.title,
                attendees.len()
            );
            return StageOutcome::Unchanged;
        }

        let event = CalendarEvent {
            title: record.title.clone(),
            description,
            start_at: record.start_date,
            end_at: record.end_date(),
            attendees,
        };

        match self
            .calendar
            .create_event(&self.config.calendar_id, &event)
            .await
        {
            Ok(event_id) => {
                record.calendar_event_id = event_id;
                info!(
                    "Calendar event {} created for '{}'",
                    record.calendar_event_id, record.title
                );
                StageOutcome::Applied
            }
            Err(e) => {
                warn!("Calendar create for '{}' failed: {}", record.title, e);
                StageOutcome::Failed
            }
        }
    }

    /// Maps record organizers to platform member IDs. Unmapped organizers
    /// are dropped from the host list with a warning.
    fn resolve_organizers(&self, record: &EventRecord) -> Vec<String> {
        let mut ids = Vec::new();
        for organizer in &record.organizers {
            match self.config.organizer_mapping.get(&organizer.email) {
                Some(id) => ids.push(id.clone()),
                None => warn!(
                    "Organizer '{}' <{}> has no listing platform mapping; not listed as host",
                    organizer.name, organizer.email
                ),
            }
        }
        ids
    }
}
