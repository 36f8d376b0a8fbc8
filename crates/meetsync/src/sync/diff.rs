//! Change detection.
//!
//! Pure field comparison between a local record and fetched remote state.
//! No I/O, no mutation: a record whose diffs come back empty produces no
//! platform calls, which is what makes passes idempotent.

use crate::listing::markup::from_listing_html;
use crate::listing::RemoteListing;
use crate::store::EventRecord;
use crate::streaming::RemoteStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamDiff {
    pub title_changed: bool,
    pub description_changed: bool,
    pub image_pending: bool,
}

impl StreamDiff {
    pub fn compute(record: &EventRecord, remote: &RemoteStream) -> Self {
        Self {
            title_changed: remote.title != record.title,
            description_changed: remote.description != record.description,
            image_pending: record.update_image_on_platforms,
        }
    }

    pub fn has_changes(&self) -> bool {
        self.title_changed || self.description_changed || self.image_pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListingDiff {
    pub title_changed: bool,
    pub description_changed: bool,
    pub image_pending: bool,
}

impl ListingDiff {
    /// `canonical_description` is the record description with the video link
    /// appended, exactly as the create path submits it. The remote side is
    /// converted back from rich text before comparing.
    pub fn compute(
        record: &EventRecord,
        canonical_description: &str,
        remote: &RemoteListing,
    ) -> Self {
        let remote_text = from_listing_html(&remote.description_html);
        Self {
            title_changed: remote.title != record.title,
            description_changed: remote_text != canonical_description,
            image_pending: record.update_image_on_platforms,
        }
    }

    pub fn has_changes(&self) -> bool {
        self.title_changed || self.description_changed || self.image_pending
    }
}
