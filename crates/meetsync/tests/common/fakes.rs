//! In-memory fakes for the four platform services.
//!
//! Each fake records every call it receives, hands out deterministic
//! identifiers, and keeps a small remote-state map so change detection
//! behaves like it would against the real platforms. Failures are injected
//! per method and stay injected until cleared, which is how the resume
//! scenarios flip a platform from broken to healthy between passes.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use meetsync::banner::{BannerError, BannerRenderer};
use meetsync::calendar::{CalendarError, CalendarEvent, CalendarService};
use meetsync::config::DestinationKind;
use meetsync::listing::{
    CreatedListing, ListingDraft, ListingError, ListingService, ListingUpdate, RemoteListing,
};
use meetsync::streaming::{Destination, RemoteStream, StreamSpec, StreamingError, StreamingService};

fn injected_status() -> reqwest::StatusCode {
    reqwest::StatusCode::INTERNAL_SERVER_ERROR
}

// ---------------------------------------------------------------------------
// Streaming
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamingMethod {
    CreateStream,
    CreateDestination,
    GetStream,
    UpdateStream,
    UpdateDestination,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamingCall {
    CreateStream {
        title: String,
    },
    CreateDestination {
        kind: DestinationKind,
        stream_id: String,
        title: String,
        image_path: String,
    },
    GetStream {
        stream_id: String,
    },
    UpdateStream {
        stream_id: String,
        title: String,
    },
    UpdateDestination {
        kind: DestinationKind,
        stream_id: String,
        title: String,
        force_image_upload: bool,
    },
}

#[derive(Default)]
struct StreamingState {
    remotes: HashMap<String, RemoteStream>,
    calls: Vec<StreamingCall>,
    failing: HashSet<StreamingMethod>,
    next_id: usize,
}

#[derive(Default)]
pub struct FakeStreaming {
    state: Mutex<StreamingState>,
}

impl FakeStreaming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the remote state returned by `get_stream`.
    pub fn set_remote(&self, remote: RemoteStream) {
        let mut state = self.state.lock().unwrap();
        state.remotes.insert(remote.id.clone(), remote);
    }

    pub fn fail_on(&self, method: StreamingMethod) {
        self.state.lock().unwrap().failing.insert(method);
    }

    pub fn heal(&self, method: StreamingMethod) {
        self.state.lock().unwrap().failing.remove(&method);
    }

    pub fn calls(&self) -> Vec<StreamingCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn injected(&self) -> StreamingError {
        StreamingError::Api {
            status: injected_status(),
            body: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl StreamingService for FakeStreaming {
    async fn create_stream(&self, title: &str) -> Result<String, StreamingError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StreamingCall::CreateStream {
            title: title.to_string(),
        });
        if state.failing.contains(&StreamingMethod::CreateStream) {
            return Err(self.injected());
        }
        state.next_id += 1;
        let id = format!("st-{}", state.next_id);
        state.remotes.insert(
            id.clone(),
            RemoteStream {
                id: id.clone(),
                title: title.to_string(),
                description: String::new(),
            },
        );
        Ok(id)
    }

    async fn create_destination(
        &self,
        kind: DestinationKind,
        stream_id: &str,
        spec: &StreamSpec,
    ) -> Result<Destination, StreamingError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StreamingCall::CreateDestination {
            kind,
            stream_id: stream_id.to_string(),
            title: spec.title.clone(),
            image_path: spec.image_path.clone(),
        });
        if state.failing.contains(&StreamingMethod::CreateDestination) {
            return Err(self.injected());
        }
        if let Some(remote) = state.remotes.get_mut(stream_id) {
            remote.description = spec.description.clone();
        }
        Ok(Destination {
            id: format!("out-{}", stream_id),
            link: format!("https://watch.example/{}", stream_id),
        })
    }

    async fn get_stream(&self, stream_id: &str) -> Result<RemoteStream, StreamingError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StreamingCall::GetStream {
            stream_id: stream_id.to_string(),
        });
        if state.failing.contains(&StreamingMethod::GetStream) {
            return Err(self.injected());
        }
        state
            .remotes
            .get(stream_id)
            .cloned()
            .ok_or_else(|| StreamingError::Api {
                status: reqwest::StatusCode::NOT_FOUND,
                body: format!("no stream {}", stream_id),
            })
    }

    async fn update_stream(&self, stream_id: &str, title: &str) -> Result<(), StreamingError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StreamingCall::UpdateStream {
            stream_id: stream_id.to_string(),
            title: title.to_string(),
        });
        if state.failing.contains(&StreamingMethod::UpdateStream) {
            return Err(self.injected());
        }
        if let Some(remote) = state.remotes.get_mut(stream_id) {
            remote.title = title.to_string();
        }
        Ok(())
    }

    async fn update_destination(
        &self,
        kind: DestinationKind,
        stream_id: &str,
        spec: &StreamSpec,
        force_image_upload: bool,
    ) -> Result<(), StreamingError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StreamingCall::UpdateDestination {
            kind,
            stream_id: stream_id.to_string(),
            title: spec.title.clone(),
            force_image_upload,
        });
        if state.failing.contains(&StreamingMethod::UpdateDestination) {
            return Err(self.injected());
        }
        if let Some(remote) = state.remotes.get_mut(stream_id) {
            remote.description = spec.description.clone();
        }
        Ok(())
    }

    fn studio_url(&self, stream_id: &str) -> String {
        format!("https://studio.example/{}", stream_id)
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingMethod {
    CreateDraft,
    UploadPhoto,
    UpdateEvent,
    GetEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingCall {
    CreateDraft {
        title: String,
        description_html: String,
        duration_mins: u32,
        organizer_ids: Vec<String>,
    },
    UploadPhoto {
        listing_id: String,
        image_path: String,
    },
    UpdateEvent {
        listing_id: String,
        description_html: String,
        featured_photo_id: Option<String>,
    },
    GetEvent {
        listing_id: String,
    },
}

#[derive(Default)]
struct ListingState {
    remotes: HashMap<String, RemoteListing>,
    calls: Vec<ListingCall>,
    failing: HashSet<ListingMethod>,
    next_event_id: usize,
    next_photo_id: usize,
}

#[derive(Default)]
pub struct FakeListing {
    state: Mutex<ListingState>,
}

impl FakeListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the remote state returned by `get_event`.
    pub fn set_remote(&self, remote: RemoteListing) {
        let mut state = self.state.lock().unwrap();
        state.remotes.insert(remote.id.clone(), remote);
    }

    pub fn fail_on(&self, method: ListingMethod) {
        self.state.lock().unwrap().failing.insert(method);
    }

    pub fn heal(&self, method: ListingMethod) {
        self.state.lock().unwrap().failing.remove(&method);
    }

    pub fn calls(&self) -> Vec<ListingCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn injected(&self) -> ListingError {
        ListingError::Api {
            status: injected_status(),
            body: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl ListingService for FakeListing {
    async fn create_draft_event(
        &self,
        draft: &ListingDraft,
    ) -> Result<CreatedListing, ListingError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ListingCall::CreateDraft {
            title: draft.title.clone(),
            description_html: draft.description_html.clone(),
            duration_mins: draft.duration_mins,
            organizer_ids: draft.organizer_ids.clone(),
        });
        if state.failing.contains(&ListingMethod::CreateDraft) {
            return Err(self.injected());
        }
        state.next_event_id += 1;
        let id = format!("ev-{}", state.next_event_id);
        let link = format!("https://listings.example/{}", id);
        state.remotes.insert(
            id.clone(),
            RemoteListing {
                id: id.clone(),
                title: draft.title.clone(),
                description_html: draft.description_html.clone(),
                link: link.clone(),
            },
        );
        Ok(CreatedListing { id, link })
    }

    async fn upload_photo(
        &self,
        listing_id: &str,
        image_path: &str,
    ) -> Result<String, ListingError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ListingCall::UploadPhoto {
            listing_id: listing_id.to_string(),
            image_path: image_path.to_string(),
        });
        if state.failing.contains(&ListingMethod::UploadPhoto) {
            return Err(self.injected());
        }
        state.next_photo_id += 1;
        Ok(format!("ph-{}", state.next_photo_id))
    }

    async fn update_event(
        &self,
        listing_id: &str,
        update: &ListingUpdate,
    ) -> Result<(), ListingError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ListingCall::UpdateEvent {
            listing_id: listing_id.to_string(),
            description_html: update.description_html.clone(),
            featured_photo_id: update.featured_photo_id.clone(),
        });
        if state.failing.contains(&ListingMethod::UpdateEvent) {
            return Err(self.injected());
        }
        if let Some(remote) = state.remotes.get_mut(listing_id) {
            remote.title = update.title.clone();
            remote.description_html = update.description_html.clone();
        }
        Ok(())
    }

    async fn get_event(&self, listing_id: &str) -> Result<RemoteListing, ListingError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ListingCall::GetEvent {
            listing_id: listing_id.to_string(),
        });
        if state.failing.contains(&ListingMethod::GetEvent) {
            return Err(self.injected());
        }
        state
            .remotes
            .get(listing_id)
            .cloned()
            .ok_or_else(|| ListingError::Api {
                status: reqwest::StatusCode::NOT_FOUND,
                body: format!("no listing {}", listing_id),
            })
    }
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCall {
    pub calendar_id: String,
    pub event: CalendarEvent,
}

#[derive(Default)]
struct CalendarState {
    calls: Vec<CalendarCall>,
    failing: bool,
    next_id: usize,
}

#[derive(Default)]
pub struct FakeCalendar {
    state: Mutex<CalendarState>,
}

impl FakeCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    pub fn calls(&self) -> Vec<CalendarCall> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl CalendarService for FakeCalendar {
    async fn create_event(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> Result<String, CalendarError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(CalendarCall {
            calendar_id: calendar_id.to_string(),
            event: event.clone(),
        });
        if state.failing {
            return Err(CalendarError::Api {
                status: injected_status(),
                body: "injected failure".to_string(),
            });
        }
        state.next_id += 1;
        Ok(format!("cal-{}", state.next_id))
    }
}

// ---------------------------------------------------------------------------
// Banner renderer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerCall {
    pub series_name: String,
    pub talk_title: String,
    pub display_window: String,
}

#[derive(Default)]
struct BannerState {
    calls: Vec<BannerCall>,
    failing: bool,
    next_id: usize,
}

#[derive(Default)]
pub struct FakeBanner {
    state: Mutex<BannerState>,
}

impl FakeBanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    pub fn calls(&self) -> Vec<BannerCall> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl BannerRenderer for FakeBanner {
    async fn render(
        &self,
        series_name: &str,
        talk_title: &str,
        display_window: &str,
    ) -> Result<PathBuf, BannerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(BannerCall {
            series_name: series_name.to_string(),
            talk_title: talk_title.to_string(),
            display_window: display_window.to_string(),
        });
        if state.failing {
            return Err(BannerError::Api {
                status: injected_status(),
                body: "injected failure".to_string(),
            });
        }
        state.next_id += 1;
        Ok(PathBuf::from(format!("banners/render-{}.png", state.next_id)))
    }
}
