//! Meetup client.
//!
//! Drafts are created unannounced and stay drafts until an organizer
//! publishes them by hand. Times and durations go over the wire in
//! milliseconds.

use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::listing::{
    CreatedListing, ListingDraft, ListingError, ListingService, ListingUpdate, RemoteListing,
    Result,
};

const MEETUP_API_BASE_URL: &str = "https://api.meetup.com";

/// Default connect timeout for HTTP requests (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout for HTTP requests (30 seconds).
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ListingError::ClientSetup(format!("Failed to create HTTP client: {}", e)))
}

#[derive(Debug, Clone, Deserialize)]
struct EventResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PhotoResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    photo_link: String,
}

pub struct MeetupClient {
    client: Client,
    base_url: String,
    group: String,
    access_token: SecretString,
}

impl MeetupClient {
    pub fn new(group: String, access_token: SecretString) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            base_url: MEETUP_API_BASE_URL.to_string(),
            group,
            access_token,
        })
    }

    /// Points the client at a different host, e.g. a local proxy.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }

    fn event_url(&self, listing_id: &str) -> String {
        format!("{}/{}/events/{}", self.base_url, self.group, listing_id)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ListingError::Api { status, body });
        }
        Ok(response)
    }

    async fn parse_event(response: reqwest::Response) -> Result<EventResponse> {
        response
            .json::<EventResponse>()
            .await
            .map_err(|e| ListingError::Parse(format!("Failed to parse event: {}", e)))
    }

    async fn photo_part(image_path: &str) -> Result<Part> {
        let bytes = tokio::fs::read(image_path)
            .await
            .map_err(|e| ListingError::ReadPhoto {
                path: PathBuf::from(image_path),
                source: e,
            })?;

        let file_name = Path::new(image_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo.png".to_string());
        let mime = mime_guess::from_path(image_path).first_or_octet_stream();

        Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.as_ref())
            .map_err(|e| ListingError::Request(format!("Invalid photo content type: {}", e)))
    }
}

#[async_trait]
impl ListingService for MeetupClient {
    async fn create_draft_event(&self, draft: &ListingDraft) -> Result<CreatedListing> {
        info!("Creating draft listing '{}'", draft.title);

        let duration_ms = i64::from(draft.duration_mins) * 60 * 1000;
        let params = [
            ("announce", "false".to_string()),
            ("duration", duration_ms.to_string()),
            ("event_hosts", draft.organizer_ids.join(",")),
            ("name", draft.title.clone()),
            ("publish_status", "draft".to_string()),
            ("time", draft.start_at.timestamp_millis().to_string()),
            ("venue_id", "online".to_string()),
            ("description", draft.description_html.clone()),
            ("how_to_find_us", draft.video_link.clone()),
        ];

        let response = self
            .client
            .post(format!("{}/{}/events", self.base_url, self.group))
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .form(&params)
            .send()
            .await
            .map_err(|e| ListingError::Request(format!("Failed to create listing: {}", e)))?;

        let response = Self::check_status(response).await?;
        let event = Self::parse_event(response).await?;

        debug!("Created listing {} ({})", event.id, event.status);
        Ok(CreatedListing {
            id: event.id,
            link: event.link,
        })
    }

    async fn upload_photo(&self, listing_id: &str, image_path: &str) -> Result<String> {
        info!("Uploading photo '{}' to listing {}", image_path, listing_id);

        let form = Form::new().part("photo", Self::photo_part(image_path).await?);
        let response = self
            .client
            .post(format!("{}/photos", self.event_url(listing_id)))
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ListingError::Request(format!("Failed to upload photo: {}", e)))?;

        let response = Self::check_status(response).await?;
        let photo: PhotoResponse = response
            .json()
            .await
            .map_err(|e| ListingError::Parse(format!("Failed to parse photo response: {}", e)))?;

        if photo.id.is_empty() {
            return Err(ListingError::Parse(
                "Photo upload response did not include a photo ID".to_string(),
            ));
        }

        debug!("Uploaded photo {} ({})", photo.id, photo.photo_link);
        Ok(photo.id)
    }

    async fn update_event(&self, listing_id: &str, update: &ListingUpdate) -> Result<()> {
        info!(
            "Updating listing {} (featured photo: {:?})",
            listing_id, update.featured_photo_id
        );

        let duration_ms = i64::from(update.duration_mins) * 60 * 1000;
        let mut params = vec![
            ("name", update.title.clone()),
            ("description", update.description_html.clone()),
            ("time", update.start_at.timestamp_millis().to_string()),
            ("duration", duration_ms.to_string()),
            ("how_to_find_us", update.video_link.clone()),
        ];
        if let Some(photo_id) = &update.featured_photo_id {
            params.push(("featured_photo_id", photo_id.clone()));
        }

        let response = self
            .client
            .patch(self.event_url(listing_id))
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .form(&params)
            .send()
            .await
            .map_err(|e| ListingError::Request(format!("Failed to update listing: {}", e)))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn get_event(&self, listing_id: &str) -> Result<RemoteListing> {
        let response = self
            .client
            .get(self.event_url(listing_id))
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .send()
            .await
            .map_err(|e| ListingError::Request(format!("Failed to fetch listing: {}", e)))?;

        let response = Self::check_status(response).await?;
        let event = Self::parse_event(response).await?;

        Ok(RemoteListing {
            id: event.id,
            title: event.name,
            description_html: event.description,
            link: event.link,
        })
    }
}
