//! Streamyard client.
//!
//! Streamyard has no public API; this client speaks the same endpoints the
//! browser studio does, authenticated with the session cookie pair (CSRF
//! token + JWT) from the token store.

use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::config::{DestinationIds, DestinationKind};
use crate::streaming::{
    Destination, RemoteStream, Result, StreamSpec, StreamingError, StreamingService,
};

const STREAMYARD_BASE_URL: &str = "https://streamyard.com";

/// Default connect timeout for HTTP requests (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout for HTTP requests (30 seconds).
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| StreamingError::ClientSetup(format!("Failed to create HTTP client: {}", e)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBroadcastRequest<'a> {
    csrf_token: &'a str,
    record_only: bool,
    selected_brand_id: &'a str,
    title: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenameBroadcastRequest<'a> {
    csrf_token: &'a str,
    title: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BroadcastResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    outputs: Vec<OutputResponse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutputResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    platform: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    platform_link: String,
}

/// Platform name as it appears on broadcast outputs.
fn platform_name(kind: DestinationKind) -> &'static str {
    match kind {
        DestinationKind::Youtube => "youtube",
        DestinationKind::FacebookGroup => "facebook",
    }
}

fn privacy_str(public: bool) -> &'static str {
    if public {
        "public"
    } else {
        "private"
    }
}

/// Streamyard expects the JS `Date` string form captured from the browser.
fn format_planned_start(start_at: DateTime<FixedOffset>) -> String {
    format!(
        "{} (Singapore Standard Time)",
        start_at.format("%a %b %d %Y %H:%M:%S GMT%z")
    )
}

fn find_output<'a>(
    broadcast: &'a BroadcastResponse,
    kind: DestinationKind,
) -> Option<&'a OutputResponse> {
    broadcast
        .outputs
        .iter()
        .find(|output| output.platform == platform_name(kind))
}

pub struct StreamyardClient {
    client: Client,
    base_url: String,
    user_id: String,
    destination_ids: DestinationIds,
    csrf_token: SecretString,
    jwt: SecretString,
}

impl StreamyardClient {
    pub fn new(
        user_id: String,
        destination_ids: DestinationIds,
        csrf_token: SecretString,
        jwt: SecretString,
    ) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            base_url: STREAMYARD_BASE_URL.to_string(),
            user_id,
            destination_ids,
            csrf_token,
            jwt,
        })
    }

    /// Points the client at a different host, e.g. a local proxy.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn cookie_header(&self) -> String {
        format!(
            "csrfToken={}; jwt={}",
            self.csrf_token.expose_secret(),
            self.jwt.expose_secret()
        )
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::ORIGIN, self.base_url.clone())
            .header(reqwest::header::COOKIE, self.cookie_header())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StreamingError::Api { status, body });
        }
        Ok(response)
    }

    async fn parse_broadcast(response: reqwest::Response) -> Result<BroadcastResponse> {
        response
            .json::<BroadcastResponse>()
            .await
            .map_err(|e| StreamingError::Parse(format!("Failed to parse broadcast: {}", e)))
    }

    async fn image_part(path: &str) -> Result<Part> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| StreamingError::ReadImage {
                path: PathBuf::from(path),
                source: e,
            })?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        Part::bytes(bytes)
            .file_name("blob")
            .mime_str(mime.as_ref())
            .map_err(|e| StreamingError::Request(format!("Invalid image content type: {}", e)))
    }

    /// Form fields shared by destination create and update calls.
    async fn destination_form(
        &self,
        kind: DestinationKind,
        spec: &StreamSpec,
        include_image: bool,
    ) -> Result<Form> {
        let mut form = Form::new()
            .text("title", spec.title.clone())
            .text("description", spec.description.clone())
            .text("privacy", privacy_str(spec.public))
            .text("plannedStartTime", format_planned_start(spec.start_at))
            .text(
                "destinationId",
                self.destination_ids.for_kind(kind).to_string(),
            )
            .text("csrfToken", self.csrf_token.expose_secret().to_string());

        if include_image {
            form = form.part("image", Self::image_part(&spec.image_path).await?);
        }

        Ok(form)
    }

    async fn fetch_broadcast(&self, stream_id: &str) -> Result<BroadcastResponse> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/api/broadcasts/{}", stream_id),
            )
            .send()
            .await
            .map_err(|e| StreamingError::Request(format!("Failed to fetch stream: {}", e)))?;

        let response = Self::check_status(response).await?;
        Self::parse_broadcast(response).await
    }
}

#[async_trait]
impl StreamingService for StreamyardClient {
    async fn create_stream(&self, title: &str) -> Result<String> {
        info!("Creating stream '{}'", title);

        let body = CreateBroadcastRequest {
            csrf_token: self.csrf_token.expose_secret(),
            record_only: false,
            selected_brand_id: &self.user_id,
            title,
        };

        let response = self
            .request(reqwest::Method::POST, "/api/broadcasts")
            .json(&body)
            .send()
            .await
            .map_err(|e| StreamingError::Request(format!("Failed to create stream: {}", e)))?;

        let response = Self::check_status(response).await?;
        let broadcast = Self::parse_broadcast(response).await?;

        debug!("Created stream {} ({})", broadcast.id, broadcast.status);
        Ok(broadcast.id)
    }

    async fn create_destination(
        &self,
        kind: DestinationKind,
        stream_id: &str,
        spec: &StreamSpec,
    ) -> Result<Destination> {
        info!(
            "Attaching {} destination to stream {}",
            kind.as_str(),
            stream_id
        );

        let form = self.destination_form(kind, spec, true).await?;
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/api/broadcasts/{}/outputs", stream_id),
            )
            .multipart(form)
            .send()
            .await
            .map_err(|e| StreamingError::Request(format!("Failed to create destination: {}", e)))?;

        let response = Self::check_status(response).await?;
        let broadcast = Self::parse_broadcast(response).await?;

        let output = find_output(&broadcast, kind).ok_or_else(|| {
            StreamingError::MissingDestination {
                stream_id: stream_id.to_string(),
                kind: kind.as_str().to_string(),
            }
        })?;

        Ok(Destination {
            id: output.id.clone(),
            link: output.platform_link.clone(),
        })
    }

    async fn get_stream(&self, stream_id: &str) -> Result<RemoteStream> {
        let broadcast = self.fetch_broadcast(stream_id).await?;

        // Managed streams carry exactly one output; its description is the
        // one the destination updates push.
        let description = broadcast
            .outputs
            .first()
            .map(|output| output.description.clone())
            .unwrap_or_default();

        Ok(RemoteStream {
            id: broadcast.id,
            title: broadcast.title,
            description,
        })
    }

    async fn update_stream(&self, stream_id: &str, title: &str) -> Result<()> {
        info!("Renaming stream {} to '{}'", stream_id, title);

        let body = RenameBroadcastRequest {
            csrf_token: self.csrf_token.expose_secret(),
            title,
        };

        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/api/broadcasts/{}", stream_id),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| StreamingError::Request(format!("Failed to rename stream: {}", e)))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn update_destination(
        &self,
        kind: DestinationKind,
        stream_id: &str,
        spec: &StreamSpec,
        force_image_upload: bool,
    ) -> Result<()> {
        let broadcast = self.fetch_broadcast(stream_id).await?;
        let output =
            find_output(&broadcast, kind).ok_or_else(|| StreamingError::MissingDestination {
                stream_id: stream_id.to_string(),
                kind: kind.as_str().to_string(),
            })?;

        info!(
            "Updating {} destination {} on stream {} (image upload: {})",
            kind.as_str(),
            output.id,
            stream_id,
            force_image_upload
        );

        let form = self
            .destination_form(kind, spec, force_image_upload)
            .await?;
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/api/broadcasts/{}/outputs/{}", stream_id, output.id),
            )
            .multipart(form)
            .send()
            .await
            .map_err(|e| StreamingError::Request(format!("Failed to update destination: {}", e)))?;

        Self::check_status(response).await?;
        Ok(())
    }

    fn studio_url(&self, stream_id: &str) -> String {
        format!("{}/{}", self.base_url, stream_id)
    }
}
