//! Google Calendar client.

use log::{debug, info};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use async_trait::async_trait;

use crate::calendar::{CalendarError, CalendarEvent, CalendarService, Result};

const CALENDAR_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Default connect timeout for HTTP requests (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout for HTTP requests (30 seconds).
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| CalendarError::ClientSetup(format!("Failed to create HTTP client: {}", e)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventDateTime {
    /// RFC 3339 with the event's own offset; no separate time zone field.
    date_time: String,
}

#[derive(Debug, Serialize)]
struct EventAttendee {
    email: String,
}

#[derive(Debug, Serialize)]
struct InsertEventRequest {
    summary: String,
    description: String,
    start: EventDateTime,
    end: EventDateTime,
    attendees: Vec<EventAttendee>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertEventResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    html_link: String,
}

pub struct GoogleCalendarClient {
    client: Client,
    base_url: String,
    access_token: SecretString,
}

impl GoogleCalendarClient {
    pub fn new(access_token: SecretString) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            base_url: CALENDAR_API_BASE_URL.to_string(),
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
}

#[async_trait]
impl CalendarService for GoogleCalendarClient {
    async fn create_event(&self, calendar_id: &str, event: &CalendarEvent) -> Result<String> {
        info!(
            "Creating calendar event '{}' on calendar {}",
            event.title, calendar_id
        );

        let body = InsertEventRequest {
            summary: event.title.clone(),
            description: event.description.clone(),
            start: EventDateTime {
                date_time: event.start_at.to_rfc3339(),
            },
            end: EventDateTime {
                date_time: event.end_at.to_rfc3339(),
            },
            attendees: event
                .attendees
                .iter()
                .map(|email| EventAttendee {
                    email: email.clone(),
                })
                .collect(),
        };

        let response = self
            .client
            .post(format!(
                "{}/calendars/{}/events",
                self.base_url, calendar_id
            ))
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .json(&body)
            .send()
            .await
            .map_err(|e| CalendarError::Request(format!("Failed to create event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CalendarError::Api { status, body });
        }

        let created: InsertEventResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::Parse(format!("Failed to parse event response: {}", e)))?;

        debug!(
            "Created calendar event {} ({}) {}",
            created.id, created.status, created.html_link
        );
        Ok(created.id)
    }
}
