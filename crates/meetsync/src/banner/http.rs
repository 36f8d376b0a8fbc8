//! HTTP banner renderer client.
//!
//! The renderer is a small local service that lays out the banner from three
//! query parameters and answers with the finished PNG. This client saves the
//! bytes under the configured output directory with a timestamped name so
//! successive renders never overwrite each other.

use log::info;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;

use crate::banner::{BannerError, BannerRenderer, Result};

/// Default connect timeout for HTTP requests (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Rendering can take a while on a cold renderer, so allow more than the
/// usual request timeout.
const RENDER_TIMEOUT: Duration = Duration::from_secs(60);

fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(RENDER_TIMEOUT)
        .build()
        .map_err(|e| BannerError::ClientSetup(format!("Failed to create HTTP client: {}", e)))
}

fn output_file_name() -> String {
    format!("{}.png", Local::now().format("%Y%m%d_%H%M"))
}

pub struct HttpBannerRenderer {
    client: Client,
    base_url: String,
    output_dir: PathBuf,
}

impl HttpBannerRenderer {
    pub fn new(base_url: String, output_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            base_url,
            output_dir,
        })
    }
}

#[async_trait]
impl BannerRenderer for HttpBannerRenderer {
    async fn render(
        &self,
        series_name: &str,
        talk_title: &str,
        display_window: &str,
    ) -> Result<PathBuf> {
        info!(
            "Rendering banner for '{}' / '{}' ({})",
            series_name, talk_title, display_window
        );

        let response = self
            .client
            .get(format!("{}/image", self.base_url))
            .query(&[
                ("series_name", series_name),
                ("webinar_title", talk_title),
                ("webinar_date", display_window),
            ])
            .send()
            .await
            .map_err(|e| BannerError::Request(format!("Failed to request banner: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BannerError::Api { status, body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BannerError::Request(format!("Failed to read banner bytes: {}", e)))?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| BannerError::CreateOutputDir {
                path: self.output_dir.clone(),
                source: e,
            })?;

        let path = self.output_dir.join(output_file_name());
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| BannerError::WriteImage {
                path: path.clone(),
                source: e,
            })?;

        info!("Banner written to {}", path.display());
        Ok(path)
    }
}
