//! Banner renderer surface.

pub mod http;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpBannerRenderer;

#[derive(Error, Debug)]
pub enum BannerError {
    /// Failed to construct the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    ClientSetup(String),

    /// The request never produced a response.
    #[error("Banner renderer request failed: {0}")]
    Request(String),

    /// The renderer answered with a non-success status.
    #[error("Banner renderer returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The rendered image could not be written to disk.
    #[error("Failed to write banner image '{path}': {source}")]
    WriteImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory could not be created.
    #[error("Failed to create banner output directory '{path}': {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BannerError>;

#[async_trait]
pub trait BannerRenderer: Send + Sync {
    /// Renders a banner for the given series/talk pair and returns the path
    /// of the written image file.
    async fn render(
        &self,
        series_name: &str,
        talk_title: &str,
        display_window: &str,
    ) -> Result<PathBuf>;
}
