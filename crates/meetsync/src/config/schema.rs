use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the YAML event collection file.
    pub event_store: PathBuf,
    /// Path to the YAML credential file the adapters read.
    pub token_store: PathBuf,
    #[serde(default)]
    pub sync: SyncSettings,
    pub streaming: StreamingConfig,
    pub listing: ListingConfig,
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub banner: BannerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minutes between scheduled passes.
    #[serde(default = "default_interval_mins")]
    pub interval_mins: u64,
    #[serde(default)]
    pub features: FeatureToggles,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_mins: default_interval_mins(),
            features: FeatureToggles::default(),
        }
    }
}

/// Per-stage switches. Stages default on so a minimal config reconciles
/// everything; dry-run defaults off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureToggles {
    #[serde(default = "default_true")]
    pub stream_sync: bool,
    #[serde(default = "default_true")]
    pub listing_sync: bool,
    #[serde(default = "default_true")]
    pub calendar_sync: bool,
    #[serde(default = "default_true")]
    pub banner_sync: bool,
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            stream_sync: true,
            listing_sync: true,
            calendar_sync: true,
            banner_sync: true,
            dry_run: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_mins() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Account/brand identifier on the streaming platform.
    pub user_id: String,
    /// Which destination kind new streams are attached to.
    #[serde(default)]
    pub destination: DestinationKind,
    #[serde(default)]
    pub destinations: DestinationIds,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestinationIds {
    #[serde(default)]
    pub youtube: String,
    #[serde(default)]
    pub facebook_group: String,
}

impl DestinationIds {
    pub fn for_kind(&self, kind: DestinationKind) -> &str {
        match kind {
            DestinationKind::Youtube => &self.youtube,
            DestinationKind::FacebookGroup => &self.facebook_group,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    Youtube,
    FacebookGroup,
}

impl Default for DestinationKind {
    fn default() -> Self {
        DestinationKind::Youtube
    }
}

impl DestinationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationKind::Youtube => "youtube",
            DestinationKind::FacebookGroup => "facebook_group",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// URL-name of the group the listings belong to.
    pub group: String,
    /// Organizer email to platform member ID.
    #[serde(default)]
    pub organizer_mapping: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub calendar_id: String,
    /// Invitation body; `{stream_url}` is replaced with the stream's studio
    /// URL when the calendar event is created.
    #[serde(default = "default_invitation_template")]
    pub invitation_template: String,
}

fn default_invitation_template() -> String {
    "You can join the session as a speaker via the studio link: {stream_url}".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerConfig {
    #[serde(default = "default_renderer_url")]
    pub renderer_url: String,
    /// Directory rendered banner images are written into.
    #[serde(default = "default_banner_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            renderer_url: default_renderer_url(),
            output_dir: default_banner_output_dir(),
        }
    }
}

fn default_renderer_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_banner_output_dir() -> PathBuf {
    PathBuf::from("banners")
}
