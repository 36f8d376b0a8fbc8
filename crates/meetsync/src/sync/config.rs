use std::collections::BTreeMap;

use crate::config::{Config, DestinationKind, FeatureToggles};

/// The slice of the full configuration the engine needs per pass.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub features: FeatureToggles,
    pub destination: DestinationKind,
    pub organizer_mapping: BTreeMap<String, String>,
    pub calendar_id: String,
    pub invitation_template: String,
}

impl SyncConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            features: config.sync.features.clone(),
            destination: config.streaming.destination,
            organizer_mapping: config.listing.organizer_mapping.clone(),
            calendar_id: config.calendar.calendar_id.clone(),
            invitation_template: config.calendar.invitation_template.clone(),
        }
    }
}
