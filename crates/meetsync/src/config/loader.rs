use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_yaml::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.event_store.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            message: "event_store path must not be empty".to_string(),
        });
    }

    if config.token_store.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            message: "token_store path must not be empty".to_string(),
        });
    }

    if config.sync.interval_mins < 1 {
        return Err(ConfigError::Validation {
            message: format!(
                "sync.interval_mins must be at least 1, got {}",
                config.sync.interval_mins
            ),
        });
    }

    let features = &config.sync.features;

    if features.stream_sync {
        if config.streaming.user_id.is_empty() {
            return Err(ConfigError::Validation {
                message: "streaming.user_id must be set when stream_sync is enabled".to_string(),
            });
        }
        let kind = config.streaming.destination;
        if config.streaming.destinations.for_kind(kind).is_empty() {
            return Err(ConfigError::Validation {
                message: format!(
                    "streaming.destinations.{} must be set when stream_sync targets it",
                    kind.as_str()
                ),
            });
        }
    }

    if features.listing_sync && config.listing.group.is_empty() {
        return Err(ConfigError::Validation {
            message: "listing.group must be set when listing_sync is enabled".to_string(),
        });
    }

    if features.calendar_sync {
        if config.calendar.calendar_id.is_empty() {
            return Err(ConfigError::Validation {
                message: "calendar.calendar_id must be set when calendar_sync is enabled"
                    .to_string(),
            });
        }
        if !config.calendar.invitation_template.contains("{stream_url}") {
            return Err(ConfigError::Validation {
                message: "calendar.invitation_template must contain the {stream_url} placeholder"
                    .to_string(),
            });
        }
    }

    Ok(())
}
