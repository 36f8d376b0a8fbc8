//! Flat-file token store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::auth::AuthError;

/// On-disk credential layout. Plain strings here; callers wrap the values in
/// `SecretString` before handing them to adapters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenFile {
    #[serde(default)]
    pub streaming: StreamingTokens,
    #[serde(default)]
    pub listing: OAuthTokens,
    #[serde(default)]
    pub calendar: OAuthTokens,
}

/// Session credentials for the streaming platform (cookie-based auth).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamingTokens {
    #[serde(default)]
    pub jwt: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuthTokens {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<TokenFile, AuthError> {
        let content = fs::read_to_string(&self.path).map_err(|e| AuthError::ReadFile {
            path: self.path.clone(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(TokenFile::default());
        }

        serde_yaml::from_str(&content).map_err(|e| AuthError::ParseYaml {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    pub fn save(&self, tokens: &TokenFile) -> Result<(), AuthError> {
        let yaml =
            serde_yaml::to_string(tokens).map_err(|e| AuthError::Serialize(e.to_string()))?;

        fs::write(&self.path, yaml).map_err(|e| AuthError::WriteFile {
            path: self.path.clone(),
            source: e,
        })
    }
}
