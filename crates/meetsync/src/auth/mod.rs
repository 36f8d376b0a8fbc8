//! Credential handling for the platform adapters.
//!
//! Tokens are provisioned externally (the OAuth dance is out of scope) and
//! read from a flat YAML file at startup. Adapters hold their credentials as
//! [`secrecy::SecretString`] so they never land in debug output.

pub mod jwt;
pub mod store;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use jwt::{check_session_token, session_token_expiry};
pub use store::{OAuthTokens, StreamingTokens, TokenFile, TokenStore};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to read token store '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse token store '{path}': {message}")]
    ParseYaml { path: PathBuf, message: String },

    #[error("Failed to serialize token store: {0}")]
    Serialize(String),

    #[error("Failed to write token store '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session token expired at {expired_at}")]
    TokenExpired { expired_at: DateTime<Utc> },

    #[error("Invalid session token: {0}")]
    InvalidToken(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
