/*!
 * Error types for the pot-translate application.
 *
 * This module contains custom error types for the different failure kinds
 * of a run, using the thiserror crate for ergonomic error definitions.
 * Only the orchestration layer decides what each kind means for the run:
 * none of them is allowed to abort the processing of sibling strings or files.
 */

use std::path::PathBuf;
use thiserror::Error;

use crate::translation::vault::ProtectionKind;

/// Errors that can occur when calling the external translation service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The request did not complete in time
    #[error("Request timed out: {0}")]
    Timeout(String),
}

impl ProviderError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) | Self::Timeout(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::RequestFailed(_) | Self::ParseError(_) => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised by a persisted key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing file could not be read or written
    #[error("Store I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a JSON object of strings
    #[error("Store {path:?} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory map could not be serialized
    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A restore token that does not resolve to a recorded protected value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token index is outside the recorded protection list
    #[error("{kind} token index {index} is out of range ({len} recorded)")]
    IndexOutOfRange {
        kind: ProtectionKind,
        index: usize,
        len: usize,
    },

    /// The token index could not be parsed
    #[error("{kind} token has a malformed index: {raw:?}")]
    MalformedIndex { kind: ProtectionKind, raw: String },
}

/// Errors that can occur while translating one string
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Restoration of protected substrings failed
    #[error("Token restore error: {0}")]
    Token(#[from] TokenError),
}
