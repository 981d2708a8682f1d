//! Error types for the facade and its collaborator.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Spotify reason code sent with player commands when no device is active.
const NO_ACTIVE_DEVICE_REASON: &str = "NO_ACTIVE_DEVICE";

/// Failure reported by the Spotify Web API collaborator.
///
/// The facade never rewrites these; they reach the caller inside
/// [`Error::Api`] exactly as the collaborator produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The API answered with a non-success status
    #[error("Spotify API error ({status}): {message}")]
    Status {
        status: u16,
        message: String,
        reason: Option<String>,
    },

    /// The request never completed (connection, TLS, timeout)
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The response body could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Refreshing the access token failed
    #[error("Re-authentication failed: {0}")]
    Reauthentication(String),

    /// Anything else the client library reported
    #[error("Spotify client error: {0}")]
    Other(String),
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Api {
        message: String,
        #[serde(default)]
        reason: Option<String>,
    },
    // Accounts service style: {"error": "invalid_grant", "error_description": "..."}
    Code(String),
}

impl ApiError {
    /// Build a status error from the raw response body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let (message, reason) = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error: ErrorBody::Api { message, reason } }) => (message, reason),
            Ok(ErrorEnvelope { error: ErrorBody::Code(code) }) => (code, None),
            Err(_) if body.trim().is_empty() => (format!("HTTP {status}"), None),
            Err(_) => (body.trim().to_string(), None),
        };
        ApiError::Status { status, message, reason }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Expired or revoked credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Reauthentication(_)) || self.status() == Some(401)
    }

    pub fn is_transport_failure(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// A player command was rejected because no device is active.
    pub(crate) fn is_no_active_device(&self) -> bool {
        match self {
            ApiError::Status { message, reason, .. } => {
                reason.as_deref() == Some(NO_ACTIVE_DEVICE_REASON)
                    || message.to_lowercase().contains("no active device")
            }
            _ => false,
        }
    }

    /// A catalog lookup named an entity the API does not know.
    pub(crate) fn is_unknown_entity(&self) -> bool {
        match self {
            ApiError::Status { status: 404, .. } => true,
            ApiError::Status { status: 400, message, .. } => {
                message.to_lowercase().contains("invalid")
            }
            _ => false,
        }
    }
}

/// Kind of catalog entity named in a [`Error::NotFound`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Track,
    Artist,
    Album,
    Playlist,
    Context,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Track => "track",
            EntityKind::Artist => "artist",
            EntityKind::Album => "album",
            EntityKind::Playlist => "playlist",
            EntityKind::Context => "playback context",
        };
        f.write_str(name)
    }
}

/// Errors returned by facade operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The identifier does not resolve to a catalog entity
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// A parameter was rejected before any request was made
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Failure passed through from the collaborator
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation { field, reason: reason.into() }
    }

    pub(crate) fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Error::NotFound { kind, id: id.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// The underlying collaborator failure, if this error carries one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for collaborator calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
