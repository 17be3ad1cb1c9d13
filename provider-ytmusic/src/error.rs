//! Error types for the YouTube Music provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// YouTube Music provider errors
#[derive(Error, Debug)]
pub enum YtMusicError {
    /// Browser headers are missing or unusable
    #[error("Authentication setup failed: {0}")]
    Auth(String),

    /// Request returned a non-success status
    #[error("YouTube Music API error (status {status_code}): {message}")]
    Api { status_code: u16, message: String },

    /// Response did not have the expected shape
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// Track cannot be removed without its playlist entry id
    #[error("Track {video_id} has no playlist entry id")]
    MissingEntryId { video_id: String },

    /// Mutation was accepted but not applied
    #[error("Request was not applied: {0}")]
    Rejected(String),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Result type for YouTube Music operations
pub type Result<T> = std::result::Result<T, YtMusicError>;

impl From<YtMusicError> for BridgeError {
    fn from(error: YtMusicError) -> Self {
        match error {
            YtMusicError::Auth(msg) => BridgeError::Unauthorized(msg),
            YtMusicError::Api {
                status_code,
                message,
            } => {
                let detail = format!("HTTP {}: {}", status_code, message);
                match status_code {
                    409 => BridgeError::Conflict(detail),
                    401 | 403 => BridgeError::Unauthorized(detail),
                    404 => BridgeError::NotFound(detail),
                    429 => BridgeError::RateLimited(detail),
                    _ => BridgeError::OperationFailed(detail),
                }
            }
            YtMusicError::Parse(msg) => {
                BridgeError::OperationFailed(format!("Parse error: {}", msg))
            }
            other @ (YtMusicError::MissingEntryId { .. } | YtMusicError::Rejected(_)) => {
                BridgeError::OperationFailed(other.to_string())
            }
            YtMusicError::Bridge(e) => e,
        }
    }
}
