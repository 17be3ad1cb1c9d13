use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BulkError {
    /// A setup call (listing, verification) failed; fatal to the operation
    #[error("Provider error: {0}")]
    Provider(#[from] BridgeError),

    #[error("Playlist '{title}' ({id}) is not owned by the current user")]
    NotOwned { id: String, title: String },

    #[error("Invalid configuration: {0}")]
    Config(#[from] core_runtime::Error),
}

pub type Result<T> = std::result::Result<T, BulkError>;
