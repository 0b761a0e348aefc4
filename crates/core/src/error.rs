//! Error types for the multi-view session core

use thiserror::Error;

/// Result type alias for session core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the session core
#[derive(Debug, Error)]
pub enum Error {
    /// Player negotiation or playback error, reported by the player collaborator
    #[error("Player error: {0}")]
    Player(String),

    /// Catalog client error (fetch failure, unknown URI)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Durable storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
