//! Audio surface error types

use thiserror::Error;

/// Errors from the host's surface create/close primitives
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A surface already exists (the host allows at most one)
    #[error("An audio surface already exists")]
    AlreadyExists,

    /// No surface exists to close
    #[error("No audio surface exists")]
    NotFound,

    /// Any other host failure
    #[error("Audio surface host failure: {0}")]
    Other(String),
}

/// Result type for host operations
pub type HostResult<T> = Result<T, HostError>;

/// Errors from best-effort message delivery
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// Nobody is listening; the steady state while playback is stopped
    #[error("No receiver for message")]
    NoReceiver,

    /// A receiver existed but its channel is gone
    #[error("Receiver disconnected: {0}")]
    Disconnected(String),
}

/// Errors from the playback primitive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The resource could not be loaded
    #[error("Failed to load {source_path}: {reason}")]
    Load { source_path: String, reason: String },

    /// Playback could not start (resource unavailable, autoplay policy)
    #[error("Playback failed: {0}")]
    Play(String),
}

/// Result type for playback operations
pub type PlaybackResult<T> = Result<T, PlaybackError>;
