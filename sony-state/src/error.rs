//! Error types for sony-state

use thiserror::Error;

/// Result type for sony-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur during state management
#[derive(Debug, Error)]
pub enum StateError {
    /// A poll tick failed while the device was supposedly powered on
    ///
    /// The snapshot has already been forced to off; the next tick starts
    /// over with a fresh probe.
    #[error("Error communicating with Sony device API: {0}")]
    RefreshFailed(#[from] sony_api::ApiError),

    /// The poll worker thread could not be joined
    #[error("Shutdown failed")]
    ShutdownFailed,
}
