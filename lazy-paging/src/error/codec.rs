//! State persistence error types

/// Errors that can occur while encoding or decoding persisted paging state.
#[derive(Debug, thiserror::Error)]
pub enum StateCodecError {
    /// Binary (bincode) encoding or decoding failed.
    #[error("Binary state codec error: {0}")]
    Binary(#[from] bincode::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON state codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// The decoded state violates a paging invariant.
    #[error("Decoded state is invalid: {0}")]
    Invalid(String),
}
