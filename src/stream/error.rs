use thiserror::Error;

/// Errors that can occur while classifying or rendering a stream graph
#[derive(Debug, Error)]
pub enum StreamGraphError {
    /// Input shape violation (empty set, ragged series, bad dates, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The target container could not be resolved on the drawing surface
    #[error("Mount target not found: '{0}'")]
    MountTargetMissing(String),

    /// A node handle does not belong to the surface it was sent to
    #[error("Unknown node: {0}")]
    UnknownNode(uuid::Uuid),

    /// Configuration error (bad property file, unknown property, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StreamGraphError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        StreamGraphError::InvalidInput(message.into())
    }
}

/// Type alias for Results using StreamGraphError
pub type Result<T> = std::result::Result<T, StreamGraphError>;
