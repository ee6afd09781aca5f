use thiserror::Error;

/// Boundary errors for the JSON API.
///
/// The engines themselves never fail: malformed core input degrades to named
/// defaults so historical and partial data stays auditable. Only the JSON
/// envelope itself can be rejected.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid JSON request: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("invalid policy state: {0}")]
    InvalidState(#[source] serde_json::Error),

    #[error("unsupported schema version: {0}")]
    UnsupportedSchemaVersion(u8),

    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
