use thiserror::Error;

/// Configuration could not be assembled from build-time defaults and overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field} URL: {value}")]
    InvalidUrl { field: &'static str, value: String },
}

/// Durable storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} has an opaque origin and no storage of its own")]
    OpaqueOrigin(String),
}

/// Transport-level failures of a backend call. Callers in the workflow only
/// distinguish these from a backend-reported `success: false`.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Unable to reach the server: {0}")]
    Network(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
}

/// Workflow outcomes that return the UI to a stable, retryable state.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Client-side validation failed; nothing was sent.
    #[error("{0}")]
    Validation(String),
    /// The request was rejected or got no usable response.
    #[error("{0}")]
    Network(String),
    /// The backend answered `success: false`.
    #[error("{0}")]
    Rejected(String),
    /// Local state is incomplete (short code, no pending email, ...).
    #[error("{0}")]
    LocalState(String),
    #[error("A request for this form is already in progress.")]
    Busy,
    #[error("A new code can be requested in {0} seconds.")]
    ResendLocked(u32),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl WorkflowError {
    /// Whether the failure happened before any network call was issued.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::LocalState(_) | Self::Busy | Self::ResendLocked(_)
        )
    }
}
