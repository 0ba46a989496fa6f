use thiserror::Error;
use uuid::Uuid;

/// Failure taxonomy of the event repository.
///
/// Read operations recover from `BackendUnavailable` by substituting the
/// bundled fallback catalog; write operations surface it to the caller and
/// never retry.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("event backend is unavailable")]
    BackendUnavailable,

    #[error("authentication required")]
    AuthRequired,

    #[error("event {0} not found")]
    NotFound(Uuid),

    #[error("event {0} is at full capacity")]
    AtCapacity(Uuid),

    #[error("invalid event data: {0}")]
    Validation(String),

    #[error("backend operation failed: {0}")]
    Backend(#[from] anyhow::Error),
}
