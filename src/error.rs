//! Error types shared by the countdown engine, the recents store and the API

use thiserror::Error;
use uuid::Uuid;

use crate::state::TimerStatus;

/// Errors raised by countdown operations
#[derive(Debug, Error)]
pub enum TimerError {
    /// The requested intent is not allowed in the current engine status
    #[error("cannot {action} while {status}")]
    InvalidTransition {
        action: &'static str,
        status: TimerStatus,
    },

    #[error("cannot start a countdown of zero seconds")]
    EmptyDuration,

    /// A duration component falls outside the picker range
    #[error("{field} must be below {limit}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        limit: u32,
    },

    #[error("no recent entry with id {0}")]
    RecentNotFound(Uuid),

    #[error("recents persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("failed to lock countdown state")]
    LockPoisoned,

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Failures of the file-backed recents store
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed recents file: {0}")]
    Json(#[from] serde_json::Error),
}
