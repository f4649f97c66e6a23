//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::{
    error::TimerError,
    state::{RecentEntry, TimerSnapshot},
};

/// API response structure for intent endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    pub fn new(message: String, timer: TimerSnapshot) -> Self {
        Self {
            status: timer.status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// A recent entry with its chip label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentView {
    pub id: Uuid,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub total_seconds: u64,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl From<RecentEntry> for RecentView {
    fn from(entry: RecentEntry) -> Self {
        Self {
            id: entry.id,
            hour: entry.hour,
            minute: entry.minute,
            second: entry.second,
            total_seconds: entry.total_seconds(),
            label: entry.label(),
            created_at: entry.created_at,
        }
    }
}

/// Recents listing, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentsResponse {
    pub recents: Vec<RecentView>,
}

impl RecentsResponse {
    pub fn new(entries: Vec<RecentEntry>) -> Self {
        Self {
            recents: entries.into_iter().map(RecentView::from).collect(),
        }
    }
}

/// Full status with recents and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub recents: Vec<RecentView>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error body returned for rejected intents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper mapping [`TimerError`] onto HTTP statuses
#[derive(Debug)]
pub struct ApiError(pub TimerError);

impl From<TimerError> for ApiError {
    fn from(e: TimerError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            TimerError::InvalidTransition { .. } => StatusCode::CONFLICT,
            TimerError::EmptyDuration | TimerError::OutOfRange { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            TimerError::RecentNotFound(_) => StatusCode::NOT_FOUND,
            TimerError::Persistence(_) | TimerError::LockPoisoned | TimerError::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.status_code();
        if code.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.0.to_string(),
            timestamp: Utc::now(),
        };
        (code, Json(body)).into_response()
    }
}
