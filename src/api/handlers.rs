//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::TimerError,
    state::{AppState, DurationValue, TimerSnapshot},
};
use super::responses::{
    ApiError, ApiResponse, HealthResponse, RecentView, RecentsResponse, StatusResponse,
};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Run an intent that may write the recents file off the async workers
async fn blocking<T, F>(state: &Arc<AppState>, intent: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> Result<T, TimerError> + Send + 'static,
{
    let state = Arc::clone(state);
    let result = tokio::task::spawn_blocking(move || intent(&state))
        .await
        .map_err(TimerError::from)?;
    Ok(result?)
}

/// Handle PUT /picker - Edit the picker value
pub async fn picker_handler(
    State(state): State<Arc<AppState>>,
    Json(value): Json<DurationValue>,
) -> ApiResult<ApiResponse> {
    let timer = state.edit_picker(value)?;
    Ok(Json(ApiResponse::new(format!("Picker set to {}", value), timer)))
}

/// Handle POST /start - Start counting down from the displayed duration
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let timer = blocking(&state, AppState::start).await?;
    info!("Start endpoint called - countdown running");
    Ok(Json(ApiResponse::new(
        format!("Countdown started, {} remaining", timer.display_text),
        timer,
    )))
}

/// Handle POST /stop - Stop the countdown and clear the clock
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let timer = state.stop()?;
    info!("Stop endpoint called - countdown stopped");
    Ok(Json(ApiResponse::new("Countdown stopped".to_string(), timer)))
}

/// Handle GET /recents - List recent durations, newest first
pub async fn recents_handler(State(state): State<Arc<AppState>>) -> ApiResult<RecentsResponse> {
    Ok(Json(RecentsResponse::new(state.recents()?)))
}

/// Handle POST /recents/:id/select - Load a recent into the picker
pub async fn select_recent_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<ApiResponse> {
    let timer = state.select_recent(id)?;
    Ok(Json(ApiResponse::new(
        format!("Loaded {} into the picker", timer.picker),
        timer,
    )))
}

/// Handle DELETE /recents/:id - Forget a recent duration
pub async fn delete_recent_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<RecentsResponse> {
    blocking(&state, move |state| state.remove_recent(id)).await?;
    Ok(Json(RecentsResponse::new(state.recents()?)))
}

/// Handle GET /status - Return the clock, recents and server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let timer = state.snapshot()?;
    let recents = state.recents()?.into_iter().map(RecentView::from).collect();
    let (last_action, last_action_time) = match state.get_last_action() {
        Some((action, at)) => (Some(action), Some(at)),
        None => (None, None),
    };

    Ok(Json(StatusResponse {
        timer,
        recents,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream snapshots as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.snapshot_tx.subscribe();
    let events = snapshot_stream(rx).map(|snapshot| Ok(snapshot_event(&snapshot)));
    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Current snapshot first, then one item per change
pub(crate) fn snapshot_stream(
    rx: watch::Receiver<TimerSnapshot>,
) -> impl Stream<Item = TimerSnapshot> {
    stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let snapshot = rx.borrow_and_update().clone();
        Some((snapshot, (rx, false)))
    })
}

fn snapshot_event(snapshot: &TimerSnapshot) -> Event {
    match Event::default().event("timer").json_data(snapshot) {
        Ok(event) => event,
        Err(e) => {
            warn!("Failed to encode snapshot event: {}", e);
            Event::default().event("timer").data(snapshot.display_text.clone())
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;

    use super::*;
    use crate::{
        state::{MemoryRecentStore, TimerStatus},
        tasks::WatchTicks,
    };

    fn state() -> Arc<AppState> {
        let (ticks, _) = WatchTicks::new();
        Arc::new(AppState::new(0, "127.0.0.1".to_string(), Box::new(MemoryRecentStore::new()), ticks))
    }

    #[tokio::test]
    async fn test_snapshot_stream_starts_with_current_snapshot() {
        let state = state();
        state.edit_picker(DurationValue::new(0, 2, 0)).unwrap();

        let mut snapshots = Box::pin(snapshot_stream(state.snapshot_tx.subscribe()));
        let first = snapshots.next().await.unwrap();
        assert_eq!(first, state.snapshot().unwrap());
        assert_eq!(first.display_text, "00:02:00");

        // Nothing further until the state changes
        assert!(snapshots.next().now_or_never().is_none());
    }

    #[tokio::test]
    async fn test_picker_edit_yields_exactly_one_snapshot() {
        let state = state();
        let mut snapshots = Box::pin(snapshot_stream(state.snapshot_tx.subscribe()));
        snapshots.next().await.unwrap();

        state.edit_picker(DurationValue::new(0, 0, 45)).unwrap();
        let next = snapshots.next().await.unwrap();
        assert_eq!(next.status, TimerStatus::Stopped);
        assert_eq!(next.display, DurationValue::new(0, 0, 45));
        assert!(next.can_start);

        assert!(snapshots.next().now_or_never().is_none());
    }

    #[tokio::test]
    async fn test_stream_ends_when_state_is_dropped() {
        let state = state();
        let rx = state.snapshot_tx.subscribe();
        drop(state);

        let mut snapshots = Box::pin(snapshot_stream(rx));
        assert!(snapshots.next().await.is_some());
        assert!(snapshots.next().await.is_none());
    }

    #[test]
    fn test_snapshot_event_is_named_timer() {
        let snapshot = TimerSnapshot::new(
            TimerStatus::Running,
            4,
            DurationValue::new(0, 0, 4),
            DurationValue::ZERO,
        );
        let rendered = format!("{:?}", snapshot_event(&snapshot));
        assert!(rendered.contains("timer"));
        assert!(rendered.contains("00:00:04"));
    }
}
