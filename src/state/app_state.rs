//! Shared application state

use std::{
    sync::{Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{CountdownEngine, DurationValue, RecentEntry, RecentStore, TimerSnapshot};
use crate::{error::TimerError, tasks::WatchTicks};

pub type Engine = CountdownEngine<Box<dyn RecentStore>, WatchTicks>;

/// Owner of the countdown engine shared by the API and the ticker task.
///
/// Every intent runs under one lock, so ticks and user events never interleave.
pub struct AppState {
    engine: Mutex<Engine>,
    /// Channel the render surface watches for snapshot changes
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<TimerSnapshot>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last intent tracking
    pub last_action: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl AppState {
    pub fn new(port: u16, host: String, store: Box<dyn RecentStore>, ticks: WatchTicks) -> Self {
        let engine = CountdownEngine::new(store, ticks);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

        Self {
            engine: Mutex::new(engine),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Engine>, TimerError> {
        self.engine.lock().map_err(|_| TimerError::LockPoisoned)
    }

    /// Run an intent against the engine and publish the resulting snapshot
    fn apply<F>(&self, action: &str, intent: F) -> Result<TimerSnapshot, TimerError>
    where
        F: FnOnce(&mut Engine) -> Result<(), TimerError>,
    {
        let mut engine = self.lock()?;
        intent(&mut engine)?;
        let snapshot = engine.snapshot();
        drop(engine);

        if let Ok(mut last) = self.last_action.lock() {
            *last = Some((action.to_string(), Utc::now()));
        }
        self.publish(&snapshot);
        Ok(snapshot)
    }

    fn publish(&self, snapshot: &TimerSnapshot) {
        // send_if_modified keeps idle subscribers quiet on no-op intents
        self.snapshot_tx.send_if_modified(|current| {
            if current == snapshot {
                return false;
            }
            *current = snapshot.clone();
            true
        });
    }

    /// Start from whatever the clock currently shows
    pub fn start(&self) -> Result<TimerSnapshot, TimerError> {
        self.apply("start", |engine| {
            let requested = engine.display();
            engine.start(requested)
        })
    }

    pub fn stop(&self) -> Result<TimerSnapshot, TimerError> {
        self.apply("stop", |engine| {
            engine.stop();
            Ok(())
        })
    }

    pub fn edit_picker(&self, value: DurationValue) -> Result<TimerSnapshot, TimerError> {
        self.apply("picker", |engine| engine.edit_picker(value))
    }

    pub fn select_recent(&self, id: Uuid) -> Result<TimerSnapshot, TimerError> {
        self.apply("select", |engine| engine.select_by_id(id))
    }

    pub fn remove_recent(&self, id: Uuid) -> Result<TimerSnapshot, TimerError> {
        self.apply("remove", |engine| engine.remove_by_id(id))
    }

    /// Deliver one tick from the tick source.
    ///
    /// A tick that lands after the countdown stopped is dropped.
    pub fn tick(&self) -> Result<TimerSnapshot, TimerError> {
        let mut engine = self.lock()?;
        match engine.tick() {
            Ok(()) => {
                let snapshot = engine.snapshot();
                drop(engine);
                self.publish(&snapshot);
                Ok(snapshot)
            }
            Err(TimerError::InvalidTransition { status, .. }) => {
                debug!("Ignoring stale tick while {}", status);
                Ok(engine.snapshot())
            }
            Err(e) => {
                warn!("Tick failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> Result<TimerSnapshot, TimerError> {
        Ok(self.lock()?.snapshot())
    }

    pub fn recents(&self) -> Result<Vec<RecentEntry>, TimerError> {
        Ok(self.lock()?.recents())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    pub fn get_last_action(&self) -> Option<(String, DateTime<Utc>)> {
        self.last_action.lock().ok().and_then(|last| last.clone())
    }
}
