//! Countdown engine state machine

use tracing::{debug, info};

use super::{decompose, DurationValue, RecentEntry, RecentStore, TimerSnapshot, TimerStatus};
use crate::error::TimerError;

/// Periodic tick source driving a running countdown.
///
/// Once disarmed no further ticks may be delivered until the next `arm`.
pub trait TickSource: Send {
    fn arm(&self);
    fn disarm(&self);
}

/// Running/stopped countdown with its picker, display and recents.
///
/// While running, `display.total_seconds() == remaining_seconds`.
#[derive(Debug)]
pub struct CountdownEngine<S, T> {
    pub(super) status: TimerStatus,
    pub(super) remaining_seconds: u64,
    pub(super) display: DurationValue,
    pub(super) picker: DurationValue,
    pub(super) store: S,
    pub(super) ticks: T,
}

impl<S: RecentStore, T: TickSource> CountdownEngine<S, T> {
    pub fn new(store: S, ticks: T) -> Self {
        Self {
            status: TimerStatus::Stopped,
            remaining_seconds: 0,
            display: DurationValue::ZERO,
            picker: DurationValue::ZERO,
            store,
            ticks,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn display(&self) -> DurationValue {
        self.display
    }

    pub fn picker(&self) -> DurationValue {
        self.picker
    }

    pub fn recents(&self) -> Vec<RecentEntry> {
        self.store.list()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::new(self.status, self.remaining_seconds, self.display, self.picker)
    }

    /// Begin counting down from `requested`.
    ///
    /// The first second is consumed immediately so the clock shows
    /// `requested - 1` straight away.
    pub fn start(&mut self, requested: DurationValue) -> Result<(), TimerError> {
        if self.status.is_running() {
            return Err(TimerError::InvalidTransition {
                action: "start",
                status: self.status,
            });
        }
        requested.validate()?;
        if requested.is_zero() {
            return Err(TimerError::EmptyDuration);
        }

        if let Some(entry) = self.store.insert(requested)? {
            info!("Recorded recent duration {} ({})", requested, entry.label());
        }

        self.status = TimerStatus::Running;
        self.remaining_seconds = requested.total_seconds() - 1;
        self.display = decompose(self.remaining_seconds);
        self.ticks.arm();

        info!("Countdown started from {}", requested);
        Ok(())
    }

    /// Advance one second. Reaching zero stops the countdown.
    pub fn tick(&mut self) -> Result<(), TimerError> {
        if !self.status.is_running() {
            return Err(TimerError::InvalidTransition {
                action: "tick",
                status: self.status,
            });
        }

        if self.remaining_seconds == 0 {
            self.expire();
            return Ok(());
        }

        self.remaining_seconds -= 1;
        self.display = decompose(self.remaining_seconds);
        debug!("Tick: {} remaining", self.display);

        if self.remaining_seconds == 0 {
            self.expire();
        }
        Ok(())
    }

    /// Stop from any status, clearing the display and the picker
    pub fn stop(&mut self) {
        if self.status.is_running() {
            info!("Countdown stopped with {}s remaining", self.remaining_seconds);
        }
        self.ticks.disarm();
        self.status = TimerStatus::Stopped;
        self.remaining_seconds = 0;
        self.display = DurationValue::ZERO;
        self.apply_picker(DurationValue::ZERO);
    }

    fn expire(&mut self) {
        info!("Countdown finished");
        self.stop();
    }
}
