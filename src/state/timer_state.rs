//! Countdown status and the snapshot handed to the render surface

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DurationValue;

/// Countdown status; there is no separate expired state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    #[default]
    Stopped,
    Running,
}

impl TimerStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, TimerStatus::Running)
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerStatus::Stopped => f.write_str("stopped"),
            TimerStatus::Running => f.write_str("running"),
        }
    }
}

/// Everything the render surface needs to draw the clock and controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub remaining_seconds: u64,
    pub display: DurationValue,
    /// Flip-clock text, `HH:MM:SS`
    pub display_text: String,
    pub picker: DurationValue,
    /// Whether the start control should be enabled
    pub can_start: bool,
}

impl TimerSnapshot {
    pub fn new(
        status: TimerStatus,
        remaining_seconds: u64,
        display: DurationValue,
        picker: DurationValue,
    ) -> Self {
        Self {
            status,
            remaining_seconds,
            display,
            display_text: display.to_string(),
            picker,
            can_start: !status.is_running() && !display.is_zero(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }
}
