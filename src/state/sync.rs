//! Picker to display propagation

use tracing::debug;

use super::{CountdownEngine, DurationValue, RecentStore, TickSource, TimerStatus};
use crate::error::TimerError;

/// Display value after a picker change: the picker wins while stopped,
/// a running countdown keeps its own display.
pub fn synced_display(
    status: TimerStatus,
    new_picker: DurationValue,
    old_display: DurationValue,
) -> DurationValue {
    match status {
        TimerStatus::Stopped => new_picker,
        TimerStatus::Running => old_display,
    }
}

impl<S: RecentStore, T: TickSource> CountdownEngine<S, T> {
    /// Handle a user edit of the picker.
    ///
    /// The picker is locked while running.
    pub fn edit_picker(&mut self, value: DurationValue) -> Result<(), TimerError> {
        if self.status.is_running() {
            return Err(TimerError::InvalidTransition {
                action: "edit the picker",
                status: self.status,
            });
        }
        value.validate()?;
        self.apply_picker(value);
        Ok(())
    }

    /// Replace the picker value and propagate it if it actually changed
    pub(super) fn apply_picker(&mut self, value: DurationValue) {
        if value == self.picker {
            return;
        }
        self.picker = value;
        self.display = synced_display(self.status, value, self.display);
        debug!("Picker set to {}, display {}", self.picker, self.display);
    }
}
