//! Selecting and removing recent entries

use tracing::info;
use uuid::Uuid;

use super::{CountdownEngine, RecentEntry, RecentStore, TickSource};
use crate::error::TimerError;

impl<S: RecentStore, T: TickSource> CountdownEngine<S, T> {
    /// Load a recent entry into the picker. Only allowed while stopped.
    pub fn select(&mut self, entry: &RecentEntry) -> Result<(), TimerError> {
        if self.status.is_running() {
            return Err(TimerError::InvalidTransition {
                action: "select a recent",
                status: self.status,
            });
        }
        info!("Selected recent {} ({})", entry.label(), entry.id);
        self.apply_picker(entry.duration());
        Ok(())
    }

    /// Look up a recent by id and select it
    pub fn select_by_id(&mut self, id: Uuid) -> Result<(), TimerError> {
        let entry = self.store.get(id).ok_or(TimerError::RecentNotFound(id))?;
        self.select(&entry)
    }

    /// Delete a recent entry, in any status
    pub fn remove(&mut self, entry: &RecentEntry) -> Result<(), TimerError> {
        self.remove_by_id(entry.id)
    }

    /// Delete by identity; unknown ids are ignored
    pub fn remove_by_id(&mut self, id: Uuid) -> Result<(), TimerError> {
        self.store.delete(id)?;
        info!("Removed recent {}", id);
        Ok(())
    }
}
