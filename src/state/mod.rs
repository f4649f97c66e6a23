//! State management module
//! 
//! This module contains the countdown engine, its value types and the
//! recents store, plus the shared state wrapping them for the server.

pub mod app_state;
pub mod bridge;
pub mod countdown;
pub mod duration;
pub mod recents;
pub mod sync;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use countdown::{CountdownEngine, TickSource};
pub use duration::{decompose, DurationValue};
pub use recents::{JsonRecentStore, MemoryRecentStore, RecentEntry, RecentStore};
pub use sync::synced_display;
pub use timer_state::{TimerSnapshot, TimerStatus};
