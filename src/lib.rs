//! Focus Flow - A state-managed HTTP countdown timer
//! 
//! This library provides a single countdown driven by a periodic tick,
//! a picker that feeds the clock while stopped, and a persisted list of
//! recently used durations.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
