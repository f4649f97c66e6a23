//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-flow")]
#[command(about = "A state-managed HTTP countdown timer with persisted recent durations")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// JSON file holding recently used durations
    #[arg(long, default_value = "recents.json")]
    pub recents_file: PathBuf,

    /// Keep recents in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Tick period in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["focus-flow"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.recents_file, PathBuf::from("recents.json"));
        assert_eq!(config.tick_period(), Duration::from_secs(1));
        assert!(!config.ephemeral);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "focus-flow", "-p", "8080", "--tick-ms", "250", "--ephemeral", "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.tick_period(), Duration::from_millis(250));
        assert!(config.ephemeral);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_zero_tick_period_is_rejected() {
        assert!(Config::try_parse_from(["focus-flow", "--tick-ms", "0"]).is_err());
    }
}
