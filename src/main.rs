//! Focus Flow - A state-managed HTTP countdown timer
//! 
//! This is the main entry point for the focus-flow application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use focus_flow::{
    config::Config,
    state::{AppState, JsonRecentStore, MemoryRecentStore, RecentStore},
    api::create_router,
    tasks::{countdown_ticker_task, WatchTicks},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_flow={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-flow server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms",
          config.host, config.port, config.tick_ms);

    let store: Box<dyn RecentStore> = if config.ephemeral {
        info!("Keeping recents in memory only");
        Box::new(MemoryRecentStore::new())
    } else {
        let store = JsonRecentStore::open(&config.recents_file)
            .with_context(|| format!("failed to open {}", config.recents_file.display()))?;
        info!("Persisting recents to {}", store.path().display());
        Box::new(store)
    };

    // Create application state
    let (ticks, armed_rx) = WatchTicks::new();
    let state = Arc::new(AppState::new(config.port, config.host.clone(), store, ticks));

    // Start the countdown ticker background task
    let ticker_state = Arc::clone(&state);
    let period = config.tick_period();
    tokio::spawn(async move {
        countdown_ticker_task(ticker_state, armed_rx, period).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  PUT    /picker              - Set the picker duration");
    info!("  POST   /start               - Start the countdown");
    info!("  POST   /stop                - Stop the countdown");
    info!("  GET    /recents             - List recent durations");
    info!("  POST   /recents/:id/select  - Load a recent into the picker");
    info!("  DELETE /recents/:id         - Delete a recent");
    info!("  GET    /status              - Clock, recents and server info");
    info!("  GET    /events              - Snapshot stream (SSE)");
    info!("  GET    /health              - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
