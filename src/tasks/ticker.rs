//! Periodic tick source for the countdown

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::state::{AppState, TickSource};

/// Tick source handle held by the engine.
///
/// Arming state travels over a watch channel to [`countdown_ticker_task`].
#[derive(Debug)]
pub struct WatchTicks {
    armed_tx: watch::Sender<bool>,
}

impl WatchTicks {
    /// Create a disarmed handle and the receiver the ticker task listens on
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (armed_tx, armed_rx) = watch::channel(false);
        (Self { armed_tx }, armed_rx)
    }
}

impl TickSource for WatchTicks {
    fn arm(&self) {
        // send_replace never fails, even with the ticker gone
        self.armed_tx.send_replace(true);
    }

    fn disarm(&self) {
        self.armed_tx.send_replace(false);
    }
}

/// Background task delivering one tick per `period` while armed
pub async fn countdown_ticker_task(
    state: Arc<AppState>,
    mut armed_rx: watch::Receiver<bool>,
    period: Duration,
) {
    info!("Starting countdown ticker task ({}ms period)", period.as_millis());

    loop {
        // Wait until a countdown arms the ticker
        while !*armed_rx.borrow_and_update() {
            if armed_rx.changed().await.is_err() {
                info!("Tick source dropped, stopping ticker task");
                return;
            }
        }

        debug!("Ticker armed");
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Arming changes win over a ready tick, so a stop/start pair
                // never lets the old period tick the new run
                biased;

                changed = armed_rx.changed() => {
                    if changed.is_err() {
                        info!("Tick source dropped, stopping ticker task");
                        return;
                    }
                    if *armed_rx.borrow_and_update() {
                        // Re-armed by a fresh start: count a full period from now
                        interval.reset();
                    } else {
                        debug!("Ticker disarmed");
                        break;
                    }
                }

                _ = interval.tick() => {
                    match state.tick() {
                        Ok(snapshot) if !snapshot.is_running() => {
                            debug!("Countdown no longer running after tick");
                        }
                        Ok(_) => {}
                        Err(e) => error!("Failed to deliver tick: {}", e),
                    }
                }
            }
        }
    }
}
