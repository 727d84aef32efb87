//! Simulated sensor feed.
//!
//! Stands in for a real triaxial sensor: one random `(x, y, z)`
//! reading per tick, delivered over an mpsc channel. The rest of the
//! system only consumes the channel, so swapping in a real feed means
//! replacing this module alone.

use std::time::Duration;

use rand::Rng;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use triaxis_types::Reading;

// ---------------------------------------------------------------------------
// SimulatorConfig
// ---------------------------------------------------------------------------

/// Configuration for the reading simulator.
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    /// Interval between generated readings.
    pub interval: Duration,
    /// Inclusive lower bound of each generated component.
    pub min_value: i32,
    /// Exclusive upper bound of each generated component.
    pub max_value: i32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            min_value: 50,
            max_value: 150,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulator task
// ---------------------------------------------------------------------------

/// Spawns the simulator task.
///
/// Emits one reading per interval on `tx` until the shutdown watch
/// fires or the receiver is dropped.
pub fn spawn(
    config: SimulatorConfig,
    tx: mpsc::Sender<Reading>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let reading = generate(&config);
                    if tx.send(reading).await.is_err() {
                        tracing::debug!("reading consumer dropped; stopping simulator");
                        break;
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        tracing::info!("simulator stopped");
                        break;
                    }
                }
            }
        }
    })
}

/// Generates one random live reading within the configured range.
fn generate(config: &SimulatorConfig) -> Reading {
    let mut rng = rand::thread_rng();
    Reading::live(
        rng.gen_range(config.min_value..config.max_value),
        rng.gen_range(config.min_value..config.max_value),
        rng.gen_range(config.min_value..config.max_value),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emits_readings_within_range() {
        let config = SimulatorConfig {
            interval: Duration::from_millis(1),
            ..SimulatorConfig::default()
        };
        let (tx, mut rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = spawn(config.clone(), tx, shutdown_rx);

        for _ in 0..3 {
            let reading = rx.recv().await.expect("simulator emits readings");
            assert!(reading.captured_at.is_none(), "live readings are unstamped");
            for value in [reading.x, reading.y, reading.z] {
                assert!((config.min_value..config.max_value).contains(&value));
            }
        }

        drop(rx);
        handle.await.expect("simulator exits when consumer drops");
    }

    #[tokio::test]
    async fn stops_on_shutdown_signal() {
        let (tx, _rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = spawn(SimulatorConfig::default(), tx, shutdown_rx);

        shutdown_tx.send(true).expect("send shutdown");
        handle.await.expect("simulator task exits cleanly");
    }
}
