//! Periodic background tasks
//!
//! - [`spawn_fleet_ticker`]: unconditional fleet/message refresh tick
//! - [`spawn_scenario_poller`]: status polling for one scenario run
//!
//! Both exit when the engine shutdown channel flips to `true` or the message
//! channel closes. The scenario poller additionally exits when its
//! [`PollerHandle`] is cancelled or dropped, and on the first finished status.

use std::sync::Arc;
use std::time::Duration;

use fleetmon_api::FleetApi;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::actions::describe;
use crate::message::Message;

/// Owned cancellation switch for a background poller.
///
/// Cancelling is idempotent. Dropping the handle cancels the poller.
#[derive(Debug)]
pub struct PollerHandle {
    cancel_tx: watch::Sender<bool>,
}

impl PollerHandle {
    /// Create a handle and the receiver the poller task listens on
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        (Self { cancel_tx }, cancel_rx)
    }

    pub fn cancel(&self) {
        self.cancel_tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Send [`Message::FleetTick`] every `interval` until shutdown
pub fn spawn_fleet_ticker(
    interval: Duration,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // A stalled UI should not be flooded with catch-up ticks
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if msg_tx.send(Message::FleetTick).await.is_err() {
                        break;
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Fleet ticker stopped");
    })
}

/// Poll the status of run `uuid` every `interval`.
///
/// Every response (or failure) is forwarded as
/// [`Message::ScenarioStatusReceived`]. The task stops by itself after
/// forwarding a finished status.
pub fn spawn_scenario_poller<A>(
    api: Arc<A>,
    uuid: String,
    interval: Duration,
    msg_tx: mpsc::Sender<Message>,
    mut cancel_rx: watch::Receiver<bool>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    A: FleetApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if *cancel_rx.borrow() {
                        break;
                    }
                    let result = api.scenario_status(&uuid).await;
                    let finished = matches!(&result, Ok(status) if status.finished);
                    let msg = Message::ScenarioStatusReceived {
                        uuid: uuid.clone(),
                        result: result.map_err(describe),
                    };
                    if msg_tx.send(msg).await.is_err() || finished {
                        break;
                    }
                }
                changed = cancel_rx.changed() => {
                    if changed.is_err() || *cancel_rx.borrow() {
                        break;
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Scenario poller for run {} stopped", uuid);
    })
}
