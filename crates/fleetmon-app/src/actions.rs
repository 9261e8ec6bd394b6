//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every action runs on its own tokio task and reports back through the
//! message channel. Fire-and-forget commands report nothing.

use std::sync::Arc;

use fleetmon_api::FleetApi;
use fleetmon_core::prelude::*;
use tokio::sync::{mpsc, watch};

use crate::config::PollingSettings;
use crate::config_editor::{ApplyId, ConfigWrite};
use crate::handler::UpdateAction;
use crate::message::Message;
use crate::pollers;

/// What a spawned action needs from the engine
pub struct ActionContext<A> {
    pub api: Arc<A>,
    pub msg_tx: mpsc::Sender<Message>,
    pub shutdown_rx: watch::Receiver<bool>,
    pub polling: PollingSettings,
}

impl<A> Clone for ActionContext<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            msg_tx: self.msg_tx.clone(),
            shutdown_rx: self.shutdown_rx.clone(),
            polling: self.polling.clone(),
        }
    }
}

/// Execute an action by spawning a background task
pub fn handle_action<A>(action: UpdateAction, ctx: &ActionContext<A>)
where
    A: FleetApi + Send + Sync + 'static,
{
    let api = Arc::clone(&ctx.api);
    let msg_tx = ctx.msg_tx.clone();

    match action {
        UpdateAction::FetchFleet => {
            tokio::spawn(async move {
                let result = api.robots().await.map_err(describe);
                let _ = msg_tx.send(Message::FleetReceived(result)).await;
            });
        }

        UpdateAction::FetchMessages { robot } => {
            tokio::spawn(async move {
                let result = api.new_messages(&robot).await.map_err(describe);
                let _ = msg_tx
                    .send(Message::MessagesReceived { robot, result })
                    .await;
            });
        }

        UpdateAction::FetchScenarios => {
            tokio::spawn(async move {
                let result = api.scenarios().await.map_err(describe);
                let _ = msg_tx.send(Message::ScenariosReceived(result)).await;
            });
        }

        UpdateAction::FetchScenarioInfo { scenario } => {
            tokio::spawn(async move {
                let result = api.scenario_info(&scenario).await.map_err(describe);
                let _ = msg_tx
                    .send(Message::ScenarioInfoReceived { scenario, result })
                    .await;
            });
        }

        UpdateAction::MoveRobot {
            robot,
            millimeters,
            direction,
        } => {
            tokio::spawn(async move {
                api.move_robot(&robot, millimeters, direction).await;
            });
        }

        UpdateAction::RotateRobot {
            robot,
            degrees,
            direction,
        } => {
            tokio::spawn(async move {
                api.rotate_robot(&robot, degrees, direction).await;
            });
        }

        UpdateAction::SyncConfig { robot } => {
            spawn_config_sync(ctx.clone(), robot);
        }

        UpdateAction::ApplyConfig {
            robot,
            apply,
            writes,
        } => {
            spawn_config_apply(ctx.clone(), robot, apply, writes);
        }

        UpdateAction::StoreAndReboot { robot } => {
            tokio::spawn(async move {
                api.store_and_reboot(&robot).await;
            });
        }

        UpdateAction::StartScenario { robot, scenario } => {
            tokio::spawn(async move {
                let result = api
                    .run_scenario(&robot, &scenario)
                    .await
                    .map_err(describe);
                let _ = msg_tx
                    .send(Message::ScenarioStartResult { scenario, result })
                    .await;
            });
        }

        UpdateAction::StartScenarioPoller { uuid, cancel_rx } => {
            pollers::spawn_scenario_poller(
                api,
                uuid,
                ctx.polling.scenario_interval(),
                msg_tx,
                cancel_rx,
                ctx.shutdown_rx.clone(),
            );
        }
    }
}

/// Ask the robot to sync, give it time, then wait for its values
fn spawn_config_sync<A>(ctx: ActionContext<A>, robot: String)
where
    A: FleetApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let ActionContext {
            api,
            msg_tx,
            mut shutdown_rx,
            polling,
        } = ctx;

        api.sync_config(&robot).await;

        tokio::select! {
            _ = tokio::time::sleep(polling.config_sync_delay()) => {}
            _ = shutdown_signalled(&mut shutdown_rx) => return,
        }

        let result = api
            .config_values_when_ready(&robot, &polling.retry_policy())
            .await
            .map_err(describe);
        let _ = msg_tx.send(Message::ConfigLoaded { robot, result }).await;
    });
}

/// Flatten a request error for its result message. Failures the next poll
/// retries anyway stay out of the error log.
pub(crate) fn describe(err: Error) -> String {
    if err.is_recoverable() {
        debug!("Request failed: {}", err);
    } else {
        error!("Request failed: {}", err);
    }
    err.to_string()
}

/// Resolves once shutdown is requested or the engine is gone
async fn shutdown_signalled(shutdown_rx: &mut watch::Receiver<bool>) {
    while !*shutdown_rx.borrow_and_update() {
        if shutdown_rx.changed().await.is_err() {
            return;
        }
    }
}

/// Send config writes one at a time with a pause between them
fn spawn_config_apply<A>(
    ctx: ActionContext<A>,
    robot: String,
    apply: ApplyId,
    writes: Vec<ConfigWrite>,
) where
    A: FleetApi + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let pacing = ctx.polling.config_apply_pacing();

        for (i, write) in writes.into_iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(pacing).await;
            }
            let result = ctx
                .api
                .set_config_value(&robot, &write.config, &write.value)
                .await
                .map_err(describe);
            let msg = Message::ConfigWriteCompleted {
                robot: robot.clone(),
                apply,
                config: write.config,
                value: write.value,
                result,
            };
            if ctx.msg_tx.send(msg).await.is_err() {
                return;
            }
        }

        let _ = ctx
            .msg_tx
            .send(Message::ConfigApplyFinished { robot, apply })
            .await;
    });
}
