//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `fleet`: Fleet/message polling, robot selection, movement commands
//! - `config`: Config editor handlers
//! - `scenario`: Scenario choice and run handlers
//! - `keys`: Key event handlers for UI modes

pub(crate) mod config;
pub(crate) mod fleet;
pub(crate) mod keys;
pub(crate) mod scenario;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use fleetmon_api::{MoveDirection, RotateDirection};
use fleetmon_core::{RobotId, ScenarioId};
use tokio::sync::watch;

use crate::config_editor::{ApplyId, ConfigWrite};
use crate::message::Message;

pub use keys::handle_key;
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Poll the fleet
    FetchFleet,

    /// Poll new messages of `robot`
    FetchMessages { robot: RobotId },

    /// Load the scenario id list
    FetchScenarios,

    FetchScenarioInfo { scenario: ScenarioId },

    MoveRobot {
        robot: RobotId,
        millimeters: u32,
        direction: MoveDirection,
    },

    RotateRobot {
        robot: RobotId,
        degrees: u32,
        direction: RotateDirection,
    },

    /// Ask `robot` to sync its configuration, then wait for the values
    SyncConfig { robot: RobotId },

    /// Send `writes` one at a time, paced
    ApplyConfig {
        robot: RobotId,
        apply: ApplyId,
        writes: Vec<ConfigWrite>,
    },

    StoreAndReboot { robot: RobotId },

    StartScenario {
        robot: RobotId,
        scenario: ScenarioId,
    },

    /// Poll the status of run `uuid` until finished or cancelled
    StartScenarioPoller {
        uuid: String,
        cancel_rx: watch::Receiver<bool>,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    pub fn with_message(mut self, msg: Message) -> Self {
        self.message = Some(msg);
        self
    }
}
