//! Fleet polling, robot selection, and movement command handlers

use fleetmon_api::{MoveDirection, RotateDirection};
use fleetmon_core::{FleetSnapshot, RobotId, RobotMessage};
use tracing::{debug, info, warn};

use crate::message::Message;
use crate::robot_list::ReconcileOutcome;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// Start a fleet poll unless one is still in flight, then poll messages
pub(crate) fn handle_fleet_tick(state: &mut AppState) -> UpdateResult {
    let mut result = UpdateResult::message(Message::MessagesTick);
    if state.fleet_in_flight {
        debug!("Fleet poll still in flight, skipping tick");
    } else {
        state.fleet_in_flight = true;
        result.action = Some(UpdateAction::FetchFleet);
    }
    result
}

pub(crate) fn handle_messages_tick(state: &mut AppState) -> UpdateResult {
    let Some(robot) = state.selected.clone() else {
        return UpdateResult::none();
    };
    if state.messages_in_flight {
        return UpdateResult::none();
    }
    state.messages_in_flight = true;
    UpdateResult::action(UpdateAction::FetchMessages { robot })
}

pub(crate) fn handle_fleet_received(
    state: &mut AppState,
    result: Result<FleetSnapshot, String>,
) -> UpdateResult {
    state.fleet_in_flight = false;

    match result {
        Ok(fleet) => {
            if state.fleet_error.take().is_some() {
                info!("Fleet poll recovered");
            }
            let outcome = state
                .robot_list
                .reconcile(&fleet, state.selected.as_deref());
            if outcome == ReconcileOutcome::Rebuilt {
                debug!("Fleet is now [{}]", fleet.id_key());
            }
            state.fleet = fleet;
            state.fleet_loaded = true;
        }
        Err(e) => {
            // Log only the first failure of a streak
            if state.fleet_error.as_deref() != Some(e.as_str()) {
                warn!("Fleet poll failed: {}", e);
            }
            state.fleet_error = Some(e);
        }
    }
    UpdateResult::none()
}

pub(crate) fn handle_messages_received(
    state: &mut AppState,
    robot: RobotId,
    result: Result<Vec<RobotMessage>, String>,
) -> UpdateResult {
    state.messages_in_flight = false;

    if state.selected.as_ref() != Some(&robot) {
        debug!("Dropping messages for robot {} (no longer selected)", robot);
        return UpdateResult::none();
    }

    match result {
        Ok(messages) if !messages.is_empty() => {
            state.message_log.append(&robot, messages);
        }
        Ok(_) => {}
        Err(e) => debug!("Message poll for robot {} failed: {}", robot, e),
    }
    UpdateResult::none()
}

/// Make `robot` the selected robot. Re-selecting the current robot does
/// nothing.
pub(crate) fn handle_select_robot(state: &mut AppState, robot: RobotId) -> UpdateResult {
    if state.selected.as_ref() == Some(&robot) {
        return UpdateResult::none();
    }
    if !state.fleet.contains(&robot) {
        state.notify_error(format!("Unknown robot {robot}"));
        return UpdateResult::none();
    }

    info!("Selected robot {}", robot);
    state.selected = Some(robot.clone());
    state.message_log.clear();
    state.robot_list.mark_active(Some(&robot));
    state.config_editor.begin_sync(&robot);
    state.notify(format!("Robot {robot} selected"));

    UpdateResult::action(UpdateAction::SyncConfig { robot })
}

pub(crate) fn handle_move(
    state: &mut AppState,
    millimeters: Option<u32>,
    direction: MoveDirection,
) -> UpdateResult {
    let Some(robot) = state.selected.clone() else {
        return UpdateResult::none();
    };
    let Some(millimeters) = millimeters.or_else(|| state.command_amount_value()) else {
        state.notify_error("Enter a distance first");
        return UpdateResult::none();
    };
    UpdateResult::action(UpdateAction::MoveRobot {
        robot,
        millimeters,
        direction,
    })
}

pub(crate) fn handle_rotate(
    state: &mut AppState,
    degrees: Option<u32>,
    direction: RotateDirection,
) -> UpdateResult {
    let Some(robot) = state.selected.clone() else {
        return UpdateResult::none();
    };
    let Some(degrees) = degrees.or_else(|| state.command_amount_value()) else {
        state.notify_error("Enter an angle first");
        return UpdateResult::none();
    };
    UpdateResult::action(UpdateAction::RotateRobot {
        robot,
        degrees,
        direction,
    })
}
