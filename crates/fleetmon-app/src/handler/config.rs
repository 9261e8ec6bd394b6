//! Config editor handlers

use fleetmon_core::{ConfigValue, RobotId};
use tracing::{debug, error, info, warn};

use crate::config_editor::ApplyId;
use crate::state::{AppState, UiMode};

use super::{UpdateAction, UpdateResult};

pub(crate) fn handle_open(state: &mut AppState) -> UpdateResult {
    state.config_editor.visible = true;
    state.ui_mode = UiMode::ConfigEditor;
    UpdateResult::none()
}

pub(crate) fn handle_close(state: &mut AppState) -> UpdateResult {
    state.config_editor.visible = false;
    state.config_editor.editing = false;
    state.ui_mode = UiMode::Normal;
    UpdateResult::none()
}

pub(crate) fn handle_loaded(
    state: &mut AppState,
    robot: RobotId,
    result: Result<Vec<ConfigValue>, String>,
) -> UpdateResult {
    match result {
        Ok(values) => {
            let count = values.len();
            if state.config_editor.load_succeeded(&robot, values) {
                info!("Loaded {} config values for robot {}", count, robot);
            }
        }
        Err(e) => {
            if state.config_editor.load_failed(&robot, e.clone()) {
                error!("Loading config of robot {} failed: {}", robot, e);
                state.notify_error(format!("Config load failed: {e}"));
            }
        }
    }
    UpdateResult::none()
}

pub(crate) fn handle_apply(state: &mut AppState) -> UpdateResult {
    let Some(robot) = state.config_editor.robot().map(str::to_string) else {
        return UpdateResult::none();
    };
    let Some((apply, writes)) = state.config_editor.begin_apply() else {
        if state.config_editor.is_applying() {
            state.notify_error("Previous apply still running");
        }
        return UpdateResult::none();
    };
    state.config_editor.editing = false;
    info!(
        "Applying {} config edits to robot {} (apply #{})",
        writes.len(),
        robot,
        apply
    );
    UpdateResult::action(UpdateAction::ApplyConfig {
        robot,
        apply,
        writes,
    })
}

pub(crate) fn handle_write_completed(
    state: &mut AppState,
    robot: RobotId,
    apply: ApplyId,
    config: String,
    value: String,
    result: Result<(), String>,
) -> UpdateResult {
    match result {
        Ok(()) => state.config_editor.write_succeeded(apply, &config, &value),
        Err(e) => {
            warn!("Setting config {} on robot {} failed: {}", config, robot, e);
            state.config_editor.write_failed(apply, &config, e);
            if let Some(message) = state.config_editor.apply_error.clone() {
                state.notify_error(message);
            }
        }
    }
    UpdateResult::none()
}

pub(crate) fn handle_apply_finished(
    state: &mut AppState,
    robot: RobotId,
    apply: ApplyId,
) -> UpdateResult {
    if !state.config_editor.apply_finished(apply) {
        debug!("Ignoring finish of unknown apply #{} on robot {}", apply, robot);
        return UpdateResult::none();
    }
    if state.config_editor.apply_error.is_none() {
        state.notify(format!("Configuration applied to robot {robot}"));
    }
    UpdateResult::none()
}

pub(crate) fn handle_store_and_reboot(state: &mut AppState) -> UpdateResult {
    let Some(robot) = state.selected.clone() else {
        return UpdateResult::none();
    };
    state.notify(format!("Store and reboot sent to robot {robot}"));
    UpdateResult::action(UpdateAction::StoreAndReboot { robot })
}
