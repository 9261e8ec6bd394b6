//! Scenario choice and run handlers

use fleetmon_core::{ScenarioId, ScenarioInfo, ScenarioStatus};
use tracing::{debug, info, warn};

use crate::message::Message;
use crate::pollers::PollerHandle;
use crate::scenario::{StatusTransition, LABEL_ERRORED, LABEL_FINISHED};
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

pub(crate) fn handle_scenarios_received(
    state: &mut AppState,
    result: Result<Vec<ScenarioId>, String>,
) -> UpdateResult {
    match result {
        Ok(ids) => {
            info!("{} scenarios available", ids.len());
            if state.scenario.set_scenarios(ids).is_some() {
                return UpdateResult::message(Message::RequestScenarioInfo);
            }
        }
        Err(e) => {
            warn!("Loading scenarios failed: {}", e);
            state.notify_error(format!("Could not load scenarios: {e}"));
        }
    }
    UpdateResult::none()
}

pub(crate) fn handle_cycle(state: &mut AppState, forward: bool) -> UpdateResult {
    let chosen = if forward {
        state.scenario.choose_next()
    } else {
        state.scenario.choose_prev()
    };
    match chosen {
        Some(_) => UpdateResult::message(Message::RequestScenarioInfo),
        None => UpdateResult::none(),
    }
}

pub(crate) fn handle_choose(state: &mut AppState, scenario: ScenarioId) -> UpdateResult {
    if state.scenario.choose(&scenario) {
        UpdateResult::message(Message::RequestScenarioInfo)
    } else {
        state.notify_error(format!("Unknown scenario {scenario}"));
        UpdateResult::none()
    }
}

pub(crate) fn handle_request_info(state: &mut AppState) -> UpdateResult {
    match state.scenario.chosen_id() {
        Some(id) if state.scenario.info().is_none() => {
            UpdateResult::action(UpdateAction::FetchScenarioInfo {
                scenario: id.clone(),
            })
        }
        _ => UpdateResult::none(),
    }
}

pub(crate) fn handle_info_received(
    state: &mut AppState,
    scenario: ScenarioId,
    result: Result<ScenarioInfo, String>,
) -> UpdateResult {
    match result {
        Ok(info) => {
            state.scenario.set_info(&scenario, info);
        }
        Err(e) => debug!("Scenario info for {} unavailable: {}", scenario, e),
    }
    UpdateResult::none()
}

/// Start the chosen scenario on the selected robot. Silently ignored when
/// either is missing or a run is already active.
pub(crate) fn handle_run(state: &mut AppState) -> UpdateResult {
    let Some((robot, scenario)) = state.scenario.start_request(state.selected.as_deref()) else {
        return UpdateResult::none();
    };
    info!("Starting scenario {} on robot {}", scenario, robot);
    state.scenario.begin_start(scenario.clone());
    UpdateResult::action(UpdateAction::StartScenario { robot, scenario })
}

pub(crate) fn handle_start_result(
    state: &mut AppState,
    scenario: ScenarioId,
    result: Result<String, String>,
) -> UpdateResult {
    match result {
        Ok(uuid) => {
            let (poller, cancel_rx) = PollerHandle::new();
            if !state.scenario.started(uuid.clone(), poller) {
                warn!("Run {} of scenario {} was not expected", uuid, scenario);
                return UpdateResult::none();
            }
            info!("Scenario {} running as {}", scenario, uuid);
            UpdateResult::action(UpdateAction::StartScenarioPoller { uuid, cancel_rx })
        }
        Err(e) => {
            warn!("Starting scenario {} failed: {}", scenario, e);
            state.scenario.start_failed(e.clone());
            state.notify_error(format!("Scenario {scenario} did not start: {e}"));
            UpdateResult::none()
        }
    }
}

pub(crate) fn handle_status_received(
    state: &mut AppState,
    uuid: String,
    result: Result<ScenarioStatus, String>,
) -> UpdateResult {
    let status = match result {
        Ok(status) => status,
        Err(e) => {
            debug!("Status poll for run {} failed: {}", uuid, e);
            return UpdateResult::none();
        }
    };

    match state.scenario.status_received(&uuid, status) {
        Some(StatusTransition::Succeeded) => {
            info!("Run {} finished", uuid);
            state.notify(LABEL_FINISHED);
        }
        Some(StatusTransition::Failed) => {
            warn!("Run {} errored", uuid);
            state.notify_error(LABEL_ERRORED);
        }
        Some(StatusTransition::Progress(_)) | None => {}
    }
    UpdateResult::none()
}
