//! Scenario runner state machine
//!
//! ```text
//! Idle -> Starting -> Running { uuid, percent } -> Finished(Success | Error)
//!           |
//!           +-> Idle (start request failed)
//! ```
//!
//! A run owns the [`PollerHandle`] of its status poller. The handle is
//! cancelled on the finished transition, when a new run replaces the state,
//! and on shutdown.

use fleetmon_core::{ScenarioId, ScenarioInfo, ScenarioResult, ScenarioStatus};

use crate::pollers::PollerHandle;

pub const LABEL_STARTED: &str = "Test Started";
pub const LABEL_FINISHED: &str = "Test Finished";
pub const LABEL_ERRORED: &str = "Test errored";

/// How a finished run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Success(ScenarioResult),
    Error,
}

#[derive(Debug, Default)]
pub enum RunState {
    #[default]
    Idle,
    Starting {
        scenario: ScenarioId,
    },
    Running {
        uuid: String,
        scenario: ScenarioId,
        percent: u8,
        poller: PollerHandle,
    },
    Finished {
        uuid: String,
        outcome: RunOutcome,
    },
}

impl RunState {
    pub fn is_active(&self) -> bool {
        matches!(self, RunState::Starting { .. } | RunState::Running { .. })
    }
}

/// What a status update did to the run
#[derive(Debug, Clone, PartialEq)]
pub enum StatusTransition {
    Progress(u8),
    Succeeded,
    Failed,
}

#[derive(Debug, Default)]
pub struct ScenarioRunner {
    scenarios: Vec<ScenarioId>,
    chosen: Option<usize>,
    info: Option<(ScenarioId, ScenarioInfo)>,
    state: RunState,

    /// Last progress value shown by the gauge
    pub percent: u8,
    /// Run label ("Test Started", ...)
    pub label: Option<&'static str>,
    /// Gauge shows the error style
    pub error_flag: bool,
    /// Result area is covered by the loading overlay
    pub overlay: bool,
    /// Last start failure
    pub start_error: Option<String>,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────
    // Scenario choice
    // ─────────────────────────────────────────────────────────

    /// Install the scenario id list. The first id becomes the choice.
    pub fn set_scenarios(&mut self, scenarios: Vec<ScenarioId>) -> Option<&ScenarioId> {
        self.chosen = if scenarios.is_empty() { None } else { Some(0) };
        self.scenarios = scenarios;
        self.info = None;
        self.chosen_id()
    }

    pub fn scenarios(&self) -> &[ScenarioId] {
        &self.scenarios
    }

    pub fn chosen_id(&self) -> Option<&ScenarioId> {
        self.chosen.and_then(|i| self.scenarios.get(i))
    }

    /// Choose the next scenario, wrapping around
    pub fn choose_next(&mut self) -> Option<&ScenarioId> {
        self.step_choice(1)
    }

    /// Choose the previous scenario, wrapping around
    pub fn choose_prev(&mut self) -> Option<&ScenarioId> {
        self.step_choice(self.scenarios.len().saturating_sub(1))
    }

    fn step_choice(&mut self, step: usize) -> Option<&ScenarioId> {
        let len = self.scenarios.len();
        if len == 0 {
            return None;
        }
        let next = self.chosen.map_or(0, |i| (i + step) % len);
        if self.chosen != Some(next) {
            self.info = None;
        }
        self.chosen = Some(next);
        self.chosen_id()
    }

    /// Make `scenario` the choice. Returns `false` for unknown ids.
    pub fn choose(&mut self, scenario: &str) -> bool {
        let Some(index) = self.scenarios.iter().position(|s| s == scenario) else {
            return false;
        };
        if self.chosen != Some(index) {
            self.info = None;
        }
        self.chosen = Some(index);
        true
    }

    /// Store the description for `scenario`. Ignored when another scenario
    /// has been chosen since the request.
    pub fn set_info(&mut self, scenario: &str, info: ScenarioInfo) -> bool {
        if self.chosen_id().map(String::as_str) != Some(scenario) {
            return false;
        }
        self.info = Some((scenario.to_string(), info));
        true
    }

    pub fn info(&self) -> Option<&ScenarioInfo> {
        self.info.as_ref().map(|(_, info)| info)
    }

    // ─────────────────────────────────────────────────────────
    // Run lifecycle
    // ─────────────────────────────────────────────────────────

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Robot and scenario to start, or `None` when a run cannot start
    pub fn start_request(&self, selected_robot: Option<&str>) -> Option<(String, ScenarioId)> {
        if self.state.is_active() {
            return None;
        }
        let robot = selected_robot?;
        let scenario = self.chosen_id()?;
        Some((robot.to_string(), scenario.clone()))
    }

    /// The start request has been sent
    pub fn begin_start(&mut self, scenario: ScenarioId) {
        self.start_error = None;
        self.state = RunState::Starting { scenario };
    }

    /// The controller accepted the run. Returns `false` (and cancels the
    /// poller) when no start was pending.
    pub fn started(&mut self, uuid: String, poller: PollerHandle) -> bool {
        let scenario = match std::mem::take(&mut self.state) {
            RunState::Starting { scenario } => scenario,
            other => {
                self.state = other;
                poller.cancel();
                return false;
            }
        };
        self.state = RunState::Running {
            uuid,
            scenario,
            percent: 0,
            poller,
        };
        self.percent = 0;
        self.error_flag = false;
        self.overlay = true;
        self.label = Some(LABEL_STARTED);
        true
    }

    /// The start request failed
    pub fn start_failed(&mut self, message: String) {
        if matches!(self.state, RunState::Starting { .. }) {
            self.state = RunState::Idle;
        }
        self.start_error = Some(message);
    }

    /// Apply a polled status. Statuses for any run other than the active one
    /// are ignored.
    pub fn status_received(
        &mut self,
        uuid: &str,
        status: ScenarioStatus,
    ) -> Option<StatusTransition> {
        let RunState::Running {
            uuid: active,
            percent,
            poller,
            ..
        } = &mut self.state
        else {
            return None;
        };
        if active.as_str() != uuid {
            return None;
        }

        *percent = status.percent_complete.min(100);
        self.percent = *percent;

        if !status.finished {
            return Some(StatusTransition::Progress(self.percent));
        }

        poller.cancel();
        let uuid = uuid.to_string();
        self.overlay = false;

        if status.success {
            self.label = Some(LABEL_FINISHED);
            self.state = RunState::Finished {
                uuid,
                outcome: RunOutcome::Success(status.result),
            };
            Some(StatusTransition::Succeeded)
        } else {
            self.label = Some(LABEL_ERRORED);
            self.error_flag = true;
            self.state = RunState::Finished {
                uuid,
                outcome: RunOutcome::Error,
            };
            Some(StatusTransition::Failed)
        }
    }

    /// Uuid of the run being polled
    pub fn active_uuid(&self) -> Option<&str> {
        match &self.state {
            RunState::Running { uuid, .. } => Some(uuid),
            _ => None,
        }
    }

    /// Result table of the last successful run
    pub fn result_table(&self) -> Option<&ScenarioResult> {
        match &self.state {
            RunState::Finished {
                outcome: RunOutcome::Success(result),
                ..
            } => Some(result),
            _ => None,
        }
    }

    pub fn poller_cancelled(&self) -> Option<bool> {
        match &self.state {
            RunState::Running { poller, .. } => Some(poller.is_cancelled()),
            _ => None,
        }
    }

    /// Stop polling, e.g. on shutdown
    pub fn shutdown(&mut self) {
        if let RunState::Running { poller, .. } = &self.state {
            poller.cancel();
        }
    }
}
