//! Scripted in-memory controller for application tests
//!
//! [`FakeFleetApi`] answers every [`FleetApi`] call from canned data and
//! records the calls it received, so tests can assert on both state
//! transitions and the requests the app issued.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use fleetmon_core::prelude::*;
use fleetmon_core::{
    ConfigValue, FleetSnapshot, Pose, RobotMessage, RobotSnapshot, ScenarioInfo, ScenarioStatus,
};

use crate::client::RetryPolicy;
use crate::fleet_api::FleetApi;
use crate::routes::{MoveDirection, RotateDirection};

/// A request observed by the fake
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Robots,
    NewMessages(String),
    Move {
        robot: String,
        millimeters: u32,
        direction: MoveDirection,
    },
    Rotate {
        robot: String,
        degrees: u32,
        direction: RotateDirection,
    },
    Scenarios,
    RunScenario {
        robot: String,
        scenario: String,
    },
    ScenarioStatus(String),
    ScenarioInfo(String),
    SyncConfig(String),
    ConfigValues(String),
    SetConfigValue {
        robot: String,
        config: String,
        value: String,
    },
    StoreAndReboot(String),
}

#[derive(Debug, Default)]
struct FakeState {
    fleet: FleetSnapshot,
    fleet_error: Option<String>,
    messages: HashMap<String, VecDeque<Vec<RobotMessage>>>,
    scenarios: Vec<String>,
    run_result: Option<std::result::Result<String, String>>,
    statuses: VecDeque<ScenarioStatus>,
    infos: HashMap<String, ScenarioInfo>,
    config_values: HashMap<String, Vec<ConfigValue>>,
    config_error: Option<String>,
    rejected_configs: HashSet<String>,
    calls: Vec<ApiCall>,
}

/// In-memory [`FleetApi`] implementation. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeFleetApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeFleetApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        // A poisoned lock only happens after a test already panicked
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: ApiCall) {
        self.lock().calls.push(call);
    }

    pub fn with_fleet(self, fleet: FleetSnapshot) -> Self {
        self.set_fleet(fleet);
        self
    }

    pub fn set_fleet(&self, fleet: FleetSnapshot) {
        let mut s = self.lock();
        s.fleet = fleet;
        s.fleet_error = None;
    }

    pub fn fail_fleet(&self, message: &str) {
        self.lock().fleet_error = Some(message.to_string());
    }

    /// Queue one batch of messages for `robot`; each call to
    /// `new_messages` drains one batch.
    pub fn push_messages(&self, robot: &str, batch: Vec<RobotMessage>) {
        self.lock()
            .messages
            .entry(robot.to_string())
            .or_default()
            .push_back(batch);
    }

    pub fn with_scenarios(self, ids: &[&str]) -> Self {
        self.lock().scenarios = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_run_uuid(self, uuid: &str) -> Self {
        self.lock().run_result = Some(Ok(uuid.to_string()));
        self
    }

    pub fn with_run_error(self, message: &str) -> Self {
        self.lock().run_result = Some(Err(message.to_string()));
        self
    }

    /// Queue a status answer. The last queued status is repeated once the
    /// queue is down to one entry.
    pub fn push_status(&self, status: ScenarioStatus) {
        self.lock().statuses.push_back(status);
    }

    pub fn with_info(self, scenario: &str, info: ScenarioInfo) -> Self {
        self.lock().infos.insert(scenario.to_string(), info);
        self
    }

    pub fn with_config_values(self, robot: &str, values: Vec<ConfigValue>) -> Self {
        self.lock()
            .config_values
            .insert(robot.to_string(), values);
        self
    }

    /// Make the next config loads fail as if the robot never finished syncing
    pub fn fail_config_load(&self) {
        self.lock().config_error = Some("sync never completed".to_string());
    }

    /// Reject every `set_config_value` for `config`
    pub fn reject_config(&self, config: &str) {
        self.lock().rejected_configs.insert(config.to_string());
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    pub fn set_value_calls(&self) -> Vec<(String, String)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                ApiCall::SetConfigValue { config, value, .. } => {
                    Some((config.clone(), value.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&ApiCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(c)).count()
    }
}

impl FleetApi for FakeFleetApi {
    async fn robots(&self) -> Result<FleetSnapshot> {
        self.record(ApiCall::Robots);
        let s = self.lock();
        match &s.fleet_error {
            Some(message) => Err(Error::network("/robot/all", message.clone())),
            None => Ok(s.fleet.clone()),
        }
    }

    async fn new_messages(&self, robot: &str) -> Result<Vec<RobotMessage>> {
        self.record(ApiCall::NewMessages(robot.to_string()));
        Ok(self
            .lock()
            .messages
            .get_mut(robot)
            .and_then(|q| q.pop_front())
            .unwrap_or_default())
    }

    async fn move_robot(&self, robot: &str, millimeters: u32, direction: MoveDirection) {
        self.record(ApiCall::Move {
            robot: robot.to_string(),
            millimeters,
            direction,
        });
    }

    async fn rotate_robot(&self, robot: &str, degrees: u32, direction: RotateDirection) {
        self.record(ApiCall::Rotate {
            robot: robot.to_string(),
            degrees,
            direction,
        });
    }

    async fn scenarios(&self) -> Result<Vec<String>> {
        self.record(ApiCall::Scenarios);
        Ok(self.lock().scenarios.clone())
    }

    async fn run_scenario(&self, robot: &str, scenario: &str) -> Result<String> {
        self.record(ApiCall::RunScenario {
            robot: robot.to_string(),
            scenario: scenario.to_string(),
        });
        match self.lock().run_result.clone() {
            Some(Ok(uuid)) => Ok(uuid),
            Some(Err(message)) => Err(Error::api(message)),
            None => Err(Error::api("Scenario not found")),
        }
    }

    async fn scenario_status(&self, uuid: &str) -> Result<ScenarioStatus> {
        self.record(ApiCall::ScenarioStatus(uuid.to_string()));
        let mut s = self.lock();
        let status = if s.statuses.len() > 1 {
            s.statuses.pop_front()
        } else {
            s.statuses.front().cloned()
        };
        status.ok_or_else(|| Error::network(format!("/scenario/status/{uuid}"), "no status"))
    }

    async fn scenario_info(&self, scenario: &str) -> Result<ScenarioInfo> {
        self.record(ApiCall::ScenarioInfo(scenario.to_string()));
        self.lock()
            .infos
            .get(scenario)
            .cloned()
            .ok_or_else(|| Error::api("Scenario not found"))
    }

    async fn sync_config(&self, robot: &str) {
        self.record(ApiCall::SyncConfig(robot.to_string()));
    }

    async fn config_values_when_ready(
        &self,
        robot: &str,
        policy: &RetryPolicy,
    ) -> Result<Vec<ConfigValue>> {
        self.record(ApiCall::ConfigValues(robot.to_string()));
        let s = self.lock();
        if s.config_error.is_some() {
            return Err(Error::retry_exhausted(
                format!("/config/get_all_value_information/{robot}"),
                policy.max_attempts,
            ));
        }
        Ok(s.config_values.get(robot).cloned().unwrap_or_default())
    }

    async fn set_config_value(&self, robot: &str, config: &str, value: &str) -> Result<()> {
        self.record(ApiCall::SetConfigValue {
            robot: robot.to_string(),
            config: config.to_string(),
            value: value.to_string(),
        });
        if self.lock().rejected_configs.contains(config) {
            return Err(Error::api(format!("value {config} rejected")));
        }
        Ok(())
    }

    async fn store_and_reboot(&self, robot: &str) {
        self.record(ApiCall::StoreAndReboot(robot.to_string()));
    }
}

// ─────────────────────────────────────────────────────────
// Fixture builders
// ─────────────────────────────────────────────────────────

/// Robot at the origin with the given status
pub fn test_robot(id: &str, status: &str) -> RobotSnapshot {
    RobotSnapshot {
        id: id.to_string(),
        pose: Pose::default(),
        status_text: status.to_string(),
    }
}

/// Fleet of idle robots with the given ids
pub fn test_fleet(ids: &[&str]) -> FleetSnapshot {
    FleetSnapshot::from_robots(ids.iter().map(|id| test_robot(id, "IDLE")))
}

/// Untyped config value
pub fn test_config_value(id: &str, name: &str, value: &str) -> ConfigValue {
    ConfigValue {
        id: id.to_string(),
        name: name.to_string(),
        value: value.to_string(),
        value_type: None,
    }
}

pub fn running_status(percent: u8) -> ScenarioStatus {
    ScenarioStatus {
        percent_complete: percent,
        finished: false,
        success: false,
        result: Default::default(),
    }
}
