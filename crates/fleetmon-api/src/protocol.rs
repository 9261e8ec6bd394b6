//! Wire formats of the controller's JSON responses
//!
//! The controller is loose about scalar types: robot ids and message ids
//! arrive as numbers, robot state as an enum name, config values as
//! numbers or booleans. Everything is normalised to text here so the rest
//! of the application only sees the domain types from `fleetmon_core`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use fleetmon_core::prelude::*;
use fleetmon_core::{
    json_text, ConfigValue, ConfigValueType, FleetSnapshot, MessageKind, Pose, RobotMessage,
    RobotSnapshot, ScenarioInfo, ScenarioResult, ScenarioStatus,
};

// ─────────────────────────────────────────────────────────
// Robots
// ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WirePose {
    #[serde(default)]
    position: [f64; 2],
    #[serde(default)]
    angle: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRobot {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    current_pose: WirePose,
    #[serde(default)]
    current_state: Value,
}

impl WireRobot {
    fn into_snapshot(self, key: &str) -> RobotSnapshot {
        let id = match self.id {
            Some(v) if !v.is_null() => json_text(&v),
            _ => key.to_string(),
        };
        RobotSnapshot {
            id,
            pose: Pose::new(
                self.current_pose.position[0],
                self.current_pose.position[1],
                self.current_pose.angle,
            ),
            status_text: json_text(&self.current_state),
        }
    }
}

/// `/robot/all`
#[derive(Debug, Deserialize)]
pub struct RobotsResponse {
    #[serde(default)]
    robots: BTreeMap<String, WireRobot>,
}

impl RobotsResponse {
    pub fn into_fleet(self) -> FleetSnapshot {
        FleetSnapshot::from_robots(
            self.robots
                .into_iter()
                .map(|(key, robot)| robot.into_snapshot(&key)),
        )
    }
}

// ─────────────────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct WireMessage {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message_id: Value,
    #[serde(default)]
    category: Value,
    #[serde(default)]
    text: String,
}

impl From<WireMessage> for RobotMessage {
    fn from(wire: WireMessage) -> Self {
        RobotMessage {
            kind: MessageKind::from_wire(&wire.kind),
            message_id: json_text(&wire.message_id),
            category: json_text(&wire.category),
            text: wire.text,
        }
    }
}

/// `/robot/{id}/newmessages`
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    messages: Vec<WireMessage>,
    #[serde(default)]
    error: Option<String>,
}

impl MessagesResponse {
    pub fn into_result(self) -> Result<Vec<RobotMessage>> {
        if let Some(error) = self.error {
            return Err(Error::api(error));
        }
        Ok(self.messages.into_iter().map(RobotMessage::from).collect())
    }
}

// ─────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────

/// `/scenario/all`
#[derive(Debug, Deserialize)]
pub struct ScenariosResponse {
    #[serde(default)]
    pub scenarios: Vec<String>,
}

/// `/scenario/run/{robot}/{scenario}`: either a run uuid or an error
#[derive(Debug, Deserialize)]
pub struct RunResponse {
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl RunResponse {
    pub fn into_result(self) -> Result<String> {
        match (self.uuid, self.error) {
            (Some(uuid), None) => Ok(uuid),
            (_, Some(error)) => Err(Error::api(error)),
            (None, None) => Err(Error::api("run response carried neither uuid nor error")),
        }
    }
}

/// `/scenario/status/{uuid}`
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    percent_complete: f64,
    #[serde(default)]
    finished: bool,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Value,
}

impl From<StatusResponse> for ScenarioStatus {
    fn from(wire: StatusResponse) -> Self {
        ScenarioStatus {
            percent_complete: ScenarioStatus::clamp_percent(wire.percent_complete),
            finished: wire.finished,
            success: wire.success,
            result: ScenarioResult::from_json(&wire.result),
        }
    }
}

/// `/scenario/info/{id}`
#[derive(Debug, Deserialize)]
pub struct InfoResponse {
    #[serde(default)]
    description: String,
    #[serde(default)]
    prerequisites: String,
    #[serde(default)]
    results: BTreeMap<String, Value>,
    #[serde(default)]
    error: Option<String>,
}

impl InfoResponse {
    pub fn into_result(self) -> Result<ScenarioInfo> {
        if let Some(error) = self.error {
            return Err(Error::api(error));
        }
        Ok(ScenarioInfo {
            description: self.description.trim_end().to_string(),
            prerequisites: self.prerequisites,
            results: self
                .results
                .into_iter()
                .map(|(k, v)| (k, json_text(&v)))
                .collect(),
        })
    }
}

// ─────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct WireConfigValue {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    value_type: Option<String>,
    #[serde(default)]
    value: Value,
}

/// `/config/get_all_value_information/{robot}`
#[derive(Debug, Deserialize)]
pub struct ConfigValuesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    result: BTreeMap<String, WireConfigValue>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ConfigValuesResponse {
    /// Values in the order the controller keyed them
    pub fn into_values(self) -> Vec<ConfigValue> {
        self.result
            .into_iter()
            .map(|(key, wire)| ConfigValue {
                id: match wire.id {
                    Some(v) if !v.is_null() => json_text(&v),
                    _ => key,
                },
                name: wire.name,
                value: json_text(&wire.value),
                value_type: wire.value_type.as_deref().and_then(ConfigValueType::from_tag),
            })
            .collect()
    }
}

/// Acknowledgement of a command that the caller waits on
#[derive(Debug, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

impl AckResponse {
    pub fn into_result(self) -> Result<()> {
        if let Some(error) = self.error {
            return Err(Error::api(error));
        }
        if self.success == Some(false) {
            return Err(Error::api(
                self.reason
                    .unwrap_or_else(|| "controller reported failure".to_string()),
            ));
        }
        Ok(())
    }
}
