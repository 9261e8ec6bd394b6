//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON lines.

use fleetmon_core::{ConfigValue, RobotId, RobotMessage, RobotSnapshot, ScenarioResult};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Fleet
    // ─────────────────────────────────────────────────────────
    /// A fleet poll brought a different snapshot
    FleetChanged { robots: Vec<RobotSnapshot> },

    /// The operator selected another robot
    RobotSelected { robot: RobotId },

    /// New messages were appended to the selected robot's log
    Messages {
        robot: RobotId,
        messages: Vec<RobotMessage>,
    },

    // ─────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────
    ConfigLoaded {
        robot: RobotId,
        values: Vec<ConfigValue>,
    },

    ConfigFailed { robot: RobotId, message: String },

    // ─────────────────────────────────────────────────────────
    // Scenarios
    // ─────────────────────────────────────────────────────────
    ScenarioStarted { uuid: String },

    ScenarioProgress { uuid: String, percent: u8 },

    ScenarioFinished {
        uuid: String,
        success: bool,
        /// Result table, present on success
        result: Option<ScenarioResult>,
    },

    /// Something the operator should know about failed
    Error { message: String },

    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Returns a short string label for this event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::FleetChanged { .. } => "fleet_changed",
            Self::RobotSelected { .. } => "robot_selected",
            Self::Messages { .. } => "messages",
            Self::ConfigLoaded { .. } => "config_loaded",
            Self::ConfigFailed { .. } => "config_failed",
            Self::ScenarioStarted { .. } => "scenario_started",
            Self::ScenarioProgress { .. } => "scenario_progress",
            Self::ScenarioFinished { .. } => "scenario_finished",
            Self::Error { .. } => "error",
            Self::Shutdown => "shutdown",
        }
    }
}
