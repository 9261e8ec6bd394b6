//! Headless mode - NDJSON event output for scripting and end-to-end tests
//!
//! Instead of drawing the TUI, every engine event is written to stdout as one
//! JSON object per line. Commands are read from stdin (see [`command`]).
//!
//! # Example Output
//!
//! ```json
//! {"event":"fleet_changed","robots":[{"id":"3","pose":{"x":0.1,"y":2.0,"angle":90.0},"status_text":"idle"}],"timestamp":1704700001000}
//! {"event":"robot_selected","robot":"3","timestamp":1704700002000}
//! {"event":"scenario_progress","uuid":"9f1c","percent":40,"timestamp":1704700003000}
//! ```

pub mod command;
pub mod runner;

use chrono::Utc;
use fleetmon_app::EngineEvent;
use fleetmon_core::{ConfigValue, RobotMessage, RobotSnapshot, ScenarioResult};
use serde::Serialize;
use std::io::{self, Write};
use tracing::error;

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    FleetChanged {
        robots: Vec<RobotSnapshot>,
        timestamp: i64,
    },

    RobotSelected { robot: String, timestamp: i64 },

    Messages {
        robot: String,
        messages: Vec<RobotMessage>,
        timestamp: i64,
    },

    ConfigLoaded {
        robot: String,
        values: Vec<ConfigValue>,
        timestamp: i64,
    },

    ConfigFailed {
        robot: String,
        message: String,
        timestamp: i64,
    },

    ScenarioStarted { uuid: String, timestamp: i64 },

    ScenarioProgress {
        uuid: String,
        percent: u8,
        timestamp: i64,
    },

    ScenarioFinished {
        uuid: String,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<ScenarioResult>,
        timestamp: i64,
    },

    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    Shutdown { timestamp: i64 },
}

impl HeadlessEvent {
    /// Emit this event to stdout as one JSON line
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        // Consumers read line by line
        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }
}

impl From<EngineEvent> for HeadlessEvent {
    fn from(event: EngineEvent) -> Self {
        let timestamp = Self::now();
        match event {
            EngineEvent::FleetChanged { robots } => Self::FleetChanged { robots, timestamp },
            EngineEvent::RobotSelected { robot } => Self::RobotSelected { robot, timestamp },
            EngineEvent::Messages { robot, messages } => Self::Messages {
                robot,
                messages,
                timestamp,
            },
            EngineEvent::ConfigLoaded { robot, values } => Self::ConfigLoaded {
                robot,
                values,
                timestamp,
            },
            EngineEvent::ConfigFailed { robot, message } => Self::ConfigFailed {
                robot,
                message,
                timestamp,
            },
            EngineEvent::ScenarioStarted { uuid } => Self::ScenarioStarted { uuid, timestamp },
            EngineEvent::ScenarioProgress { uuid, percent } => Self::ScenarioProgress {
                uuid,
                percent,
                timestamp,
            },
            EngineEvent::ScenarioFinished {
                uuid,
                success,
                result,
            } => Self::ScenarioFinished {
                uuid,
                success,
                result,
                timestamp,
            },
            EngineEvent::Error { message } => Self::Error {
                message,
                fatal: false,
                timestamp,
            },
            EngineEvent::Shutdown => Self::Shutdown { timestamp },
        }
    }
}
