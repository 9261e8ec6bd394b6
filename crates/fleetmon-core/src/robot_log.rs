//! Messages exchanged between the controller and a robot

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::RobotId;

/// Kind of a logged message. The controller tags its own commands as
/// `command` and robot replies as `response`; anything else is carried as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Command,
    Response,
    Other(String),
}

impl MessageKind {
    pub fn from_wire(tag: &str) -> Self {
        match tag {
            "command" => Self::Command,
            "response" => Self::Response,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Command => "command",
            Self::Response => "response",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry fetched from `/robot/{id}/newmessages`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotMessage {
    pub kind: MessageKind,
    pub message_id: String,
    pub category: String,
    pub text: String,
}

/// Who a message group is attributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageAuthor {
    Controller,
    Robot(RobotId),
}

impl MessageAuthor {
    /// Commands come from the controller; everything else is attributed to
    /// the robot the log belongs to.
    pub fn for_kind(kind: &MessageKind, robot: &str) -> Self {
        match kind {
            MessageKind::Command => Self::Controller,
            _ => Self::Robot(robot.to_string()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Controller => "Controller".to_string(),
            Self::Robot(id) => format!("Robot {id}"),
        }
    }
}
