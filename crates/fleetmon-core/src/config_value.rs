//! Robot configuration values

use serde::{Deserialize, Serialize};

/// Storage type of a configuration value, from the robot's one-letter tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigValueType {
    Float,
    Integer,
    Bool,
    Byte,
}

impl ConfigValueType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "f" => Some(Self::Float),
            "i" => Some(Self::Integer),
            "b" => Some(Self::Bool),
            "c" => Some(Self::Byte),
            _ => None,
        }
    }

    pub fn tag(&self) -> char {
        match self {
            Self::Float => 'f',
            Self::Integer => 'i',
            Self::Bool => 'b',
            Self::Byte => 'c',
        }
    }

    /// Whether `text` would be accepted by the robot for this type
    pub fn accepts(&self, text: &str) -> bool {
        let text = text.trim();
        match self {
            Self::Float => text.parse::<f32>().is_ok(),
            Self::Integer => text.parse::<i32>().is_ok(),
            Self::Bool => matches!(
                text.to_ascii_lowercase().as_str(),
                "true" | "false" | "0" | "1"
            ),
            Self::Byte => text.parse::<u8>().is_ok(),
        }
    }
}

/// A named configuration value as last synced from the robot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigValue {
    pub id: String,
    pub name: String,
    pub value: String,
    pub value_type: Option<ConfigValueType>,
}

impl ConfigValue {
    /// Untyped values accept any text.
    pub fn accepts(&self, text: &str) -> bool {
        self.value_type.map_or(true, |t| t.accepts(text))
    }
}
