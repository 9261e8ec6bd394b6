//! Test scenario status, results, and descriptions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::json_text;

/// Identifier of an available scenario (e.g. `robot_rotation_time`)
pub type ScenarioId = String;

/// One row of a finished scenario's result table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub key: String,
    pub values: Vec<String>,
}

/// Result table of a finished scenario. Scalars are stored as
/// single-element sequences so every row renders the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub rows: Vec<ResultRow>,
}

impl ScenarioResult {
    pub fn from_json(value: &Value) -> Self {
        let rows = match value {
            Value::Null => Vec::new(),
            Value::Object(map) => map
                .iter()
                .map(|(key, v)| ResultRow {
                    key: key.clone(),
                    values: wrap_values(v),
                })
                .collect(),
            other => vec![ResultRow {
                key: "result".to_string(),
                values: wrap_values(other),
            }],
        };
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn wrap_values(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(json_text).collect(),
        scalar => vec![json_text(scalar)],
    }
}

/// One poll of `/scenario/status/{uuid}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStatus {
    pub percent_complete: u8,
    pub finished: bool,
    pub success: bool,
    pub result: ScenarioResult,
}

impl ScenarioStatus {
    /// Clamp a raw percentage from the controller into `0..=100`
    pub fn clamp_percent(raw: f64) -> u8 {
        if raw.is_nan() {
            return 0;
        }
        raw.round().clamp(0.0, 100.0) as u8
    }
}

/// Human-readable description of a scenario from `/scenario/info/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInfo {
    pub description: String,
    pub prerequisites: String,
    /// Expected result keys with their descriptions
    pub results: Vec<(String, String)>,
}
