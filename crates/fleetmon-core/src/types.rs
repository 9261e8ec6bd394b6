//! Fleet domain types: robot poses and fleet snapshots

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Robot identifier as shown by the controller (ArUco marker ids in practice)
pub type RobotId = String;

/// Position and heading of a robot on the warehouse floor
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { x, y, angle }
    }

    /// Pose with every component rounded to two decimals, as displayed
    pub fn rounded(&self) -> Self {
        Self {
            x: round2(self.x),
            y: round2(self.y),
            angle: round2(self.angle),
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.rounded();
        write!(f, "x: {:.2}  y: {:.2}  angle: {:.2}", p.x, p.y, p.angle)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// One robot as reported by a fleet poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotSnapshot {
    pub id: RobotId,
    pub pose: Pose,
    pub status_text: String,
}

/// Every robot known to the controller at one poll, keyed by id.
///
/// Iteration is in lexicographic id order, the same order used for the
/// reconciliation key, so the rendered list and the key never disagree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    robots: BTreeMap<RobotId, RobotSnapshot>,
}

impl FleetSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_robots(robots: impl IntoIterator<Item = RobotSnapshot>) -> Self {
        Self {
            robots: robots.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&RobotSnapshot> {
        self.robots.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.robots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RobotSnapshot> {
        self.robots.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RobotId> {
        self.robots.keys()
    }

    /// Sorted ids joined with `,`. Two snapshots with the same key hold the
    /// same set of robots.
    pub fn id_key(&self) -> String {
        self.robots
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Render a JSON scalar the way the operator expects to read it.
///
/// Strings lose their quotes, `null` becomes empty, anything else uses its
/// JSON text.
pub fn json_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn robot(id: &str) -> RobotSnapshot {
        RobotSnapshot {
            id: id.to_string(),
            pose: Pose::default(),
            status_text: "IDLE".to_string(),
        }
    }

    #[test]
    fn test_pose_rounded_to_two_decimals() {
        let pose = Pose::new(1.23456, 7.0, 89.999);
        let r = pose.rounded();
        assert_eq!(r.x, 1.23);
        assert_eq!(r.angle, 90.0);
        assert_eq!(pose.to_string(), "x: 1.23  y: 7.00  angle: 90.00");
    }

    #[test]
    fn test_id_key_is_order_independent() {
        let a = FleetSnapshot::from_robots(vec![robot("7"), robot("12"), robot("3")]);
        let b = FleetSnapshot::from_robots(vec![robot("3"), robot("7"), robot("12")]);
        assert_eq!(a.id_key(), "12,3,7");
        assert_eq!(a.id_key(), b.id_key());
    }

    #[test]
    fn test_iteration_matches_key_order() {
        let fleet = FleetSnapshot::from_robots(vec![robot("b"), robot("a"), robot("c")]);
        let ids: Vec<_> = fleet.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_fleet_key() {
        let fleet = FleetSnapshot::new();
        assert!(fleet.is_empty());
        assert_eq!(fleet.id_key(), "");
    }

    #[test]
    fn test_json_text() {
        assert_eq!(json_text(&json!("IDLE")), "IDLE");
        assert_eq!(json_text(&json!(3)), "3");
        assert_eq!(json_text(&json!(true)), "true");
        assert_eq!(json_text(&json!(null)), "");
    }
}
