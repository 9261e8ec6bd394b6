//! Robot list reconciliation
//!
//! The list is only rebuilt when the set of robot ids changes. When the set
//! is unchanged each row keeps its place and only its status text is
//! refreshed.

use fleetmon_core::{FleetSnapshot, RobotId};

/// One rendered robot row
#[derive(Debug, Clone, PartialEq)]
pub struct RobotRow {
    pub id: RobotId,
    pub status_text: String,
    /// Marks the selected robot
    pub active: bool,
}

/// What a reconcile pass did to the rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Same id set: rows kept, status text refreshed in place
    StatusOnly,
    /// Id set changed: rows rebuilt from the snapshot
    Rebuilt,
}

#[derive(Debug, Default)]
pub struct RobotList {
    rows: Vec<RobotRow>,
    /// Sorted, comma-joined ids the rows were last built from
    id_key: Option<String>,
    cursor: usize,
    rebuild_count: u64,
}

impl RobotList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the rows in line with `fleet`
    pub fn reconcile(&mut self, fleet: &FleetSnapshot, selected: Option<&str>) -> ReconcileOutcome {
        let key = fleet.id_key();

        if self.id_key.as_deref() == Some(key.as_str()) {
            for row in &mut self.rows {
                if let Some(robot) = fleet.get(&row.id) {
                    if row.status_text != robot.status_text {
                        row.status_text.clone_from(&robot.status_text);
                    }
                }
            }
            return ReconcileOutcome::StatusOnly;
        }

        let cursor_id = self.cursor_id().cloned();

        self.rows = fleet
            .iter()
            .map(|robot| RobotRow {
                id: robot.id.clone(),
                status_text: robot.status_text.clone(),
                active: selected == Some(robot.id.as_str()),
            })
            .collect();
        self.id_key = Some(key);
        self.rebuild_count += 1;

        self.cursor = cursor_id
            .and_then(|id| self.rows.iter().position(|r| r.id == id))
            .unwrap_or_else(|| self.cursor.min(self.rows.len().saturating_sub(1)));

        tracing::debug!(
            "Robot list rebuilt ({} robots, rebuild #{})",
            self.rows.len(),
            self.rebuild_count
        );
        ReconcileOutcome::Rebuilt
    }

    /// Move the active marker without touching anything else
    pub fn mark_active(&mut self, selected: Option<&str>) {
        for row in &mut self.rows {
            row.active = selected == Some(row.id.as_str());
        }
    }

    pub fn rows(&self) -> &[RobotRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    pub fn id_key(&self) -> Option<&str> {
        self.id_key.as_deref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Id of the row under the operator's cursor
    pub fn cursor_id(&self) -> Option<&RobotId> {
        self.rows.get(self.cursor).map(|r| &r.id)
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }
}
