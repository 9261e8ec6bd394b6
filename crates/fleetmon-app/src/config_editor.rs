//! Robot configuration editor
//!
//! Holds the values last synced from the selected robot plus the operator's
//! pending edits. A field is dirty while its typed text differs from the
//! synced value, and `pending` holds exactly the dirty fields.

use std::collections::HashMap;

use fleetmon_core::{ConfigValue, RobotId};

/// Progress of loading the robot's configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigLoad {
    #[default]
    Idle,
    /// Sync requested, waiting for the robot to report its values
    Syncing,
    Ready,
    Failed(String),
}

/// One editable row
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigField {
    /// Value as last synced or acknowledged
    pub synced: ConfigValue,
    /// What the operator typed
    pub text: String,
    /// Typed text does not parse as the value's type
    pub invalid: bool,
}

impl ConfigField {
    fn new(synced: ConfigValue) -> Self {
        Self {
            text: synced.value.clone(),
            synced,
            invalid: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.synced.id
    }

    pub fn is_dirty(&self) -> bool {
        self.text != self.synced.value
    }

    fn revert(&mut self) {
        self.text.clone_from(&self.synced.value);
        self.invalid = false;
    }
}

/// Identifies one apply run. Write results carry it so results from an
/// earlier run are never mistaken for the current one.
pub type ApplyId = u64;

/// The apply run whose writes are still being sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveApply {
    id: ApplyId,
    /// Sync session the run was started from
    sync: u64,
}

/// A single write sent while applying edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWrite {
    pub config: String,
    pub value: String,
}

#[derive(Debug, Default)]
pub struct ConfigEditor {
    robot: Option<RobotId>,
    load: ConfigLoad,
    fields: Vec<ConfigField>,
    pending: HashMap<String, String>,
    /// Bumped on every sync; fields from an older session are gone
    sync_session: u64,
    next_apply: ApplyId,
    /// Survives re-syncs until its own finish arrives, so two runs never
    /// write at the same time
    active_apply: Option<ActiveApply>,

    /// Editor panel shown
    pub visible: bool,
    /// Highlighted field
    pub cursor: usize,
    /// Typing into the highlighted field
    pub editing: bool,
    /// Last apply failure, cleared on the next apply
    pub apply_error: Option<String>,
}

impl ConfigEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `robot`'s configuration. Drops fields and pending edits
    /// belonging to the previous robot. An apply still in flight keeps
    /// running and blocks new applies until it finishes.
    pub fn begin_sync(&mut self, robot: &str) {
        self.robot = Some(robot.to_string());
        self.load = ConfigLoad::Syncing;
        self.fields.clear();
        self.pending.clear();
        self.sync_session += 1;
        self.cursor = 0;
        self.editing = false;
        self.apply_error = None;
    }

    /// Install loaded values. Returns `false` when `robot` is no longer the
    /// robot being edited and the result was dropped.
    pub fn load_succeeded(&mut self, robot: &str, mut values: Vec<ConfigValue>) -> bool {
        if !self.is_for(robot) {
            return false;
        }
        sort_for_display(&mut values);
        self.fields = values.into_iter().map(ConfigField::new).collect();
        self.pending.clear();
        self.cursor = 0;
        self.load = ConfigLoad::Ready;
        true
    }

    /// Record a load failure. Returns `false` for stale results.
    pub fn load_failed(&mut self, robot: &str, message: String) -> bool {
        if !self.is_for(robot) {
            return false;
        }
        self.load = ConfigLoad::Failed(message);
        true
    }

    /// Set the typed text of field `id`
    pub fn edit(&mut self, id: &str, text: impl Into<String>) {
        let text = text.into();
        let Some(field) = self.fields.iter_mut().find(|f| f.synced.id == id) else {
            return;
        };
        field.invalid = !field.synced.accepts(&text);
        field.text = text;

        if field.is_dirty() {
            self.pending.insert(id.to_string(), field.text.clone());
        } else {
            self.pending.remove(id);
        }
    }

    /// Writes to send, in display order, tagged with the run's id. `None`
    /// while an apply is already running or when nothing is pending.
    pub fn begin_apply(&mut self) -> Option<(ApplyId, Vec<ConfigWrite>)> {
        if self.active_apply.is_some() || self.pending.is_empty() || self.robot.is_none() {
            return None;
        }
        let writes: Vec<ConfigWrite> = self
            .fields
            .iter()
            .filter_map(|f| {
                self.pending.get(f.id()).map(|value| ConfigWrite {
                    config: f.id().to_string(),
                    value: value.clone(),
                })
            })
            .collect();
        self.next_apply += 1;
        let id = self.next_apply;
        self.active_apply = Some(ActiveApply {
            id,
            sync: self.sync_session,
        });
        self.apply_error = None;
        Some((id, writes))
    }

    /// Whether results of run `apply` still belong to the fields on screen
    fn owns_fields(&self, apply: ApplyId) -> bool {
        self.active_apply
            .is_some_and(|a| a.id == apply && a.sync == self.sync_session)
    }

    /// One write was acknowledged
    pub fn write_succeeded(&mut self, apply: ApplyId, config: &str, value: &str) {
        if !self.owns_fields(apply) {
            return;
        }
        if let Some(field) = self.fields.iter_mut().find(|f| f.synced.id == config) {
            field.synced.value = value.to_string();
            if !field.is_dirty() {
                field.invalid = false;
                self.pending.remove(config);
            }
        }
    }

    /// One write failed. The field stays dirty until the apply completes.
    pub fn write_failed(&mut self, apply: ApplyId, config: &str, message: String) {
        if !self.owns_fields(apply) {
            return;
        }
        let name = self
            .fields
            .iter()
            .find(|f| f.synced.id == config)
            .map_or(config, |f| f.synced.name.as_str());
        self.apply_error = Some(format!("{name}: {message}"));
    }

    /// Every write of run `apply` has been attempted. Pending edits are
    /// cleared and fields whose write failed fall back to their synced value.
    /// A run started before the last sync only releases the apply lock.
    ///
    /// Returns `false` when `apply` is not the running apply.
    pub fn apply_finished(&mut self, apply: ApplyId) -> bool {
        if self.active_apply.map(|a| a.id) != Some(apply) {
            return false;
        }
        if self.owns_fields(apply) {
            for field in &mut self.fields {
                if field.is_dirty() {
                    field.revert();
                }
            }
            self.pending.clear();
        }
        self.active_apply = None;
        true
    }

    /// Revert every dirty field. Nothing is sent to the robot.
    pub fn discard(&mut self) {
        for field in &mut self.fields {
            field.revert();
        }
        self.pending.clear();
        self.editing = false;
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn robot(&self) -> Option<&str> {
        self.robot.as_deref()
    }

    fn is_for(&self, robot: &str) -> bool {
        self.robot.as_deref() == Some(robot)
    }

    pub fn load(&self) -> &ConfigLoad {
        &self.load
    }

    pub fn fields(&self) -> &[ConfigField] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|f| f.synced.id == id)
    }

    pub fn pending(&self) -> &HashMap<String, String> {
        &self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_applying(&self) -> bool {
        self.active_apply.is_some()
    }

    pub fn selected_field(&self) -> Option<&ConfigField> {
        self.fields.get(self.cursor)
    }

    // ─────────────────────────────────────────────────────────
    // Field navigation
    // ─────────────────────────────────────────────────────────

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.fields.len() {
            self.cursor += 1;
        }
    }
}

/// Numeric id order when every id is numeric, lexicographic otherwise
fn sort_for_display(values: &mut [ConfigValue]) {
    let all_numeric = values.iter().all(|v| v.id.parse::<u64>().is_ok());
    if all_numeric {
        values.sort_by_key(|v| v.id.parse::<u64>().unwrap_or(u64::MAX));
    } else {
        values.sort_by(|a, b| a.id.cmp(&b.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetmon_core::ConfigValueType;

    fn value(id: &str, name: &str, v: &str) -> ConfigValue {
        ConfigValue {
            id: id.to_string(),
            name: name.to_string(),
            value: v.to_string(),
            value_type: None,
        }
    }

    fn ready_editor() -> ConfigEditor {
        let mut editor = ConfigEditor::new();
        editor.begin_sync("1");
        editor.load_succeeded(
            "1",
            vec![
                value("10", "max_speed", "0.5"),
                value("2", "wheel_diameter", "60"),
                value("3", "name", "alpha"),
            ],
        );
        editor
    }

    #[test]
    fn test_begin_sync_clears_previous_robot() {
        let mut editor = ready_editor();
        editor.edit("2", "61");
        editor.begin_sync("2");
        assert_eq!(editor.load(), &ConfigLoad::Syncing);
        assert!(editor.fields().is_empty());
        assert!(!editor.has_pending());
    }

    #[test]
    fn test_numeric_ids_sorted_numerically() {
        let editor = ready_editor();
        let ids: Vec<_> = editor.fields().iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec!["2", "3", "10"]);
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let mut editor = ConfigEditor::new();
        editor.begin_sync("1");
        editor.begin_sync("2");
        assert!(!editor.load_succeeded("1", vec![value("1", "a", "1")]));
        assert!(!editor.load_failed("1", "gone".into()));
        assert_eq!(editor.load(), &ConfigLoad::Syncing);
    }

    #[test]
    fn test_load_failure() {
        let mut editor = ConfigEditor::new();
        editor.begin_sync("1");
        assert!(editor.load_failed("1", "retry budget exhausted".into()));
        assert_eq!(
            editor.load(),
            &ConfigLoad::Failed("retry budget exhausted".into())
        );
    }

    #[test]
    fn test_edit_back_to_synced_value_removes_pending() {
        let mut editor = ready_editor();
        editor.edit("2", "65");
        assert_eq!(editor.pending().get("2").map(String::as_str), Some("65"));
        assert!(editor.field("2").unwrap().is_dirty());

        editor.edit("2", "70");
        assert_eq!(editor.pending().get("2").map(String::as_str), Some("70"));

        editor.edit("2", "60");
        assert!(editor.pending().is_empty());
        assert!(!editor.field("2").unwrap().is_dirty());
    }

    #[test]
    fn test_edit_unknown_field_is_ignored() {
        let mut editor = ready_editor();
        editor.edit("99", "1");
        assert!(!editor.has_pending());
    }

    #[test]
    fn test_invalid_text_is_flagged_and_tracked() {
        let mut editor = ConfigEditor::new();
        editor.begin_sync("1");
        editor.load_succeeded(
            "1",
            vec![ConfigValue {
                value_type: Some(ConfigValueType::Integer),
                ..value("1", "retries", "3")
            }],
        );
        editor.edit("1", "three");
        let field = editor.field("1").unwrap();
        assert!(field.invalid);
        assert!(editor.has_pending());

        editor.edit("1", "4");
        assert!(!editor.field("1").unwrap().invalid);
    }

    #[test]
    fn test_apply_in_display_order() {
        let mut editor = ready_editor();
        editor.edit("10", "0.8");
        editor.edit("2", "65");

        let (_, writes) = editor.begin_apply().unwrap();
        assert_eq!(
            writes,
            vec![
                ConfigWrite {
                    config: "2".into(),
                    value: "65".into()
                },
                ConfigWrite {
                    config: "10".into(),
                    value: "0.8".into()
                },
            ]
        );
        assert!(editor.is_applying());
        assert!(editor.begin_apply().is_none());
    }

    #[test]
    fn test_apply_with_nothing_pending_is_ignored() {
        let mut editor = ready_editor();
        assert!(editor.begin_apply().is_none());
        assert!(!editor.is_applying());
    }

    #[test]
    fn test_apply_updates_values_and_clears_pending() {
        let mut editor = ready_editor();
        editor.edit("2", "65");
        editor.edit("3", "beta");
        let (apply, writes) = editor.begin_apply().unwrap();

        for w in &writes {
            editor.write_succeeded(apply, &w.config, &w.value);
        }
        assert!(editor.apply_finished(apply));

        assert!(!editor.has_pending());
        assert!(!editor.is_applying());
        assert_eq!(editor.field("2").unwrap().synced.value, "65");
        assert_eq!(editor.field("3").unwrap().synced.value, "beta");
        assert!(editor.fields().iter().all(|f| !f.is_dirty()));
    }

    #[test]
    fn test_failed_write_stays_dirty_until_completion() {
        let mut editor = ready_editor();
        editor.edit("2", "65");
        editor.edit("3", "beta");
        let (apply, _) = editor.begin_apply().unwrap();

        editor.write_failed(apply, "2", "rejected".into());
        assert!(editor.field("2").unwrap().is_dirty());
        assert_eq!(
            editor.apply_error.as_deref(),
            Some("wheel_diameter: rejected")
        );
        editor.write_succeeded(apply, "3", "beta");

        editor.apply_finished(apply);
        assert!(!editor.has_pending());
        let field = editor.field("2").unwrap();
        assert_eq!(field.synced.value, "60");
        assert_eq!(field.text, "60");
    }

    #[test]
    fn test_apply_survives_resync_and_blocks_second_apply() {
        let mut editor = ready_editor();
        editor.edit("2", "65");
        let (first, _) = editor.begin_apply().unwrap();

        // Operator leaves and comes back while the writes are in flight
        editor.begin_sync("2");
        editor.begin_sync("1");
        editor.load_succeeded(
            "1",
            vec![value("2", "wheel_diameter", "60"), value("3", "name", "alpha")],
        );
        editor.edit("2", "70");

        assert!(editor.is_applying());
        assert!(editor.begin_apply().is_none());

        // The old run's results must not touch the reloaded fields
        editor.write_succeeded(first, "2", "65");
        assert!(editor.apply_finished(first));

        assert!(!editor.is_applying());
        let field = editor.field("2").unwrap();
        assert_eq!(field.synced.value, "60");
        assert_eq!(field.text, "70");
        assert_eq!(editor.pending().get("2").map(String::as_str), Some("70"));

        let (second, writes) = editor.begin_apply().unwrap();
        assert_ne!(first, second);
        assert_eq!(writes.len(), 1);
    }

    #[test]
    fn test_finish_of_unknown_apply_is_ignored() {
        let mut editor = ready_editor();
        editor.edit("2", "65");
        let (apply, _) = editor.begin_apply().unwrap();

        assert!(!editor.apply_finished(apply + 1));
        assert!(editor.is_applying());
        assert!(editor.has_pending());
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut editor = ready_editor();
        editor.cursor_up();
        assert_eq!(editor.cursor, 0);
        for _ in 0..5 {
            editor.cursor_down();
        }
        assert_eq!(editor.selected_field().map(|f| f.id()), Some("10"));
    }

    #[test]
    fn test_discard_reverts_without_sending() {
        let mut editor = ready_editor();
        editor.edit("2", "65");
        editor.discard();
        assert!(!editor.has_pending());
        assert_eq!(editor.field("2").unwrap().text, "60");
    }
}
