//! Application state (Model in TEA pattern)

use fleetmon_core::{FleetSnapshot, Pose, RobotId, RobotSnapshot};

use crate::config::Settings;
use crate::config_editor::ConfigEditor;
use crate::message_log::MessageLog;
use crate::robot_list::RobotList;
use crate::scenario::ScenarioRunner;

/// Which keys are being captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Normal,
    /// Typing the command amount
    AmountEntry,
    /// Config editor panel open
    ConfigEditor,
}

/// Lifecycle of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line notice for the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,
    pub phase: AppPhase,
    pub ui_mode: UiMode,

    /// Last fleet snapshot from the controller
    pub fleet: FleetSnapshot,
    /// At least one fleet poll has succeeded
    pub fleet_loaded: bool,
    /// Last fleet poll error, cleared on success
    pub fleet_error: Option<String>,
    pub robot_list: RobotList,

    /// Robot chosen by the operator. Kept even when it drops out of the fleet.
    pub selected: Option<RobotId>,

    pub message_log: MessageLog,
    pub config_editor: ConfigEditor,
    pub scenario: ScenarioRunner,

    /// Distance (mm) or angle (deg) for movement commands
    pub command_amount: String,

    /// Requests in flight, one per polled resource
    pub fleet_in_flight: bool,
    pub messages_in_flight: bool,

    pub notice: Option<Notice>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            message_log: MessageLog::new(settings.ui.message_log_max_groups),
            command_amount: settings.ui.default_command_amount.clone(),
            settings,
            phase: AppPhase::default(),
            ui_mode: UiMode::default(),
            fleet: FleetSnapshot::new(),
            fleet_loaded: false,
            fleet_error: None,
            robot_list: RobotList::new(),
            selected: None,
            config_editor: ConfigEditor::new(),
            scenario: ScenarioRunner::new(),
            fleet_in_flight: false,
            messages_in_flight: false,
            notice: None,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    /// Snapshot of the selected robot, if it is still in the fleet
    pub fn selected_robot(&self) -> Option<&RobotSnapshot> {
        self.selected.as_deref().and_then(|id| self.fleet.get(id))
    }

    /// Selected robot's pose rounded for display, `None` when offline
    pub fn selected_pose(&self) -> Option<Pose> {
        self.selected_robot().map(|r| r.pose.rounded())
    }

    /// Command amount as a number, `None` when empty or out of range
    pub fn command_amount_value(&self) -> Option<u32> {
        self.command_amount.parse().ok()
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        });
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        });
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetmon_api::test_utils::test_robot;

    #[test]
    fn test_new_state_uses_settings() {
        let mut settings = Settings::default();
        settings.ui.default_command_amount = "250".into();
        let state = AppState::with_settings(settings);
        assert_eq!(state.command_amount, "250");
        assert_eq!(state.command_amount_value(), Some(250));
        assert_eq!(state.ui_mode, UiMode::Normal);
        assert!(!state.should_quit());
    }

    #[test]
    fn test_selected_pose_offline() {
        let mut state = AppState::new();
        state.selected = Some("4".into());
        assert!(state.selected_pose().is_none());

        let mut robot = test_robot("4", "IDLE");
        robot.pose = Pose::new(1.004, 2.0, 3.333);
        state.fleet = FleetSnapshot::from_robots([robot]);
        assert_eq!(state.selected_pose(), Some(Pose::new(1.0, 2.0, 3.33)));
    }

    #[test]
    fn test_empty_amount_has_no_value() {
        let mut state = AppState::new();
        state.command_amount.clear();
        assert_eq!(state.command_amount_value(), None);
    }
}
