//! Message types for the application (TEA pattern)

use fleetmon_api::{MoveDirection, RotateDirection};
use fleetmon_core::{
    ConfigValue, FleetSnapshot, RobotId, RobotMessage, ScenarioId, ScenarioInfo, ScenarioStatus,
};

use crate::config_editor::ApplyId;
use crate::input_key::InputKey;

/// All possible messages in the application.
///
/// Results from background tasks carry errors as display strings so that
/// messages stay `Clone`.
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from the terminal
    Key(InputKey),

    /// Leave the application
    Quit,

    // ─────────────────────────────────────────────────────────
    // Polling
    // ─────────────────────────────────────────────────────────
    /// Periodic fleet refresh
    FleetTick,
    /// Refresh the selected robot's messages
    MessagesTick,
    FleetReceived(Result<FleetSnapshot, String>),
    MessagesReceived {
        robot: RobotId,
        result: Result<Vec<RobotMessage>, String>,
    },

    // ─────────────────────────────────────────────────────────
    // Robot list and commands
    // ─────────────────────────────────────────────────────────
    CursorUp,
    CursorDown,
    /// Select the robot under the list cursor
    SelectCursorRobot,
    SelectRobot(RobotId),
    /// Replace the command amount text (digits only)
    CommandAmountInput {
        text: String,
    },
    StartAmountEdit,
    FinishAmountEdit,
    /// Move the selected robot. `None` uses the command amount.
    MoveRobot {
        millimeters: Option<u32>,
        direction: MoveDirection,
    },
    /// Rotate the selected robot. `None` uses the command amount.
    RotateRobot {
        degrees: Option<u32>,
        direction: RotateDirection,
    },

    // ─────────────────────────────────────────────────────────
    // Message log scrolling
    // ─────────────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,

    // ─────────────────────────────────────────────────────────
    // Config editor
    // ─────────────────────────────────────────────────────────
    OpenConfigEditor,
    CloseConfigEditor,
    ConfigCursorUp,
    ConfigCursorDown,
    ConfigStartEdit,
    ConfigStopEdit,
    ConfigFieldInput {
        config: String,
        text: String,
    },
    ConfigLoaded {
        robot: RobotId,
        result: Result<Vec<ConfigValue>, String>,
    },
    ApplyConfig,
    DiscardConfig,
    ConfigWriteCompleted {
        robot: RobotId,
        apply: ApplyId,
        config: String,
        value: String,
        result: Result<(), String>,
    },
    ConfigApplyFinished {
        robot: RobotId,
        apply: ApplyId,
    },
    StoreAndReboot,

    // ─────────────────────────────────────────────────────────
    // Scenarios
    // ─────────────────────────────────────────────────────────
    ScenariosReceived(Result<Vec<ScenarioId>, String>),
    NextScenario,
    PrevScenario,
    /// Make `scenario` the current choice
    ChooseScenario(ScenarioId),
    RequestScenarioInfo,
    ScenarioInfoReceived {
        scenario: ScenarioId,
        result: Result<ScenarioInfo, String>,
    },
    RunScenario,
    ScenarioStartResult {
        scenario: ScenarioId,
        result: Result<String, String>,
    },
    ScenarioStatusReceived {
        uuid: String,
        result: Result<ScenarioStatus, String>,
    },
}
