//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::{AppPhase, AppState, UiMode};

use super::{config, fleet, keys::handle_key, scenario, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Quit => {
            state.phase = AppPhase::Quitting;
            state.scenario.shutdown();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Polling
        // ─────────────────────────────────────────────────────────
        Message::FleetTick => fleet::handle_fleet_tick(state),
        Message::MessagesTick => fleet::handle_messages_tick(state),
        Message::FleetReceived(result) => fleet::handle_fleet_received(state, result),
        Message::MessagesReceived { robot, result } => {
            fleet::handle_messages_received(state, robot, result)
        }

        // ─────────────────────────────────────────────────────────
        // Robot list and commands
        // ─────────────────────────────────────────────────────────
        Message::CursorUp => {
            state.robot_list.cursor_up();
            UpdateResult::none()
        }
        Message::CursorDown => {
            state.robot_list.cursor_down();
            UpdateResult::none()
        }
        Message::SelectCursorRobot => match state.robot_list.cursor_id() {
            Some(id) => UpdateResult::message(Message::SelectRobot(id.clone())),
            None => UpdateResult::none(),
        },
        Message::SelectRobot(robot) => fleet::handle_select_robot(state, robot),
        Message::CommandAmountInput { text } => {
            state.command_amount = text.chars().filter(char::is_ascii_digit).collect();
            UpdateResult::none()
        }
        Message::StartAmountEdit => {
            state.ui_mode = UiMode::AmountEntry;
            UpdateResult::none()
        }
        Message::FinishAmountEdit => {
            state.ui_mode = UiMode::Normal;
            UpdateResult::none()
        }
        Message::MoveRobot {
            millimeters,
            direction,
        } => fleet::handle_move(state, millimeters, direction),
        Message::RotateRobot { degrees, direction } => {
            fleet::handle_rotate(state, degrees, direction)
        }

        // ─────────────────────────────────────────────────────────
        // Message log scrolling
        // ─────────────────────────────────────────────────────────
        Message::ScrollUp => {
            state.message_log.scroll_up(1);
            UpdateResult::none()
        }
        Message::ScrollDown => {
            state.message_log.scroll_down(1);
            UpdateResult::none()
        }
        Message::PageUp => {
            state.message_log.page_up();
            UpdateResult::none()
        }
        Message::PageDown => {
            state.message_log.page_down();
            UpdateResult::none()
        }
        Message::ScrollToTop => {
            state.message_log.scroll_to_top();
            UpdateResult::none()
        }
        Message::ScrollToBottom => {
            state.message_log.scroll_to_bottom();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Config editor
        // ─────────────────────────────────────────────────────────
        Message::OpenConfigEditor => config::handle_open(state),
        Message::CloseConfigEditor => config::handle_close(state),
        Message::ConfigCursorUp => {
            state.config_editor.cursor_up();
            UpdateResult::none()
        }
        Message::ConfigCursorDown => {
            state.config_editor.cursor_down();
            UpdateResult::none()
        }
        Message::ConfigStartEdit => {
            state.config_editor.editing = state.config_editor.selected_field().is_some();
            UpdateResult::none()
        }
        Message::ConfigStopEdit => {
            state.config_editor.editing = false;
            UpdateResult::none()
        }
        Message::ConfigFieldInput { config: id, text } => {
            state.config_editor.edit(&id, text);
            UpdateResult::none()
        }
        Message::ConfigLoaded { robot, result } => config::handle_loaded(state, robot, result),
        Message::ApplyConfig => config::handle_apply(state),
        Message::DiscardConfig => {
            state.config_editor.discard();
            UpdateResult::none()
        }
        Message::ConfigWriteCompleted {
            robot,
            apply,
            config: id,
            value,
            result,
        } => config::handle_write_completed(state, robot, apply, id, value, result),
        Message::ConfigApplyFinished { robot, apply } => {
            config::handle_apply_finished(state, robot, apply)
        }
        Message::StoreAndReboot => config::handle_store_and_reboot(state),

        // ─────────────────────────────────────────────────────────
        // Scenarios
        // ─────────────────────────────────────────────────────────
        Message::ScenariosReceived(result) => scenario::handle_scenarios_received(state, result),
        Message::NextScenario => scenario::handle_cycle(state, true),
        Message::PrevScenario => scenario::handle_cycle(state, false),
        Message::ChooseScenario(id) => scenario::handle_choose(state, id),
        Message::RequestScenarioInfo => scenario::handle_request_info(state),
        Message::ScenarioInfoReceived { scenario: id, result } => {
            scenario::handle_info_received(state, id, result)
        }
        Message::RunScenario => scenario::handle_run(state),
        Message::ScenarioStartResult {
            scenario: id,
            result,
        } => scenario::handle_start_result(state, id, result),
        Message::ScenarioStatusReceived { uuid, result } => {
            scenario::handle_status_received(state, uuid, result)
        }
    }
}
