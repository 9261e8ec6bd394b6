//! Key event handlers for different UI modes

use fleetmon_api::{MoveDirection, RotateDirection};

use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, UiMode};

/// Convert key events to messages based on current UI mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Force quit works everywhere
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }

    match state.ui_mode {
        UiMode::Normal => handle_key_normal(key),
        UiMode::AmountEntry => handle_key_amount_entry(state, key),
        UiMode::ConfigEditor if state.config_editor.editing => {
            handle_key_config_field(state, key)
        }
        UiMode::ConfigEditor => handle_key_config_editor(key),
    }
}

fn handle_key_normal(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') | InputKey::Esc => Some(Message::Quit),

        // Robot list
        InputKey::Up | InputKey::Char('k') => Some(Message::CursorUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::CursorDown),
        InputKey::Enter => Some(Message::SelectCursorRobot),

        // Movement
        InputKey::Char('w') => Some(Message::MoveRobot {
            millimeters: None,
            direction: MoveDirection::Forward,
        }),
        InputKey::Char('s') => Some(Message::MoveRobot {
            millimeters: None,
            direction: MoveDirection::Backward,
        }),
        InputKey::Char('a') => Some(Message::RotateRobot {
            degrees: None,
            direction: RotateDirection::Left,
        }),
        InputKey::Char('d') => Some(Message::RotateRobot {
            degrees: None,
            direction: RotateDirection::Right,
        }),
        InputKey::Char('m') => Some(Message::StartAmountEdit),

        // Scenarios
        InputKey::Char('[') => Some(Message::PrevScenario),
        InputKey::Char(']') => Some(Message::NextScenario),
        InputKey::Char('i') => Some(Message::RequestScenarioInfo),
        InputKey::Char('t') => Some(Message::RunScenario),

        InputKey::Char('c') => Some(Message::OpenConfigEditor),

        // Message log
        InputKey::PageUp => Some(Message::PageUp),
        InputKey::PageDown => Some(Message::PageDown),
        InputKey::Home => Some(Message::ScrollToTop),
        InputKey::End => Some(Message::ScrollToBottom),

        _ => None,
    }
}

fn handle_key_amount_entry(state: &AppState, key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter | InputKey::Esc => Some(Message::FinishAmountEdit),
        InputKey::Backspace => {
            let mut text = state.command_amount.clone();
            text.pop();
            Some(Message::CommandAmountInput { text })
        }
        key => key.digit().map(|c| {
            let mut text = state.command_amount.clone();
            text.push(c);
            Message::CommandAmountInput { text }
        }),
    }
}

fn handle_key_config_editor(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc | InputKey::Char('c' | 'q') => Some(Message::CloseConfigEditor),
        InputKey::Up | InputKey::Char('k') => Some(Message::ConfigCursorUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::ConfigCursorDown),
        InputKey::Enter => Some(Message::ConfigStartEdit),
        InputKey::Char('a') => Some(Message::ApplyConfig),
        InputKey::Char('u') => Some(Message::DiscardConfig),
        InputKey::Char('S') => Some(Message::StoreAndReboot),
        _ => None,
    }
}

/// Typing into the highlighted config field
fn handle_key_config_field(state: &AppState, key: InputKey) -> Option<Message> {
    let field = state.config_editor.selected_field()?;
    match key {
        InputKey::Enter | InputKey::Esc => Some(Message::ConfigStopEdit),
        InputKey::Backspace => {
            let mut text = field.text.clone();
            text.pop();
            Some(Message::ConfigFieldInput {
                config: field.id().to_string(),
                text,
            })
        }
        InputKey::CharCtrl('u') => Some(Message::ConfigFieldInput {
            config: field.id().to_string(),
            text: String::new(),
        }),
        InputKey::Char(c) => {
            let mut text = field.text.clone();
            text.push(c);
            Some(Message::ConfigFieldInput {
                config: field.id().to_string(),
                text,
            })
        }
        _ => None,
    }
}
