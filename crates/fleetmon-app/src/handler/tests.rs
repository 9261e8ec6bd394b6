//! Tests for handler module

use super::*;
use crate::config_editor::ConfigLoad;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::scenario::{RunState, LABEL_ERRORED, LABEL_FINISHED};
use crate::state::{AppPhase, AppState, NoticeLevel, UiMode};
use fleetmon_api::test_utils::{running_status, test_config_value, test_fleet, test_robot};
use fleetmon_core::{
    FleetSnapshot, MessageKind, ResultRow, RobotMessage, ScenarioResult, ScenarioStatus,
};
use serde_json::json;

/// State with a loaded fleet and robot `selected` chosen
fn state_with_selection(ids: &[&str], selected: &str) -> AppState {
    let mut state = AppState::new();
    update(&mut state, Message::FleetReceived(Ok(test_fleet(ids))));
    update(&mut state, Message::SelectRobot(selected.to_string()));
    state
}

fn message(kind: MessageKind, id: &str, text: &str) -> RobotMessage {
    RobotMessage {
        kind,
        message_id: id.to_string(),
        category: "motion".to_string(),
        text: text.to_string(),
    }
}

/// State with a running scenario `u-1`; returns the poller's cancel receiver
fn state_with_running_scenario() -> (AppState, tokio::sync::watch::Receiver<bool>) {
    let mut state = state_with_selection(&["1"], "1");
    update(
        &mut state,
        Message::ScenariosReceived(Ok(vec!["spin".to_string()])),
    );
    update(&mut state, Message::RunScenario);
    let result = update(
        &mut state,
        Message::ScenarioStartResult {
            scenario: "spin".into(),
            result: Ok("u-1".into()),
        },
    );
    match result.action {
        Some(UpdateAction::StartScenarioPoller { uuid, cancel_rx }) => {
            assert_eq!(uuid, "u-1");
            (state, cancel_rx)
        }
        other => panic!("expected poller start, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────

#[test]
fn test_quit_message_sets_quitting_phase() {
    let mut state = AppState::new();
    assert_ne!(state.phase, AppPhase::Quitting);

    update(&mut state, Message::Quit);

    assert!(state.should_quit());
}

#[test]
fn test_quit_cancels_scenario_poller() {
    let (mut state, cancel_rx) = state_with_running_scenario();

    update(&mut state, Message::Quit);

    assert!(*cancel_rx.borrow());
}

// ─────────────────────────────────────────────────────────
// Fleet polling and reconciliation
// ─────────────────────────────────────────────────────────

#[test]
fn test_fleet_tick_skips_fetch_while_in_flight() {
    let mut state = AppState::new();

    let first = update(&mut state, Message::FleetTick);
    assert!(matches!(first.action, Some(UpdateAction::FetchFleet)));
    assert!(matches!(first.message, Some(Message::MessagesTick)));

    let second = update(&mut state, Message::FleetTick);
    assert!(second.action.is_none());

    update(&mut state, Message::FleetReceived(Ok(test_fleet(&["1"]))));
    let third = update(&mut state, Message::FleetTick);
    assert!(matches!(third.action, Some(UpdateAction::FetchFleet)));
}

#[test]
fn test_messages_tick_needs_selection() {
    let mut state = AppState::new();
    assert!(update(&mut state, Message::MessagesTick).action.is_none());

    let mut state = state_with_selection(&["1"], "1");
    match update(&mut state, Message::MessagesTick).action {
        Some(UpdateAction::FetchMessages { robot }) => assert_eq!(robot, "1"),
        other => panic!("unexpected action: {other:?}"),
    }
    assert!(update(&mut state, Message::MessagesTick).action.is_none());
}

#[test]
fn test_same_id_set_only_refreshes_status() {
    let mut state = AppState::new();
    update(&mut state, Message::FleetReceived(Ok(test_fleet(&["1", "2"]))));
    let rebuilds = state.robot_list.rebuild_count();

    let reordered = FleetSnapshot::from_robots([test_robot("2", "MOVING"), test_robot("1", "IDLE")]);
    update(&mut state, Message::FleetReceived(Ok(reordered)));

    assert_eq!(state.robot_list.rebuild_count(), rebuilds);
    assert_eq!(state.robot_list.rows()[1].status_text, "MOVING");
}

#[test]
fn test_new_id_set_rebuilds_and_keeps_active_marker() {
    let mut state = state_with_selection(&["1", "2"], "2");
    let rebuilds = state.robot_list.rebuild_count();

    update(
        &mut state,
        Message::FleetReceived(Ok(test_fleet(&["1", "2", "3"]))),
    );

    assert_eq!(state.robot_list.rebuild_count(), rebuilds + 1);
    let active: Vec<_> = state
        .robot_list
        .rows()
        .iter()
        .filter(|r| r.active)
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(active, vec!["2"]);
}

#[test]
fn test_fleet_error_keeps_last_snapshot() {
    let mut state = AppState::new();
    update(&mut state, Message::FleetReceived(Ok(test_fleet(&["1"]))));

    update(&mut state, Message::FleetReceived(Err("connection refused".into())));

    assert!(state.fleet.contains("1"));
    assert_eq!(state.fleet_error.as_deref(), Some("connection refused"));

    update(&mut state, Message::FleetReceived(Ok(test_fleet(&["1"]))));
    assert!(state.fleet_error.is_none());
}

// ─────────────────────────────────────────────────────────
// Selection and messages
// ─────────────────────────────────────────────────────────

#[test]
fn test_select_robot_starts_config_sync() {
    let mut state = AppState::new();
    update(&mut state, Message::FleetReceived(Ok(test_fleet(&["1", "2"]))));

    let result = update(&mut state, Message::SelectRobot("2".into()));

    assert!(matches!(
        result.action,
        Some(UpdateAction::SyncConfig { ref robot }) if robot == "2"
    ));
    assert_eq!(state.selected.as_deref(), Some("2"));
    assert_eq!(state.config_editor.load(), &ConfigLoad::Syncing);
}

#[test]
fn test_reselecting_same_robot_is_noop() {
    let mut state = state_with_selection(&["1"], "1");
    update(
        &mut state,
        Message::MessagesReceived {
            robot: "1".into(),
            result: Ok(vec![message(MessageKind::Command, "1", "go")]),
        },
    );

    let result = update(&mut state, Message::SelectRobot("1".into()));

    assert!(result.action.is_none());
    assert!(!state.message_log.is_empty());
}

#[test]
fn test_selecting_unknown_robot_is_rejected() {
    let mut state = state_with_selection(&["1"], "1");

    let result = update(&mut state, Message::SelectRobot("9".into()));

    assert!(result.action.is_none());
    assert_eq!(state.selected.as_deref(), Some("1"));
    assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
}

#[test]
fn test_messages_for_previous_robot_are_dropped() {
    let mut state = state_with_selection(&["1", "2"], "1");
    update(&mut state, Message::SelectRobot("2".into()));

    update(
        &mut state,
        Message::MessagesReceived {
            robot: "1".into(),
            result: Ok(vec![message(MessageKind::Command, "1", "late")]),
        },
    );

    assert!(state.message_log.is_empty());
}

#[test]
fn test_message_groups_follow_kind_runs() {
    let mut state = state_with_selection(&["1"], "1");

    update(
        &mut state,
        Message::MessagesReceived {
            robot: "1".into(),
            result: Ok(vec![
                message(MessageKind::Command, "1", "a"),
                message(MessageKind::Command, "2", "b"),
                message(MessageKind::Response, "3", "c"),
                message(MessageKind::Command, "4", "d"),
            ]),
        },
    );

    assert_eq!(state.message_log.groups().len(), 3);
}

// ─────────────────────────────────────────────────────────
// Movement
// ─────────────────────────────────────────────────────────

#[test]
fn test_move_uses_command_amount() {
    let mut state = state_with_selection(&["1"], "1");
    update(&mut state, Message::CommandAmountInput { text: "250".into() });

    let result = update(
        &mut state,
        Message::MoveRobot {
            millimeters: None,
            direction: MoveDirection::Backward,
        },
    );

    assert!(matches!(
        result.action,
        Some(UpdateAction::MoveRobot {
            millimeters: 250,
            direction: MoveDirection::Backward,
            ..
        })
    ));
}

#[test]
fn test_rotate_without_amount_reports_error() {
    let mut state = state_with_selection(&["1"], "1");
    update(&mut state, Message::CommandAmountInput { text: String::new() });

    let result = update(
        &mut state,
        Message::RotateRobot {
            degrees: None,
            direction: RotateDirection::Left,
        },
    );

    assert!(result.action.is_none());
    assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
}

#[test]
fn test_amount_input_keeps_digits_only() {
    let mut state = AppState::new();
    update(&mut state, Message::CommandAmountInput { text: "1a2-3".into() });
    assert_eq!(state.command_amount, "123");
}

#[test]
fn test_commands_without_selection_do_nothing() {
    let mut state = AppState::new();
    let result = update(
        &mut state,
        Message::MoveRobot {
            millimeters: Some(10),
            direction: MoveDirection::Forward,
        },
    );
    assert!(result.action.is_none());
}

// ─────────────────────────────────────────────────────────
// Config editor
// ─────────────────────────────────────────────────────────

fn state_with_config() -> AppState {
    let mut state = state_with_selection(&["1"], "1");
    update(
        &mut state,
        Message::ConfigLoaded {
            robot: "1".into(),
            result: Ok(vec![
                test_config_value("2", "speed", "5"),
                test_config_value("1", "name", "r1"),
            ]),
        },
    );
    state
}

#[test]
fn test_editing_back_to_synced_value_clears_pending() {
    let mut state = state_with_config();

    update(
        &mut state,
        Message::ConfigFieldInput {
            config: "2".into(),
            text: "7".into(),
        },
    );
    assert_eq!(
        state.config_editor.pending().get("2").map(String::as_str),
        Some("7")
    );

    update(
        &mut state,
        Message::ConfigFieldInput {
            config: "2".into(),
            text: "5".into(),
        },
    );
    assert!(!state.config_editor.has_pending());
}

#[test]
fn test_apply_writes_in_display_order_and_clears_pending() {
    let mut state = state_with_config();
    update(
        &mut state,
        Message::ConfigFieldInput {
            config: "2".into(),
            text: "9".into(),
        },
    );
    update(
        &mut state,
        Message::ConfigFieldInput {
            config: "1".into(),
            text: "r2".into(),
        },
    );

    let result = update(&mut state, Message::ApplyConfig);
    let (apply, writes) = match result.action {
        Some(UpdateAction::ApplyConfig {
            robot,
            apply,
            writes,
        }) => {
            assert_eq!(robot, "1");
            (apply, writes)
        }
        other => panic!("unexpected action: {other:?}"),
    };
    let ids: Vec<_> = writes.iter().map(|w| w.config.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);

    for w in &writes {
        update(
            &mut state,
            Message::ConfigWriteCompleted {
                robot: "1".into(),
                apply,
                config: w.config.clone(),
                value: w.value.clone(),
                result: Ok(()),
            },
        );
    }
    update(
        &mut state,
        Message::ConfigApplyFinished {
            robot: "1".into(),
            apply,
        },
    );

    assert!(!state.config_editor.has_pending());
    assert!(!state.config_editor.is_applying());
    assert_eq!(
        state.config_editor.field("2").map(|f| f.synced.value.as_str()),
        Some("9")
    );
    assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Info));
}

#[test]
fn test_failed_write_is_reported() {
    let mut state = state_with_config();
    update(
        &mut state,
        Message::ConfigFieldInput {
            config: "2".into(),
            text: "9".into(),
        },
    );
    let apply = match update(&mut state, Message::ApplyConfig).action {
        Some(UpdateAction::ApplyConfig { apply, .. }) => apply,
        other => panic!("unexpected action: {other:?}"),
    };

    update(
        &mut state,
        Message::ConfigWriteCompleted {
            robot: "1".into(),
            apply,
            config: "2".into(),
            value: "9".into(),
            result: Err("HTTP 500".into()),
        },
    );
    update(
        &mut state,
        Message::ConfigApplyFinished {
            robot: "1".into(),
            apply,
        },
    );

    assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
    assert_eq!(
        state.config_editor.field("2").map(|f| f.synced.value.as_str()),
        Some("5")
    );
}

#[test]
fn test_apply_results_from_before_reselect_leave_new_edits_alone() {
    let mut state = state_with_selection(&["1", "2"], "1");
    update(
        &mut state,
        Message::ConfigLoaded {
            robot: "1".into(),
            result: Ok(vec![test_config_value("2", "speed", "5")]),
        },
    );
    update(
        &mut state,
        Message::ConfigFieldInput {
            config: "2".into(),
            text: "9".into(),
        },
    );
    let old = match update(&mut state, Message::ApplyConfig).action {
        Some(UpdateAction::ApplyConfig { apply, .. }) => apply,
        other => panic!("unexpected action: {other:?}"),
    };

    // Away to robot 2 and back to robot 1 while the write is in flight
    update(&mut state, Message::SelectRobot("2".into()));
    update(&mut state, Message::SelectRobot("1".into()));
    update(
        &mut state,
        Message::ConfigLoaded {
            robot: "1".into(),
            result: Ok(vec![test_config_value("2", "speed", "5")]),
        },
    );
    update(
        &mut state,
        Message::ConfigFieldInput {
            config: "2".into(),
            text: "7".into(),
        },
    );

    // Still locked until the old run reports back
    assert!(update(&mut state, Message::ApplyConfig).action.is_none());
    assert!(state.config_editor.is_applying());

    update(
        &mut state,
        Message::ConfigWriteCompleted {
            robot: "1".into(),
            apply: old,
            config: "2".into(),
            value: "9".into(),
            result: Ok(()),
        },
    );
    update(
        &mut state,
        Message::ConfigApplyFinished {
            robot: "1".into(),
            apply: old,
        },
    );

    let field = state.config_editor.field("2").expect("field 2");
    assert_eq!(field.synced.value, "5");
    assert_eq!(field.text, "7");
    assert_eq!(
        state.config_editor.pending().get("2").map(String::as_str),
        Some("7")
    );
    assert!(!state.config_editor.is_applying());

    match update(&mut state, Message::ApplyConfig).action {
        Some(UpdateAction::ApplyConfig { apply, writes, .. }) => {
            assert_ne!(apply, old);
            assert_eq!(writes.len(), 1);
            assert_eq!(writes[0].value, "7");
        }
        other => panic!("unexpected action: {other:?}"),
    }
}

#[test]
fn test_config_for_previous_robot_is_ignored() {
    let mut state = state_with_selection(&["1", "2"], "1");
    update(&mut state, Message::SelectRobot("2".into()));

    update(
        &mut state,
        Message::ConfigLoaded {
            robot: "1".into(),
            result: Ok(vec![test_config_value("1", "speed", "5")]),
        },
    );

    assert_eq!(state.config_editor.load(), &ConfigLoad::Syncing);
    assert!(state.config_editor.fields().is_empty());
}

#[test]
fn test_config_load_failure_lifts_loading_state() {
    let mut state = state_with_selection(&["1"], "1");

    update(
        &mut state,
        Message::ConfigLoaded {
            robot: "1".into(),
            result: Err("not ready after 10 attempts".into()),
        },
    );

    assert!(matches!(state.config_editor.load(), ConfigLoad::Failed(_)));
    assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
}

// ─────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────

#[test]
fn test_scenarios_received_requests_info_for_first() {
    let mut state = AppState::new();

    let result = update(
        &mut state,
        Message::ScenariosReceived(Ok(vec!["a".into(), "b".into()])),
    );
    assert!(matches!(result.message, Some(Message::RequestScenarioInfo)));

    let result = update(&mut state, Message::RequestScenarioInfo);
    assert!(matches!(
        result.action,
        Some(UpdateAction::FetchScenarioInfo { ref scenario }) if scenario == "a"
    ));
}

#[test]
fn test_run_without_robot_is_ignored() {
    let mut state = AppState::new();
    update(&mut state, Message::ScenariosReceived(Ok(vec!["a".into()])));

    let result = update(&mut state, Message::RunScenario);

    assert!(result.action.is_none());
    assert!(matches!(state.scenario.state(), RunState::Idle));
}

#[test]
fn test_progress_updates_percent() {
    let (mut state, _cancel_rx) = state_with_running_scenario();

    update(
        &mut state,
        Message::ScenarioStatusReceived {
            uuid: "u-1".into(),
            result: Ok(running_status(35)),
        },
    );

    assert_eq!(state.scenario.percent, 35);
}

#[test]
fn test_finished_success_stops_poller_and_shows_table() {
    let (mut state, cancel_rx) = state_with_running_scenario();

    update(
        &mut state,
        Message::ScenarioStatusReceived {
            uuid: "u-1".into(),
            result: Ok(ScenarioStatus {
                percent_complete: 100,
                finished: true,
                success: true,
                result: ScenarioResult::from_json(&json!({ "laps": [1, 2], "avg": 1.5 })),
            }),
        },
    );

    assert!(*cancel_rx.borrow());
    let table = state.scenario.result_table().expect("result table");
    assert_eq!(table.rows.len(), 2);
    assert!(table.rows.contains(&ResultRow {
        key: "avg".into(),
        values: vec!["1.5".into()],
    }));
    assert_eq!(state.notice.as_ref().map(|n| n.text.as_str()), Some(LABEL_FINISHED));
}

#[test]
fn test_finished_failure_sets_error_flag() {
    let (mut state, cancel_rx) = state_with_running_scenario();

    update(
        &mut state,
        Message::ScenarioStatusReceived {
            uuid: "u-1".into(),
            result: Ok(ScenarioStatus {
                percent_complete: 80,
                finished: true,
                success: false,
                result: ScenarioResult::default(),
            }),
        },
    );

    assert!(*cancel_rx.borrow());
    assert!(state.scenario.error_flag);
    assert!(state.scenario.result_table().is_none());
    assert_eq!(state.notice.as_ref().map(|n| n.text.as_str()), Some(LABEL_ERRORED));
}

#[test]
fn test_status_for_other_run_is_ignored() {
    let (mut state, cancel_rx) = state_with_running_scenario();

    update(
        &mut state,
        Message::ScenarioStatusReceived {
            uuid: "u-0".into(),
            result: Ok(ScenarioStatus {
                percent_complete: 100,
                finished: true,
                success: true,
                result: ScenarioResult::default(),
            }),
        },
    );

    assert!(!*cancel_rx.borrow());
    assert_eq!(state.scenario.active_uuid(), Some("u-1"));
}

#[test]
fn test_start_failure_returns_to_idle() {
    let mut state = state_with_selection(&["1"], "1");
    update(&mut state, Message::ScenariosReceived(Ok(vec!["spin".into()])));
    update(&mut state, Message::RunScenario);

    let result = update(
        &mut state,
        Message::ScenarioStartResult {
            scenario: "spin".into(),
            result: Err("Robot is busy".into()),
        },
    );

    assert!(result.action.is_none());
    assert!(matches!(state.scenario.state(), RunState::Idle));
    assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
}

// ─────────────────────────────────────────────────────────
// Key handling
// ─────────────────────────────────────────────────────────

#[test]
fn test_q_key_quits_in_normal_mode() {
    let state = AppState::new();
    assert!(matches!(
        handle_key(&state, InputKey::Char('q')),
        Some(Message::Quit)
    ));
}

#[test]
fn test_ctrl_c_quits_everywhere() {
    let mut state = AppState::new();
    state.ui_mode = UiMode::ConfigEditor;
    assert!(matches!(
        handle_key(&state, InputKey::CharCtrl('c')),
        Some(Message::Quit)
    ));
}

#[test]
fn test_amount_entry_appends_digits() {
    let mut state = AppState::new();
    state.command_amount = "12".into();
    state.ui_mode = UiMode::AmountEntry;

    match handle_key(&state, InputKey::Char('3')) {
        Some(Message::CommandAmountInput { text }) => assert_eq!(text, "123"),
        other => panic!("unexpected message: {other:?}"),
    }
    assert!(handle_key(&state, InputKey::Char('x')).is_none());
}

#[test]
fn test_config_field_typing_sends_full_text() {
    let mut state = state_with_config();
    update(&mut state, Message::OpenConfigEditor);
    update(&mut state, Message::ConfigCursorDown);
    update(&mut state, Message::ConfigStartEdit);
    assert!(state.config_editor.editing);

    match handle_key(&state, InputKey::Char('0')) {
        Some(Message::ConfigFieldInput { config, text }) => {
            assert_eq!(config, "2");
            assert_eq!(text, "50");
        }
        other => panic!("unexpected message: {other:?}"),
    }
    assert!(matches!(
        handle_key(&state, InputKey::Esc),
        Some(Message::ConfigStopEdit)
    ));
}

#[test]
fn test_config_editor_escape_closes() {
    let mut state = AppState::new();
    update(&mut state, Message::OpenConfigEditor);
    assert_eq!(state.ui_mode, UiMode::ConfigEditor);

    let msg = handle_key(&state, InputKey::Esc).expect("message");
    update(&mut state, msg);

    assert_eq!(state.ui_mode, UiMode::Normal);
    assert!(!state.config_editor.visible);
}
