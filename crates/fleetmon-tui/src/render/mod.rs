//! Main render/view function (View in TEA pattern)


use fleetmon_app::{AppState, UiMode};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::theme::palette;
use crate::widgets::{
    ConfigModal, LinkStatus, MainHeader, MessageLogView, RobotInfo, RobotListPanel, ScenarioPanel,
    StatusBar,
};
use crate::layout;

/// Render the complete UI
///
/// Pure with respect to `state`; scroll and cursor positions are read, never
/// adjusted here.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let areas = layout::create(area);

    frame.render_widget(
        MainHeader::new(&state.settings.api.base_url, LinkStatus::from_state(state)),
        areas.header,
    );
    frame.render_widget(
        RobotListPanel::new(&state.robot_list).focused(state.ui_mode == UiMode::Normal),
        areas.robots,
    );
    frame.render_widget(RobotInfo::new(state), areas.robot_info);
    frame.render_widget(MessageLogView::new(&state.message_log), areas.messages);
    frame.render_widget(ScenarioPanel::new(&state.scenario), areas.scenario);
    frame.render_widget(StatusBar::new(state), areas.status);

    // Modal goes last so it covers the panels
    if state.config_editor.visible {
        frame.render_widget(ConfigModal::new(&state.config_editor), area);
    }
}
