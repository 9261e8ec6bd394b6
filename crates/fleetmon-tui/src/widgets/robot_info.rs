//! Selected robot panel: pose, status, and the command amount

use fleetmon_app::{AppState, UiMode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

pub struct RobotInfo<'a> {
    state: &'a AppState,
}

impl<'a> RobotInfo<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn amount_line(&self) -> Line<'a> {
        let editing = self.state.ui_mode == UiMode::AmountEntry;
        let value = if editing {
            format!("{}▏", self.state.command_amount)
        } else if self.state.command_amount.is_empty() {
            "-".to_string()
        } else {
            self.state.command_amount.clone()
        };
        Line::from(vec![
            Span::styled("Amount ", styles::text_muted()),
            Span::styled(
                value,
                if editing {
                    styles::accent_bold()
                } else {
                    styles::text_primary()
                },
            ),
            Span::styled("  [m]", styles::keybinding()),
        ])
    }
}

impl Widget for RobotInfo<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block("Robot", false);
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(selected) = self.state.selected.as_deref() else {
            Paragraph::new(vec![
                Line::styled("No robot selected", styles::text_muted()),
                Line::styled("[Enter] select", styles::keybinding()),
            ])
            .render(inner, buf);
            return;
        };

        let mut lines = vec![Line::from(vec![
            Span::styled("Robot ", styles::text_muted()),
            Span::styled(selected.to_string(), styles::accent_bold()),
        ])];

        match (self.state.selected_pose(), self.state.selected_robot()) {
            (Some(pose), Some(robot)) => {
                lines.push(Line::from(vec![
                    Span::styled("x ", styles::text_muted()),
                    Span::styled(format!("{:.2}", pose.x), styles::text_primary()),
                    Span::styled("  y ", styles::text_muted()),
                    Span::styled(format!("{:.2}", pose.y), styles::text_primary()),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("angle ", styles::text_muted()),
                    Span::styled(format!("{:.2}", pose.angle), styles::text_primary()),
                ]));
                lines.push(Line::styled(robot.status_text.clone(), styles::text_secondary()));
            }
            _ => {
                lines.push(Line::styled("offline", styles::error()));
                lines.push(Line::default());
                lines.push(Line::default());
            }
        }

        lines.push(self.amount_line());
        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{state_with_fleet, TestTerminal};
    use fleetmon_app::Message;
    use fleetmon_core::{FleetSnapshot, Pose, RobotSnapshot};

    #[test]
    fn test_no_selection_placeholder() {
        let state = state_with_fleet(&["1"], None);
        let mut term = TestTerminal::with_size(32, 7);

        term.render_widget(RobotInfo::new(&state), term.area());

        assert!(term.buffer_contains("No robot selected"));
    }

    #[test]
    fn test_pose_is_rounded_to_two_decimals() {
        let mut state = state_with_fleet(&["1"], Some("1"));
        let fleet = FleetSnapshot::from_robots([RobotSnapshot {
            id: "1".into(),
            pose: Pose::new(1.23456, -2.0, 90.129),
            status_text: "MOVING".into(),
        }]);
        fleetmon_app::handler::update(&mut state, Message::FleetReceived(Ok(fleet)));
        let mut term = TestTerminal::with_size(32, 7);

        term.render_widget(RobotInfo::new(&state), term.area());

        assert!(term.buffer_contains("x 1.23  y -2.00"));
        assert!(term.buffer_contains("angle 90.13"));
        assert!(term.buffer_contains("MOVING"));
    }

    #[test]
    fn test_missing_robot_shows_offline_and_keeps_selection() {
        let mut state = state_with_fleet(&["1", "2"], Some("2"));
        fleetmon_app::handler::update(
            &mut state,
            Message::FleetReceived(Ok(fleetmon_api::test_utils::test_fleet(&["1"]))),
        );
        let mut term = TestTerminal::with_size(32, 7);

        term.render_widget(RobotInfo::new(&state), term.area());

        assert!(term.buffer_contains("Robot 2"));
        assert!(term.buffer_contains("offline"));
    }

    #[test]
    fn test_amount_entry_shows_cursor() {
        let mut state = state_with_fleet(&["1"], Some("1"));
        state.command_amount = "42".into();
        state.ui_mode = UiMode::AmountEntry;
        let mut term = TestTerminal::with_size(32, 7);

        term.render_widget(RobotInfo::new(&state), term.area());

        assert!(term.buffer_contains("Amount 42▏"));
    }
}
