//! Screen layout definitions for the TUI
//!
//! ```text
//! ┌ header ───────────────────────────────────────┐
//! ├ robots ──────┬ messages ──────────────────────┤
//! │              │                                │
//! ├ robot info ──┼ scenario ──────────────────────┤
//! └──────────────┴────────────────────────────────┘
//!   status bar
//! ```

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the left column (robot list and robot info)
pub const LEFT_COLUMN_WIDTH: u16 = 32;

/// Height of the robot info panel (borders included)
pub const ROBOT_INFO_HEIGHT: u16 = 7;

/// Height of the scenario panel (borders included)
pub const SCENARIO_HEIGHT: u16 = 12;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    pub header: Rect,
    pub robots: Rect,
    pub robot_info: Rect,
    pub messages: Rect,
    pub scenario: Rect,
    pub status: Rect,
}

/// Split the full screen into panels
pub fn create(area: Rect) -> ScreenAreas {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(1),
    ])
    .areas(area);

    let [left, right] =
        Layout::horizontal([Constraint::Length(LEFT_COLUMN_WIDTH), Constraint::Min(20)])
            .areas(body);

    let [robots, robot_info] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(ROBOT_INFO_HEIGHT)]).areas(left);

    let [messages, scenario] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(SCENARIO_HEIGHT)]).areas(right);

    ScreenAreas {
        header,
        robots,
        robot_info,
        messages,
        scenario,
        status,
    }
}
