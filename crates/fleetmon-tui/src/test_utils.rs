//! Test utilities for TUI rendering verification
//!
//! Widgets and full frames are rendered into ratatui's `TestBackend` and
//! asserted on as plain text.

use fleetmon_api::test_utils::test_fleet;
use fleetmon_app::{AppState, Message};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::{Frame, Terminal};

/// Standard test terminal size
pub const TEST_WIDTH: u16 = 100;
pub const TEST_HEIGHT: u16 = 30;

pub struct TestTerminal {
    pub terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    pub fn new() -> Self {
        Self::with_size(TEST_WIDTH, TEST_HEIGHT)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let terminal =
            Terminal::new(TestBackend::new(width, height)).expect("Failed to create test terminal");
        Self { terminal }
    }

    pub fn area(&self) -> Rect {
        let size = self.terminal.size().expect("Failed to get terminal size");
        Rect::new(0, 0, size.width, size.height)
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.terminal
            .draw(|frame| frame.render_widget(widget, area))
            .expect("Failed to render widget");
    }

    /// Draw a full frame, e.g. `render::view`
    pub fn draw_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f).expect("Failed to draw frame");
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    pub fn buffer_contains(&self, text: &str) -> bool {
        self.content().contains(text)
    }

    /// Row `line` as text
    pub fn line(&self, line: u16) -> String {
        let buffer = self.buffer();
        let mut result = String::new();
        if line < buffer.area.height {
            for x in 0..buffer.area.width {
                result.push_str(buffer[(x, line)].symbol());
            }
        }
        result
    }

    /// Whole buffer as text, one row per line
    pub fn content(&self) -> String {
        (0..self.buffer().area.height)
            .map(|y| self.line(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}

/// AppState with robots `ids` loaded and `selected` chosen
pub fn state_with_fleet(ids: &[&str], selected: Option<&str>) -> AppState {
    let mut state = AppState::new();
    fleetmon_app::handler::update(&mut state, Message::FleetReceived(Ok(test_fleet(ids))));
    if let Some(robot) = selected {
        fleetmon_app::handler::update(&mut state, Message::SelectRobot(robot.to_string()));
    }
    state
}
