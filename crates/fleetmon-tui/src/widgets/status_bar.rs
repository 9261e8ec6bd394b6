//! Status bar: latest notice, fleet size, and mode hints

use fleetmon_app::{AppState, UiMode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn mode_hint(&self) -> &'static str {
        match self.state.ui_mode {
            UiMode::Normal => "[w/s] move  [a/d] rotate  [m] amount  [PgUp/PgDn] scroll",
            UiMode::AmountEntry => "type digits, [Enter] done",
            UiMode::ConfigEditor if self.state.config_editor.editing => {
                "type value, [Enter] done"
            }
            UiMode::ConfigEditor => "[↑/↓] select field",
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(
            format!(" {} robots ", self.state.fleet.len()),
            styles::accent(),
        )];

        if let Some(error) = &self.state.fleet_error {
            spans.push(Span::styled(format!("│ {error} "), styles::error()));
        } else if let Some(notice) = &self.state.notice {
            spans.push(Span::styled(
                format!("│ {} ", notice.text),
                styles::notice(notice.level),
            ));
        }

        spans.push(Span::styled(format!("│ {}", self.mode_hint()), styles::text_muted()));
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
