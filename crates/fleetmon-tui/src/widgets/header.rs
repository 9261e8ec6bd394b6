//! Header bar with the app title, controller URL, and link status

use fleetmon_app::AppState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::{palette, styles};

/// State of the connection to the controller, as seen by the fleet poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// No poll has answered yet
    Connecting,
    Connected,
    /// Last poll failed
    Disconnected,
}

impl LinkStatus {
    pub fn from_state(state: &AppState) -> Self {
        if state.fleet_error.is_some() {
            Self::Disconnected
        } else if state.fleet_loaded {
            Self::Connected
        } else {
            Self::Connecting
        }
    }

    fn indicator(self) -> (&'static str, &'static str, Style) {
        match self {
            Self::Connecting => ("○", "Connecting", styles::text_muted()),
            Self::Connected => (
                "●",
                "Connected",
                styles::success().add_modifier(Modifier::BOLD),
            ),
            Self::Disconnected => (
                "✗",
                "Disconnected",
                styles::error().add_modifier(Modifier::BOLD),
            ),
        }
    }
}

pub struct MainHeader<'a> {
    base_url: &'a str,
    link: LinkStatus,
}

impl<'a> MainHeader<'a> {
    pub fn new(base_url: &'a str, link: LinkStatus) -> Self {
        Self { base_url, link }
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block("Fleet Monitor", false);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let (icon, label, style) = self.link.indicator();
        let line = Line::from(vec![
            Span::styled(format!("{icon} {label}"), style),
            Span::styled("  ", Style::default()),
            Span::styled(self.base_url, Style::default().fg(palette::TEXT_SECONDARY)),
            Span::styled("   ", Style::default()),
            Span::styled("[c]", styles::keybinding()),
            Span::styled(" Config ", styles::text_muted()),
            Span::styled("[t]", styles::keybinding()),
            Span::styled(" Run test ", styles::text_muted()),
            Span::styled("[q]", styles::keybinding()),
            Span::styled(" Quit", styles::text_muted()),
        ]);
        Paragraph::new(line).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{state_with_fleet, TestTerminal};

    #[test]
    fn test_header_shows_url_and_status() {
        let mut term = TestTerminal::new();
        let header = MainHeader::new("http://127.0.0.1:5000", LinkStatus::Connected);

        term.render_widget(header, term.area());

        assert!(term.buffer_contains("Fleet Monitor"));
        assert!(term.buffer_contains("http://127.0.0.1:5000"));
        assert!(term.buffer_contains("● Connected"));
        assert!(term.buffer_contains("[q] Quit"));
    }

    #[test]
    fn test_link_status_from_state() {
        let mut state = fleetmon_app::AppState::new();
        assert_eq!(LinkStatus::from_state(&state), LinkStatus::Connecting);

        state = state_with_fleet(&["1"], None);
        assert_eq!(LinkStatus::from_state(&state), LinkStatus::Connected);

        state.fleet_error = Some("connection refused".into());
        assert_eq!(LinkStatus::from_state(&state), LinkStatus::Disconnected);
    }

    #[test]
    fn test_header_survives_tiny_area() {
        let mut term = TestTerminal::with_size(10, 2);
        term.render_widget(MainHeader::new("http://x", LinkStatus::Connecting), term.area());
    }
}
