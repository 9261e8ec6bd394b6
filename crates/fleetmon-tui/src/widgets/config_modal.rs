//! Config editor modal
//!
//! Lists the selected robot's configuration values. Edited fields are marked
//! `*`, values the robot would reject are shown in red.

use fleetmon_app::config_editor::{ConfigEditor, ConfigField, ConfigLoad};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState, StatefulWidget, Widget, Wrap},
};

use super::modal_overlay;
use crate::theme::styles;

pub struct ConfigModal<'a> {
    editor: &'a ConfigEditor,
}

impl<'a> ConfigModal<'a> {
    pub fn new(editor: &'a ConfigEditor) -> Self {
        Self { editor }
    }

    fn field_row(&self, index: usize, field: &'a ConfigField) -> Row<'a> {
        let editing = self.editor.editing && index == self.editor.cursor;
        let value = if editing {
            format!("{}▏", field.text)
        } else {
            field.text.clone()
        };
        let value_style = if field.invalid {
            styles::error()
        } else if field.is_dirty() {
            styles::warning()
        } else {
            styles::text_primary()
        };
        let type_tag = field
            .synced
            .value_type
            .map(|t| t.tag().to_string())
            .unwrap_or_default();

        Row::new(vec![
            Cell::from(if field.is_dirty() { "*" } else { " " }).style(styles::warning()),
            Cell::from(field.synced.id.as_str()).style(styles::text_muted()),
            Cell::from(field.synced.name.as_str()).style(styles::text_secondary()),
            Cell::from(value).style(value_style),
            Cell::from(type_tag).style(styles::text_muted()),
        ])
    }

    fn footer(&self) -> Vec<Line<'a>> {
        let mut lines = Vec::new();
        if let Some(message) = &self.editor.apply_error {
            lines.push(Line::styled(format!("Apply failed: {message}"), styles::error()));
        }
        let pending = self.editor.pending().len();
        let status = if self.editor.is_applying() {
            Span::styled("Applying… ", styles::warning())
        } else if pending > 0 {
            Span::styled(format!("{pending} pending  "), styles::warning())
        } else {
            Span::raw("")
        };
        lines.push(Line::from(vec![
            status,
            Span::styled("[Enter]", styles::keybinding()),
            Span::styled(" edit ", styles::text_muted()),
            Span::styled("[a]", styles::keybinding()),
            Span::styled(" apply ", styles::text_muted()),
            Span::styled("[u]", styles::keybinding()),
            Span::styled(" discard ", styles::text_muted()),
            Span::styled("[S]", styles::keybinding()),
            Span::styled(" store+reboot ", styles::text_muted()),
            Span::styled("[Esc]", styles::keybinding()),
            Span::styled(" close", styles::text_muted()),
        ]));
        lines
    }
}

impl Widget for ConfigModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = modal_overlay::centered_rect(70, 70, 50, 10, area);
        modal_overlay::prepare(buf, area, modal);

        let title = match self.editor.robot() {
            Some(robot) => format!("Configuration · Robot {robot}"),
            None => "Configuration".to_string(),
        };
        let block = styles::modal_block(&title);
        let inner = block.inner(modal);
        block.render(modal, buf);

        let footer = self.footer();
        let [body, foot] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(footer.len() as u16),
        ])
        .areas(inner);
        Paragraph::new(footer)
            .wrap(Wrap { trim: true })
            .render(foot, buf);

        match self.editor.load() {
            ConfigLoad::Idle => {
                Line::styled("Select a robot first", styles::text_muted()).render(body, buf);
            }
            ConfigLoad::Syncing => {
                Line::styled("Syncing configuration…", styles::text_muted()).render(body, buf);
            }
            ConfigLoad::Failed(message) => {
                Paragraph::new(Line::styled(
                    format!("Could not load configuration: {message}"),
                    styles::error(),
                ))
                .wrap(Wrap { trim: true })
                .render(body, buf);
            }
            ConfigLoad::Ready if self.editor.fields().is_empty() => {
                Line::styled("Robot reported no values", styles::text_muted()).render(body, buf);
            }
            ConfigLoad::Ready => {
                let rows = self
                    .editor
                    .fields()
                    .iter()
                    .enumerate()
                    .map(|(i, f)| self.field_row(i, f));
                let table = Table::new(
                    rows,
                    [
                        Constraint::Length(1),
                        Constraint::Length(4),
                        Constraint::Percentage(50),
                        Constraint::Percentage(40),
                        Constraint::Length(1),
                    ],
                )
                .header(
                    Row::new(vec!["", "id", "name", "value", ""])
                        .style(styles::text_muted().add_modifier(Modifier::BOLD)),
                )
                .row_highlight_style(styles::focused_selected());
                let mut state = TableState::default().with_selected(Some(self.editor.cursor));
                StatefulWidget::render(table, body, buf, &mut state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetmon_api::test_utils::test_config_value;
    use fleetmon_core::{ConfigValue, ConfigValueType};

    use crate::test_utils::TestTerminal;

    fn ready_editor() -> ConfigEditor {
        let mut editor = ConfigEditor::new();
        editor.begin_sync("1");
        editor.load_succeeded(
            "1",
            vec![
                test_config_value("1", "max_speed", "5"),
                ConfigValue {
                    id: "2".into(),
                    name: "wheel_base".into(),
                    value: "0.3".into(),
                    value_type: Some(ConfigValueType::Float),
                },
            ],
        );
        editor
    }

    #[test]
    fn test_syncing_placeholder() {
        let mut editor = ConfigEditor::new();
        editor.begin_sync("4");
        let mut term = TestTerminal::new();

        term.render_widget(ConfigModal::new(&editor), term.area());

        assert!(term.buffer_contains("Configuration · Robot 4"));
        assert!(term.buffer_contains("Syncing configuration…"));
    }

    #[test]
    fn test_ready_lists_fields() {
        let editor = ready_editor();
        let mut term = TestTerminal::new();

        term.render_widget(ConfigModal::new(&editor), term.area());

        assert!(term.buffer_contains("max_speed"));
        assert!(term.buffer_contains("wheel_base"));
        assert!(term.buffer_contains("0.3"));
    }

    #[test]
    fn test_dirty_field_marked_and_counted() {
        let mut editor = ready_editor();
        editor.edit("2", "0.5");
        let mut term = TestTerminal::new();

        term.render_widget(ConfigModal::new(&editor), term.area());

        assert!(term.buffer_contains("1 pending"));
        assert!(term.buffer_contains("*"));
    }

    #[test]
    fn test_load_failure_is_shown() {
        let mut editor = ConfigEditor::new();
        editor.begin_sync("1");
        editor.load_failed("1", "not ready".into());
        let mut term = TestTerminal::new();

        term.render_widget(ConfigModal::new(&editor), term.area());

        assert!(term.buffer_contains("Could not load configuration: not ready"));
    }
}
