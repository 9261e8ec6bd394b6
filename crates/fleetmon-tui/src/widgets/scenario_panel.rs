//! Scenario panel: chooser, progress gauge, and result table

use fleetmon_app::scenario::{RunState, ScenarioRunner};
use fleetmon_core::{ScenarioInfo, ScenarioResult};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Gauge, Paragraph, Row, Table, Widget, Wrap},
};

use crate::theme::{palette, styles};

pub struct ScenarioPanel<'a> {
    runner: &'a ScenarioRunner,
}

impl<'a> ScenarioPanel<'a> {
    pub fn new(runner: &'a ScenarioRunner) -> Self {
        Self { runner }
    }

    fn chooser_line(&self) -> Line<'a> {
        let Some(chosen) = self.runner.chosen_id() else {
            return Line::styled("No scenarios available", styles::text_muted());
        };
        let position = self
            .runner
            .scenarios()
            .iter()
            .position(|s| s == chosen)
            .map_or(0, |i| i + 1);

        Line::from(vec![
            Span::styled("‹ ", styles::text_muted()),
            Span::styled(chosen.clone(), styles::accent_bold()),
            Span::styled(" ›", styles::text_muted()),
            Span::styled(
                format!(" {position}/{}  ", self.runner.scenarios().len()),
                styles::text_muted(),
            ),
            Span::styled("[ ]", styles::keybinding()),
            Span::styled(" cycle ", styles::text_muted()),
            Span::styled("[i]", styles::keybinding()),
            Span::styled(" info ", styles::text_muted()),
            Span::styled("[t]", styles::keybinding()),
            Span::styled(" run", styles::text_muted()),
        ])
    }

    fn render_gauge(&self, area: Rect, buf: &mut Buffer) {
        let style = if self.runner.error_flag {
            styles::error()
        } else {
            Style::default().fg(palette::STATUS_BLUE)
        };
        let label = match self.runner.label {
            Some(label) => format!("{}%  {label}", self.runner.percent),
            None => format!("{}%", self.runner.percent),
        };
        Gauge::default()
            .gauge_style(style)
            .percent(u16::from(self.runner.percent.min(100)))
            .label(label)
            .render(area, buf);
    }

    fn render_body(&self, area: Rect, buf: &mut Buffer) {
        if self.runner.overlay {
            Paragraph::new(Line::styled("Loading…", styles::text_muted()))
                .alignment(Alignment::Center)
                .render(area, buf);
            return;
        }

        if let Some(result) = self.runner.result_table() {
            render_result_table(result, area, buf);
            return;
        }

        if matches!(self.runner.state(), RunState::Finished { .. }) && self.runner.error_flag {
            Line::styled("The test reported an error", styles::error()).render(area, buf);
            return;
        }

        if let (RunState::Idle, Some(message)) = (self.runner.state(), &self.runner.start_error) {
            Paragraph::new(Line::styled(format!("Could not start: {message}"), styles::error()))
                .wrap(Wrap { trim: true })
                .render(area, buf);
            return;
        }

        if let Some(info) = self.runner.info() {
            render_info(info, area, buf);
        }
    }
}

/// One row per result key, values joined
fn render_result_table(result: &ScenarioResult, area: Rect, buf: &mut Buffer) {
    if result.is_empty() {
        Line::styled("Finished without results", styles::text_muted()).render(area, buf);
        return;
    }

    let rows = result.rows.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.key.as_str()).style(styles::accent()),
            Cell::from(row.values.join(", ")).style(styles::text_primary()),
        ])
    });
    Table::new(rows, [Constraint::Percentage(35), Constraint::Percentage(65)])
        .header(Row::new(vec!["Result", "Value"]).style(styles::text_muted()))
        .render(area, buf);
}

fn render_info(info: &ScenarioInfo, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![Line::styled(info.description.clone(), styles::text_primary())];
    if !info.prerequisites.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Requires ", styles::text_muted()),
            Span::styled(info.prerequisites.clone(), styles::text_secondary()),
        ]));
    }
    for (key, description) in &info.results {
        lines.push(Line::from(vec![
            Span::styled(format!("• {key}"), styles::accent()),
            Span::styled(format!("  {description}"), styles::text_secondary()),
        ]));
    }
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

impl Widget for ScenarioPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block("Scenario", false);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 3 {
            self.chooser_line().render(inner, buf);
            return;
        }

        let [chooser, gauge, _, body] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(inner);

        self.chooser_line().render(chooser, buf);
        self.render_gauge(gauge, buf);
        self.render_body(body, buf);
    }
}
