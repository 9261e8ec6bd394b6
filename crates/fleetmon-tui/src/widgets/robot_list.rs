//! Robot list panel

use fleetmon_app::robot_list::RobotList;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, StatefulWidget, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{palette, styles};

/// Width reserved for the robot id column
const ID_WIDTH: usize = 6;

pub struct RobotListPanel<'a> {
    list: &'a RobotList,
    focused: bool,
}

impl<'a> RobotListPanel<'a> {
    pub fn new(list: &'a RobotList) -> Self {
        Self {
            list,
            focused: true,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

/// Cut `text` to at most `width` terminal columns
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

impl Widget for RobotListPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!("Robots ({})", self.list.rows().len());
        let block = styles::glass_block(&title, self.focused);

        if self.list.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            Line::styled("No robots reported", styles::text_muted()).render(inner, buf);
            return;
        }

        let status_width = (area.width as usize).saturating_sub(ID_WIDTH + 6);
        let items: Vec<ListItem> = self
            .list
            .rows()
            .iter()
            .map(|row| {
                let marker = if row.active {
                    Span::styled("● ", styles::accent())
                } else {
                    Span::raw("  ")
                };
                ListItem::new(Line::from(vec![
                    marker,
                    Span::styled(
                        format!("{:<ID_WIDTH$}", row.id),
                        Style::default().fg(palette::TEXT_PRIMARY),
                    ),
                    Span::styled(truncate(&row.status_text, status_width), styles::text_secondary()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(styles::focused_selected());
        let mut list_state = ListState::default().with_selected(Some(self.list.cursor()));
        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}
