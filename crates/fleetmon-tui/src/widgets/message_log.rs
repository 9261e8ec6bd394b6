//! Message log panel
//!
//! Each group renders as a header line (author and kind) followed by one
//! line per message. The viewport comes from the log's scroll state.

use fleetmon_app::message_log::{MessageGroup, MessageLog};
use fleetmon_core::MessageAuthor;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::{palette, styles};

pub struct MessageLogView<'a> {
    log: &'a MessageLog,
}

impl<'a> MessageLogView<'a> {
    pub fn new(log: &'a MessageLog) -> Self {
        Self { log }
    }
}

fn group_lines(group: &MessageGroup) -> impl Iterator<Item = Line<'_>> {
    let color = match group.author {
        MessageAuthor::Controller => palette::AUTHOR_CONTROLLER,
        MessageAuthor::Robot(_) => palette::AUTHOR_ROBOT,
    };
    let header = Line::from(vec![
        Span::styled(
            group.author.label(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" · {}", group.kind), styles::text_muted()),
    ]);

    let entries = group.entries.iter().map(|entry| {
        Line::from(vec![
            Span::styled(
                entry.received_at.format("  %H:%M:%S ").to_string(),
                styles::text_muted(),
            ),
            Span::styled(format!("#{}", entry.message_id), styles::accent()),
            Span::styled(format!(" [{}] ", entry.category), styles::warning()),
            Span::styled(entry.text.as_str(), styles::text_primary()),
        ])
    });

    std::iter::once(header).chain(entries)
}

impl Widget for MessageLogView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.log.scroll.follow {
            "Messages"
        } else {
            "Messages (scrolled)"
        };
        let block = styles::glass_block(title, false);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.log.is_empty() {
            Line::styled("No messages yet", styles::text_muted()).render(inner, buf);
            return;
        }

        let (start, end) = self.log.visible_range(inner.height as usize);
        let lines: Vec<Line> = self
            .log
            .groups()
            .iter()
            .flat_map(group_lines)
            .skip(start)
            .take(end - start)
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
