//! Grouped, append-only log of robot/controller messages
//!
//! Consecutive messages of the same kind share one group headed by their
//! author. A new group is opened exactly when the kind changes.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use fleetmon_core::{MessageAuthor, MessageKind, RobotMessage};

/// One rendered message
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub message_id: String,
    pub category: String,
    pub text: String,
    pub received_at: DateTime<Local>,
}

/// A run of same-kind messages
#[derive(Debug, Clone, PartialEq)]
pub struct MessageGroup {
    pub kind: MessageKind,
    pub author: MessageAuthor,
    pub entries: Vec<LogEntry>,
}

impl MessageGroup {
    /// Header line plus one line per entry
    pub fn line_count(&self) -> usize {
        1 + self.entries.len()
    }
}

/// Scroll position measured from the bottom of the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogScroll {
    /// Follow new content
    pub follow: bool,
    /// Lines hidden below the viewport
    pub from_bottom: usize,
}

impl Default for LogScroll {
    fn default() -> Self {
        Self {
            follow: true,
            from_bottom: 0,
        }
    }
}

/// Lines moved by PageUp/PageDown
pub const PAGE_LINES: usize = 10;

#[derive(Debug)]
pub struct MessageLog {
    groups: VecDeque<MessageGroup>,
    last_kind: Option<MessageKind>,
    max_groups: usize,
    groups_opened: u64,
    total_appended: u64,
    total_lines: usize,
    pub scroll: LogScroll,
}

impl MessageLog {
    pub fn new(max_groups: usize) -> Self {
        Self {
            groups: VecDeque::new(),
            last_kind: None,
            max_groups: max_groups.max(1),
            groups_opened: 0,
            total_appended: 0,
            total_lines: 0,
            scroll: LogScroll::default(),
        }
    }

    /// Append `messages` in arrival order for the log of `robot`.
    ///
    /// Returns the number of groups opened.
    pub fn append(&mut self, robot: &str, messages: Vec<RobotMessage>) -> usize {
        let mut opened = 0;
        let mut added_lines = 0;
        let now = Local::now();

        for msg in messages {
            if self.last_kind.as_ref() != Some(&msg.kind) {
                self.groups.push_back(MessageGroup {
                    author: MessageAuthor::for_kind(&msg.kind, robot),
                    kind: msg.kind.clone(),
                    entries: Vec::new(),
                });
                self.last_kind = Some(msg.kind.clone());
                self.groups_opened += 1;
                opened += 1;
                added_lines += 1;
            }

            if let Some(group) = self.groups.back_mut() {
                group.entries.push(LogEntry {
                    message_id: msg.message_id,
                    category: msg.category,
                    text: msg.text,
                    received_at: now,
                });
                self.total_appended += 1;
                added_lines += 1;
            }
        }

        self.total_lines += added_lines;
        self.evict_overflow();

        if self.scroll.follow {
            self.scroll.from_bottom = 0;
        } else {
            // Keep the operator's viewport where it was
            self.scroll.from_bottom =
                (self.scroll.from_bottom + added_lines).min(self.total_lines);
        }

        opened
    }

    fn evict_overflow(&mut self) {
        while self.groups.len() > self.max_groups {
            if let Some(old) = self.groups.pop_front() {
                self.total_lines -= old.line_count();
            }
        }
        self.scroll.from_bottom = self.scroll.from_bottom.min(self.total_lines);
    }

    /// Forget everything, e.g. when another robot is selected
    pub fn clear(&mut self) {
        self.groups.clear();
        self.last_kind = None;
        self.total_lines = 0;
        self.scroll = LogScroll::default();
    }

    pub fn groups(&self) -> &VecDeque<MessageGroup> {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn last_kind(&self) -> Option<&MessageKind> {
        self.last_kind.as_ref()
    }

    /// Groups opened since start, evicted ones included
    pub fn groups_opened(&self) -> u64 {
        self.groups_opened
    }

    /// Messages appended since start
    pub fn total_appended(&self) -> u64 {
        self.total_appended
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// The newest `n` messages, oldest first
    pub fn last_messages(&self, n: usize) -> Vec<RobotMessage> {
        let mut out: Vec<RobotMessage> = self
            .groups
            .iter()
            .rev()
            .flat_map(|g| {
                g.entries.iter().rev().map(move |e| RobotMessage {
                    kind: g.kind.clone(),
                    message_id: e.message_id.clone(),
                    category: e.category.clone(),
                    text: e.text.clone(),
                })
            })
            .take(n)
            .collect();
        out.reverse();
        out
    }

    // ─────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll.from_bottom = (self.scroll.from_bottom + n).min(self.total_lines);
        self.scroll.follow = self.scroll.from_bottom == 0;
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll.from_bottom = self.scroll.from_bottom.saturating_sub(n);
        if self.scroll.from_bottom == 0 {
            self.scroll.follow = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll.from_bottom = self.total_lines;
        self.scroll.follow = self.total_lines == 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = LogScroll::default();
    }

    pub fn page_up(&mut self) {
        self.scroll_up(PAGE_LINES);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(PAGE_LINES);
    }

    /// Range of lines `[start, end)` to show in a viewport of `height` lines
    pub fn visible_range(&self, height: usize) -> (usize, usize) {
        let end = self.total_lines.saturating_sub(self.scroll.from_bottom);
        let end = end.max(height.min(self.total_lines));
        (end.saturating_sub(height), end)
    }
}
