//! In-memory message board and its terminal rendering.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use super::{Severity, StatusSink};

/// One message slot on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Option<Severity>,
    pub visible: bool,
}

impl StatusMessage {
    fn hidden() -> Self {
        Self {
            text: String::new(),
            severity: None,
            visible: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Target {
    name: String,
    /// `messages[0]` is the target itself; appended copies follow it.
    messages: Vec<StatusMessage>,
}

/// [`StatusSink`] that keeps every target in memory, in the order targets
/// were first touched.
#[derive(Debug, Clone, Default)]
pub struct MessageBoard {
    targets: Vec<Target>,
}

impl MessageBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The target's own message slot.
    pub fn primary(&self, target: &str) -> Option<&StatusMessage> {
        self.find(target).and_then(|t| t.messages.first())
    }

    /// The target followed by everything appended after it.
    pub fn messages(&self, target: &str) -> &[StatusMessage] {
        self.find(target).map(|t| t.messages.as_slice()).unwrap_or(&[])
    }

    /// All visible messages with their target names, in display order.
    pub fn visible(&self) -> Vec<(&str, &StatusMessage)> {
        self.targets
            .iter()
            .flat_map(|t| {
                t.messages
                    .iter()
                    .filter(|m| m.visible)
                    .map(move |m| (t.name.as_str(), m))
            })
            .collect()
    }

    /// Drop appended messages and hide the target.
    pub fn clear(&mut self, target: &str) {
        if let Some(t) = self.targets.iter_mut().find(|t| t.name == target) {
            t.messages.truncate(1);
            t.messages[0] = StatusMessage::hidden();
        }
    }

    /// Rows needed to render the board, borders included.
    pub fn height(&self) -> u16 {
        let rows = self.visible().len().max(1);
        u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(2)
    }

    fn find(&self, target: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == target)
    }

    fn entry(&mut self, target: &str) -> &mut Target {
        let index = match self.targets.iter().position(|t| t.name == target) {
            Some(index) => index,
            None => {
                self.targets.push(Target {
                    name: target.to_string(),
                    messages: vec![StatusMessage::hidden()],
                });
                self.targets.len() - 1
            }
        };
        &mut self.targets[index]
    }
}

impl StatusSink for MessageBoard {
    fn show(&mut self, target: &str, message: &str, style: Option<Severity>) {
        let slot = &mut self.entry(target).messages[0];
        slot.text = message.to_string();
        slot.severity = style;
        slot.visible = style.is_some();
    }

    fn append(&mut self, target: &str, message: &str, style: Severity) {
        self.entry(target).messages.insert(
            1,
            StatusMessage {
                text: message.to_string(),
                severity: Some(style),
                visible: true,
            },
        );
    }
}

impl Widget for &MessageBoard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = self.visible();

        let lines: Vec<Line> = if visible.is_empty() {
            vec![Line::from(Span::styled(
                "No status messages",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            visible
                .iter()
                .map(|(_, message)| {
                    let (tag, color) = match message.severity {
                        Some(severity) => (format!("[{}] ", severity), severity.color()),
                        None => (String::new(), Color::White),
                    };
                    Line::from(vec![
                        Span::styled(tag, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                        Span::styled(message.text.as_str(), Style::default().fg(color)),
                    ])
                })
                .collect()
        };

        Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Status ")
                    .title_style(Style::default().fg(Color::Cyan)),
            )
            .render(area, buf);
    }
}
