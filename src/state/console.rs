// Console tab state management.
// Activity log of load cycles shown in the Console tab.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

/// Console message level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Info,
    Warn,
    Error,
}

/// A console message for the activity log.
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleMessage {
    pub fn new(level: ConsoleLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Complete state for the Console tab.
#[derive(Debug, Default)]
pub struct ConsoleState {
    pub messages: Vec<ConsoleMessage>,
    /// Warnings and errors not yet seen.
    pub unread: usize,
    pub list_state: ListState,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.push(ConsoleMessage::new(ConsoleLevel::Info, message));
    }

    pub fn log_warn(&mut self, message: impl Into<String>) {
        self.unread += 1;
        self.push(ConsoleMessage::new(ConsoleLevel::Warn, message));
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.unread += 1;
        self.push(ConsoleMessage::new(ConsoleLevel::Error, message));
    }

    /// Most severe level among the unread warnings and errors.
    pub fn unread_level(&self) -> Option<ConsoleLevel> {
        let mut unread = self
            .messages
            .iter()
            .rev()
            .filter(|m| m.level != ConsoleLevel::Info)
            .take(self.unread)
            .peekable();
        unread.peek()?;
        if unread.any(|m| m.level == ConsoleLevel::Error) {
            Some(ConsoleLevel::Error)
        } else {
            Some(ConsoleLevel::Warn)
        }
    }

    pub fn mark_read(&mut self) {
        self.unread = 0;
    }

    fn push(&mut self, message: ConsoleMessage) {
        self.messages.push(message);
        self.list_state.select(Some(self.messages.len() - 1));
    }

    /// Select previous message in list.
    pub fn select_prev(&mut self) {
        if let Some(i) = self.list_state.selected() {
            self.list_state.select(Some(i.saturating_sub(1)));
        }
    }

    /// Select next message in list.
    pub fn select_next(&mut self) {
        if let Some(i) = self.list_state.selected() {
            if i + 1 < self.messages.len() {
                self.list_state.select(Some(i + 1));
            }
        }
    }
}
