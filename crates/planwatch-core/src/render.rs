//! The rendering collaborator.
//!
//! Painting is not part of this crate. Front-ends implement [`Renderer`]
//! and the chat handler and polling controller drive it with structured
//! data. Implementations are called while controller state is locked, so
//! they must not call back into the controller.

use std::fmt;

use crate::display::{LogLine, StatusView};

/// Who a chat message is from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    System,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::System => write!(f, "system"),
        }
    }
}

/// Handle to a rendered chat message, used to replace placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub u64);

/// Paints chat messages, the status panel and the execution log.
pub trait Renderer: Send + Sync {
    /// Appends a chat message and returns a handle to it.
    fn add_message(&self, content: &str, sender: Sender) -> MessageId;

    /// Replaces the content of a previously added message.
    fn replace_message(&self, id: MessageId, content: &str);

    /// Clears the pending user input.
    fn clear_input(&self);

    /// Enables or disables sending.
    fn set_input_enabled(&self, enabled: bool);

    fn show_status_panel(&self);

    fn hide_status_panel(&self);

    /// Clears the log pane and step list for a new session.
    fn reset_status(&self);

    /// Paints progress, steps and counts.
    fn render_status(&self, view: &StatusView);

    /// Appends one line to the execution log.
    fn append_log(&self, line: &LogLine);
}
