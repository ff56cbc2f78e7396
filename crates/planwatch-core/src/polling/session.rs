//! Per-session polling state.

use std::{collections::HashSet, fmt};

use crate::models::{LogEntry, PlanStatus};

/// Identifies one polling session. Ids increase monotonically per
/// controller, so a stale id never matches a newer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub(crate) u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State owned by the controller for the lifetime of one session. Created
/// on `start()` and dropped on `stop()`.
#[derive(Debug)]
pub struct PollingSession {
    id: SessionId,
    plan: PlanStatus,
    retry_count: u32,
    seen_messages: HashSet<String>,
    last_error: Option<String>,
}

impl PollingSession {
    pub(crate) fn new(id: SessionId) -> Self {
        Self {
            id,
            plan: PlanStatus::default(),
            retry_count: 0,
            seen_messages: HashSet::new(),
            last_error: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn plan(&self) -> &PlanStatus {
        &self.plan
    }

    pub(crate) fn plan_mut(&mut self) -> &mut PlanStatus {
        &mut self.plan
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns true the first time a message text is seen in this session.
    pub fn admit(&mut self, entry: &LogEntry) -> bool {
        self.seen_messages.insert(entry.message.clone())
    }

    pub(crate) fn record_success(&mut self) {
        self.retry_count = 0;
    }

    /// Counts a failed poll and returns the new consecutive failure count.
    pub(crate) fn record_failure(&mut self) -> u32 {
        self.retry_count += 1;
        self.retry_count
    }

    pub(crate) fn reset_retries(&mut self) {
        self.retry_count = 0;
    }

    /// Remembers `message` as the last error. Returns false when it repeats
    /// the previous one.
    pub(crate) fn note_error(&mut self, message: &str) -> bool {
        if self.last_error.as_deref() == Some(message) {
            return false;
        }
        self.last_error = Some(message.to_string());
        true
    }
}
