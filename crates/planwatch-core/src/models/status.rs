//! Status enumerations for plans, steps and log lines.
//!
//! The backend sends these as free-form strings. Each enum is closed, with an
//! explicit fallback for values it does not recognise.

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of step statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum StepStatus {
    /// Step has been completed
    Completed,

    /// Step is being worked on
    InProgress,

    /// Step cannot proceed
    Blocked,

    /// Step has not been started (also used for unrecognized values)
    #[default]
    NotStarted,
}

impl StepStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Completed => "completed",
            StepStatus::InProgress => "in_progress",
            StepStatus::Blocked => "blocked",
            StepStatus::NotStarted => "not_started",
        }
    }

    /// Parses a wire value. Both `in_progress` and `in progress` spellings
    /// are accepted; anything unrecognized is `NotStarted`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "completed" => StepStatus::Completed,
            "in_progress" | "inprogress" => StepStatus::InProgress,
            "blocked" => StepStatus::Blocked,
            _ => StepStatus::NotStarted,
        }
    }

    /// Icon shown next to a step.
    ///
    /// ```rust
    /// use planwatch_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.icon(), "✓");
    /// assert_eq!(StepStatus::parse_lenient("mystery").icon(), "○");
    /// ```
    pub fn icon(&self) -> &'static str {
        match self {
            StepStatus::Completed => "✓",
            StepStatus::InProgress => "→",
            StepStatus::Blocked => "✕",
            StepStatus::NotStarted => "○",
        }
    }

    /// Style class a renderer can attach to a step.
    pub fn css_class(&self) -> &'static str {
        match self {
            StepStatus::Completed => "step-completed",
            StepStatus::InProgress => "step-in-progress",
            StepStatus::Blocked => "step-blocked",
            StepStatus::NotStarted => "step-not-started",
        }
    }
}

impl From<Option<String>> for StepStatus {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(StepStatus::parse_lenient).unwrap_or_default()
    }
}

/// Execution state of a plan. Anything other than `COMPLETED` counts as
/// running.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "Option<String>")]
pub enum PlanState {
    #[default]
    Running,
    Completed,
}

impl PlanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanState::Running => "RUNNING",
            PlanState::Completed => "COMPLETED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PlanState::Completed)
    }
}

impl From<Option<String>> for PlanState {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(state) if state.trim().eq_ignore_ascii_case("completed") => PlanState::Completed,
            _ => PlanState::Running,
        }
    }
}

/// Severity of an execution log line. Unknown levels are `Info`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum LogLevel {
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl From<Option<String>> for LogLevel {
    fn from(value: Option<String>) -> Self {
        match value.unwrap_or_default().trim().to_lowercase().as_str() {
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}
