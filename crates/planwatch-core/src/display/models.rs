//! Display implementations for models and view models.
//!
//! All output is markdown so the terminal renderer can style it; plain
//! renderers can print it as-is.

use std::fmt;

use super::{
    datetime::LocalTime,
    view::{LogLine, StatusView, StepView, WAITING_FOR_STEPS},
};
use crate::models::{LogLevel, PlanState, StatusCounts, StepStatus};

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for PlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StatusCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} completed, {} in progress, {} blocked, {} not started)",
            self.completed, self.in_progress, self.blocked, self.not_started
        )
    }
}

impl fmt::Display for StepView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- {} {}. {}", self.icon(), self.position, self.description)?;
        if let Some(notes) = &self.notes {
            writeln!(f, "  *{notes}*")?;
        }
        Ok(())
    }
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.title, &self.plan_id) {
            (Some(title), Some(id)) => writeln!(f, "## {title} (ID: {id})")?,
            (None, Some(id)) => writeln!(f, "## Plan {id}")?,
            (Some(title), None) => writeln!(f, "## {title}")?,
            (None, None) => writeln!(f, "## Plan")?,
        }
        writeln!(f)?;
        writeln!(f, "- **Progress**: {}%", self.progress_label())?;
        writeln!(f, "- **Steps**: {}", self.counts)?;
        if let Some((completed, total)) = self.completion {
            writeln!(f, "- **Completed**: {completed}/{total}")?;
        }
        writeln!(f)?;

        if self.steps.is_empty() {
            writeln!(f, "{WAITING_FOR_STEPS}")?;
        } else {
            for step in &self.steps {
                write!(f, "{step}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", LocalTime(&self.timestamp), self.message)
    }
}
