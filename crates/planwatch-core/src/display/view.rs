//! View models handed to a [`crate::render::Renderer`].

use jiff::Timestamp;

use crate::models::{LogEntry, LogLevel, PlanStatus, StatusCounts, Step, StepStatus};

/// Placeholder shown while a plan has no steps yet.
pub const WAITING_FOR_STEPS: &str = "Waiting for plan initialization...";

/// Everything a renderer needs to paint the status panel.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub plan_id: Option<String>,
    pub title: Option<String>,
    /// Raw percentage, for a progress bar
    pub progress: f64,
    pub steps: Vec<StepView>,
    pub counts: StatusCounts,
    /// `(completed, total)` when the backend reports both
    pub completion: Option<(u32, u32)>,
}

impl StatusView {
    pub fn from_plan(plan: &PlanStatus) -> Self {
        Self {
            plan_id: plan.plan_id.clone(),
            title: plan.title.clone(),
            progress: plan.progress_percentage,
            steps: plan
                .steps
                .iter()
                .enumerate()
                .map(|(position, step)| StepView::new(position, step))
                .collect(),
            counts: plan.status_counts,
            completion: plan.completed_steps.zip(plan.total_steps),
        }
    }

    /// Progress rounded to a whole percentage, for text.
    pub fn progress_label(&self) -> u32 {
        self.progress.clamp(0.0, 100.0).round() as u32
    }
}

/// One row of the step list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    /// Zero-based position in execution order
    pub position: usize,
    pub description: String,
    pub status: StepStatus,
    pub notes: Option<String>,
}

impl StepView {
    pub fn new(position: usize, step: &Step) -> Self {
        Self {
            position,
            description: step.description.clone(),
            status: step.status,
            notes: step.notes.clone(),
        }
    }

    pub fn icon(&self) -> &'static str {
        self.status.icon()
    }

    pub fn css_class(&self) -> &'static str {
        self.status.css_class()
    }
}

/// A log entry stamped with the time it was rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub timestamp: Timestamp,
    pub message: String,
    pub level: LogLevel,
}

impl LogLine {
    pub fn stamp(entry: LogEntry) -> Self {
        Self {
            timestamp: Timestamp::now(),
            message: entry.message,
            level: entry.level,
        }
    }
}
