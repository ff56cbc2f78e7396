//! Plan status model and the merge rules applied on every poll.

use serde::{Deserialize, Serialize};

use super::{PlanState, Step, StepStatus, StatusResponse};

/// Aggregate tally of step statuses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StatusCounts {
    pub completed: u32,
    #[serde(alias = "in progress")]
    pub in_progress: u32,
    pub blocked: u32,
    #[serde(alias = "not started")]
    pub not_started: u32,
}

impl StatusCounts {
    /// Tallies the given steps.
    pub fn from_steps(steps: &[Step]) -> Self {
        steps.iter().fold(Self::default(), |mut counts, step| {
            match step.status {
                StepStatus::Completed => counts.completed += 1,
                StepStatus::InProgress => counts.in_progress += 1,
                StepStatus::Blocked => counts.blocked += 1,
                StepStatus::NotStarted => counts.not_started += 1,
            }
            counts
        })
    }

    pub fn total(&self) -> u32 {
        self.completed + self.in_progress + self.blocked + self.not_started
    }
}

/// Client-side view of a plan's execution, built up across polls.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanStatus {
    /// Stable once assigned
    pub plan_id: Option<String>,
    pub title: Option<String>,
    /// 0 to 100, clamped by the backend
    pub progress_percentage: f64,
    pub state: PlanState,
    /// Execution order
    pub steps: Vec<Step>,
    pub status_counts: StatusCounts,
    pub completed_steps: Option<u32>,
    pub total_steps: Option<u32>,
}

impl PlanStatus {
    /// Folds one status response into this plan.
    ///
    /// Fields absent from the response keep their previous value, except
    /// progress, which reads as 0 when missing. Counts are recomputed from
    /// the steps whenever the response does not carry them.
    pub fn merge(&mut self, response: &StatusResponse) {
        if let Some(plan_id) = &response.plan_id {
            self.plan_id = Some(plan_id.clone());
        }
        if let Some(title) = &response.title {
            self.title = Some(title.clone());
        }
        self.progress_percentage = response.progress_percentage.unwrap_or(0.0);
        if let Some(state) = response.state {
            self.state = state;
        }
        if let Some(steps) = &response.steps {
            self.steps = steps.clone();
        }
        if response.completed_steps.is_some() {
            self.completed_steps = response.completed_steps;
        }
        if response.total_steps.is_some() {
            self.total_steps = response.total_steps;
        }
        self.status_counts = response
            .status_counts
            .unwrap_or_else(|| StatusCounts::from_steps(&self.steps));
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_terminal()
    }
}
