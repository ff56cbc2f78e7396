//! Data models for plan status, steps and log entries.
//!
//! These types mirror what the backend's status and chat endpoints return,
//! with lenient parsing: unknown step statuses read as `not_started`,
//! unknown plan states as running, unknown log levels as info, and missing
//! step descriptions as a placeholder.
//!
//! # Examples
//!
//! ```rust
//! use planwatch_core::models::{StatusOutcome, StepStatus};
//! use serde_json::json;
//!
//! let body = json!({
//!     "planId": "p1",
//!     "progressPercentage": 50,
//!     "state": "RUNNING",
//!     "steps": [{ "description": "fetch data", "status": "in_progress" }]
//! });
//!
//! match StatusOutcome::classify(body) {
//!     StatusOutcome::Update(status) => {
//!         let steps = status.steps.unwrap();
//!         assert_eq!(steps[0].status, StepStatus::InProgress);
//!     }
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

pub mod log_entry;
pub mod plan;
pub mod response;
pub mod status;
pub mod step;


pub use log_entry::LogEntry;
pub use plan::{PlanStatus, StatusCounts};
pub use response::{ChatReply, StatusOutcome, StatusResponse, NO_RESPONSE};
pub use status::{LogLevel, PlanState, StepStatus};
pub use step::{Step, UNNAMED_STEP};
