//! View models and display formatting.
//!
//! The polling controller never paints anything itself. It turns session
//! state into the view types defined here and hands them to a
//! [`crate::render::Renderer`]:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   PlanStatus    │    │   StatusView /  │    │    Renderer     │
//! │   LogEntry      │───▶│   LogLine       │───▶│ (terminal, ...) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Every view type implements [`std::fmt::Display`] as markdown, so a
//! renderer can print it directly.
//!
//! ```rust
//! use planwatch_core::{display::StatusView, models::PlanStatus};
//!
//! let view = StatusView::from_plan(&PlanStatus::default());
//! assert_eq!(view.progress_label(), 0);
//! assert!(view.to_string().contains("Waiting for plan initialization"));
//! ```

pub mod datetime;
pub mod models;
pub mod view;

pub use datetime::LocalTime;
pub use view::{LogLine, StatusView, StepView, WAITING_FOR_STEPS};
