//! Core library for the planwatch client.
//!
//! planwatch talks to a conversational task-execution backend: it sends a
//! user's query to the chat endpoint and, while the backend executes the
//! resulting plan, polls the status endpoint and reports live progress.
//! The backend may be intermittently unavailable and reachable through
//! several base URLs, so this crate is mostly about resilience:
//!
//! - [`fallback`]: tries an ordered list of candidate URLs and tolerates
//!   empty or malformed bodies
//! - [`polling`]: the status polling state machine, with log deduplication
//!   and a slower polling rate under sustained failure
//! - [`chat`]: one-shot chat requests with a single in-flight guard
//!
//! Painting is delegated to a [`Renderer`] supplied by the front-end.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use planwatch_core::{ClientBuilder, ClientConfig, Renderer};
//!
//! # async fn example(renderer: Arc<dyn Renderer>) -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClientBuilder::new()
//!     .with_config(ClientConfig::default())
//!     .build(renderer)?;
//!
//! // Shows the reply and polls plan progress while the backend works
//! client.chat().handle_send_message("Plan a three-day trip").await;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod chat;
pub mod config;
pub mod display;
pub mod endpoints;
pub mod error;
pub mod fallback;
pub mod models;
pub mod polling;
pub mod render;
pub mod transport;

// Re-export commonly used types
pub use builder::{Client, ClientBuilder};
pub use chat::{ChatRequestHandler, SendOutcome};
pub use config::{ChatConfig, ClientConfig, EndpointConfig, PollingConfig};
pub use display::{LogLine, StatusView, StepView};
pub use endpoints::Endpoints;
pub use error::{AttemptError, AttemptFailure, ClientError, Result};
pub use fallback::FallbackRequestClient;
pub use models::{
    ChatReply, LogEntry, LogLevel, PlanState, PlanStatus, StatusCounts, StatusOutcome, Step,
    StepStatus,
};
pub use polling::{PollPhase, PollingController, SessionId};
pub use render::{MessageId, Renderer, Sender};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport};
