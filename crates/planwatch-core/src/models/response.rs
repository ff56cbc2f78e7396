//! Wire shapes of the chat and status endpoints and their classification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{LogEntry, PlanState, StatusCounts, Step};

/// Body of `GET /manus/status`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusResponse {
    pub plan_id: Option<String>,
    pub title: Option<String>,
    pub progress_percentage: Option<f64>,
    pub state: Option<PlanState>,
    pub steps: Option<Vec<Step>>,
    pub status_counts: Option<StatusCounts>,
    pub completed_steps: Option<u32>,
    pub total_steps: Option<u32>,
    pub logs: Option<Vec<LogEntry>>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// What one successful status poll means for the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusOutcome {
    /// The endpoint is up but no plan exists yet
    NoPlan { message: String },
    /// The backend reported an error in a well-formed body
    ServerError { message: String },
    /// A plan update to merge and render
    Update(StatusResponse),
    /// JSON `null`; counted as a failed poll
    Missing,
    /// Valid JSON that does not look like a status payload
    Unexpected { reason: String },
}

impl StatusOutcome {
    /// Classifies a parsed status body.
    ///
    /// A `message` without a `planId` means no plan has been created yet; an
    /// `error` field is a server-side failure. Everything else is an update,
    /// including `{}`.
    pub fn classify(value: Value) -> Self {
        if value.is_null() {
            return StatusOutcome::Missing;
        }
        if !value.is_object() {
            return StatusOutcome::Unexpected {
                reason: format!("expected an object, got {}", json_kind(&value)),
            };
        }

        let response: StatusResponse = match serde_json::from_value(value) {
            Ok(response) => response,
            Err(e) => {
                return StatusOutcome::Unexpected {
                    reason: e.to_string(),
                }
            }
        };

        if let Some(error) = &response.error {
            return StatusOutcome::ServerError {
                message: error.clone(),
            };
        }
        if response.plan_id.is_none() {
            if let Some(message) = &response.message {
                return StatusOutcome::NoPlan {
                    message: message.clone(),
                };
            }
        }

        StatusOutcome::Update(response)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Message shown when a chat reply carries neither `result` nor `error`.
pub const NO_RESPONSE: &str = "No response received.";

/// Body of `GET /manus/chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChatReply {
    pub result: Option<String>,
    pub error: Option<String>,
}

impl ChatReply {
    /// Reads a reply from parsed JSON. Non-object or oddly shaped bodies
    /// read as an empty reply.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Text to show the user: `result`, else `error`, else a fixed message.
    pub fn display_text(&self) -> &str {
        self.result
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or(NO_RESPONSE)
    }

    pub fn is_error(&self) -> bool {
        self.result.is_none() && self.error.is_some()
    }
}
