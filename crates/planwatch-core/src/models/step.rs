//! Step model definition.

use serde::{Deserialize, Deserializer, Serialize};

use super::StepStatus;

/// Description shown when the backend omits one.
pub const UNNAMED_STEP: &str = "Unnamed step";

/// One unit of a plan, in execution order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    /// What the step does
    #[serde(default = "default_description", deserialize_with = "description_or_default")]
    pub description: String,

    /// Current status of the step
    #[serde(default)]
    pub status: StepStatus,

    /// Free-form notes; empty strings are treated as absent
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub notes: Option<String>,
}

impl Step {
    /// Creates a step with no notes.
    pub fn new(description: impl Into<String>, status: StepStatus) -> Self {
        Self {
            description: description.into(),
            status,
            notes: None,
        }
    }
}

fn default_description() -> String {
    UNNAMED_STEP.to_string()
}

fn description_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(default_description))
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}
