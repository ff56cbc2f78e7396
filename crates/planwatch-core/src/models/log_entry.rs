//! Execution log entries.

use serde::{Deserialize, Deserializer, Serialize};

use super::LogLevel;

/// A log line reported by the backend or raised by the client.
///
/// `message` is the identity key for deduplication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    /// Empty when the backend sent none
    #[serde(default, deserialize_with = "message_or_empty")]
    pub message: String,
    #[serde(default)]
    pub level: LogLevel,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, LogLevel::Info)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(message, LogLevel::Warn)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, LogLevel::Error)
    }
}

fn message_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
