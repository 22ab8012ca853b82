//! The result envelope returned by every mutating service operation.
//!
//! Not an HTTP response: mapping statuses onto a transport is the caller's
//! job.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of a mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// The target entity, or an entity it references, does not exist.
    NotFound,
    Created,
    Updated,
    Deleted,
    /// The store reported a write conflict.
    Error,
    /// Completed with nothing to report (link/unlink).
    Success,
    /// The requested association already exists.
    Duplicate,
}

impl ServiceStatus {
    /// Whether the operation took effect.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Self::Created | Self::Updated | Self::Deleted | Self::Success
        )
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not_found",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Error => "error",
            Self::Success => "success",
            Self::Duplicate => "duplicate",
        };
        f.write_str(s)
    }
}

impl FromStr for ServiceStatus {
    type Err = ServiceStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_found" => Ok(Self::NotFound),
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "deleted" => Ok(Self::Deleted),
            "error" => Ok(Self::Error),
            "success" => Ok(Self::Success),
            "duplicate" => Ok(Self::Duplicate),
            other => Err(ServiceStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ServiceStatus`] string.
#[derive(Debug, Clone)]
pub struct ServiceStatusParseError(pub String);

impl fmt::Display for ServiceStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid service status: {:?}", self.0)
    }
}

impl std::error::Error for ServiceStatusParseError {}

// ---------------------------------------------------------------------------

/// Status, optional new id, and human-readable messages for one mutation.
///
/// `created_id` is only ever set alongside [`ServiceStatus::Created`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub status: ServiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_id: Option<i32>,
    #[serde(default)]
    pub messages: Vec<String>,
}

impl ServiceResponse {
    fn with_status(status: ServiceStatus) -> Self {
        Self {
            status,
            created_id: None,
            messages: Vec::new(),
        }
    }

    pub fn created(id: i32) -> Self {
        Self {
            created_id: Some(id),
            ..Self::with_status(ServiceStatus::Created)
        }
    }

    pub fn updated() -> Self {
        Self::with_status(ServiceStatus::Updated)
    }

    pub fn deleted() -> Self {
        Self::with_status(ServiceStatus::Deleted)
    }

    pub fn success() -> Self {
        Self::with_status(ServiceStatus::Success)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(ServiceStatus::NotFound).with_message(message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_status(ServiceStatus::Error).with_message(message)
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::with_status(ServiceStatus::Duplicate).with_message(message)
    }

    /// Append a message, keeping earlier ones in order.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl fmt::Display for ServiceResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(id) = self.created_id {
            write!(f, " (id {id})")?;
        }
        if !self.messages.is_empty() {
            write!(f, ": {}", self.messages.join("; "))?;
        }
        Ok(())
    }
}
