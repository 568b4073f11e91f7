use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

/// Fallback shown when a failure carries no structured message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    StructuredApi,
    Transport,
    InvalidResponse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuredApi => "structured_api",
            Self::Transport => "transport",
            Self::InvalidResponse => "invalid_response",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::StructuredApi => "API Error",
            Self::Transport => "Transport Error",
            Self::InvalidResponse => "Invalid Response",
        }
    }
}

/// Body any endpoint may return in place of its success shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    /// Extracts a non-empty `error` string from an arbitrary JSON body.
    pub fn detect(body: &Value) -> Option<Self> {
        let message = body.get("error")?.as_str()?.trim();
        if message.is_empty() {
            return None;
        }
        Some(Self {
            error: message.to_string(),
        })
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("{message}")]
    Api {
        status: Option<u16>,
        message: String,
    },
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },
}

impl ConsoleError {
    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Classifies a raw response. A structured `{error}` body wins over the
    /// status code; a non-2xx status without one is a transport error.
    /// Returns `None` when the response is a success candidate.
    pub fn from_response_body(status: u16, body: &str) -> Option<Self> {
        let parsed = serde_json::from_str::<Value>(body).ok();
        if let Some(error_body) = parsed.as_ref().and_then(ErrorBody::detect) {
            return Some(Self::api(Some(status), error_body.error));
        }
        if (200..300).contains(&status) {
            return None;
        }
        Some(Self::transport(
            Some(status),
            format!("Request failed with status code {status}"),
        ))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api { .. } => ErrorKind::StructuredApi,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::InvalidResponse { .. } => ErrorKind::InvalidResponse,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Transport { status, .. } => *status,
            Self::InvalidResponse { .. } => None,
        }
    }

    /// Structured API messages are shown verbatim; every other failure falls
    /// back to the caller's generic message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// The single human-readable string for integration calls: structured
    /// message first, then the transport message, then the fallback.
    pub fn detail_or(&self, fallback: &str) -> String {
        let detail = self.to_string();
        if detail.trim().is_empty() {
            fallback.to_string()
        } else {
            detail
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// What the user ends up seeing for a settled operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema, ToSchema)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn from_error(error: &ConsoleError, fallback: &str) -> Self {
        Self::error(error.user_message(fallback))
    }
}

impl From<&ConsoleError> for Notification {
    fn from(value: &ConsoleError) -> Self {
        Notification::from_error(value, GENERIC_ERROR_MESSAGE)
    }
}

impl From<ConsoleError> for Notification {
    fn from(value: ConsoleError) -> Self {
        Notification::from(&value)
    }
}
