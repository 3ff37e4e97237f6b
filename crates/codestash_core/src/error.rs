//! Error types for API calls, rejected mutations, and configuration.
use thiserror::Error;

/// Failure reported by a [`crate::SnippetApi`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Not found")]
    NotFound,

    #[error("Response decoding error: {0}")]
    Decode(String),
}

/// How a failed mutation must be reconciled with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// 4xx, transport, or decoding failure: roll back locally only.
    Client,
    /// 5xx failure: roll back and re-fetch the whole list.
    Server,
}

impl ApiError {
    /// Build an error from a non-success HTTP status.
    ///
    /// # Returns
    /// [`ApiError::NotFound`] for 404, otherwise [`ApiError::Status`].
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        if status == 404 {
            return Self::NotFound;
        }
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound => Some(404),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Classify this error for rollback/refresh handling.
    pub fn failure_class(&self) -> FailureClass {
        match self.status() {
            Some(status) if (500..600).contains(&status) => FailureClass::Server,
            _ => FailureClass::Client,
        }
    }

    /// Whether reconciling this failure requires a full list re-fetch.
    pub fn requires_refresh(&self) -> bool {
        self.failure_class() == FailureClass::Server
    }
}

/// Reason a mutation was not started. None of these are user-visible errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("patch has no fields")]
    EmptyPatch,

    #[error("patch does not change the record")]
    Unchanged,

    #[error("title must not be blank")]
    BlankTitle,

    #[error("another mutation for this record is in flight")]
    InFlight,

    #[error("record is not in the list")]
    UnknownRecord,
}

impl Rejection {
    /// Whether this rejection is a validation skip rather than a concurrency guard.
    pub fn is_validation_skip(self) -> bool {
        matches!(self, Self::EmptyPatch | Self::Unchanged | Self::BlankTitle)
    }
}

/// Invalid configuration value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}
