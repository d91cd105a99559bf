//! Unified application error types for Taskflow.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. [`ErrorResponse`] is the structured
//! body handed to callers, independent of the layer the error came from.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Input validation failed.
    Validation,
    /// The requested resource (or user) was not found.
    NotFound,
    /// The caller does not have permission to perform the action.
    Forbidden,
    /// A resource with the same identity already exists.
    Conflict,
    /// A data-access (store) error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An external collaborator (mail server, etc.) failed.
    ExternalService,
    /// An internal server error occurred.
    Internal,
}

impl ErrorKind {
    /// Short machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "ERR_VALIDATION",
            Self::NotFound => "ERR_NOT_FOUND",
            Self::Forbidden => "ERR_FORBIDDEN",
            Self::Conflict => "ERR_DUPLICATE",
            Self::Database => "ERR_DATA_ACCESS",
            Self::Configuration => "ERR_CONFIGURATION",
            Self::Serialization => "ERR_SERIALIZATION",
            Self::ExternalService => "ERR_EXTERNAL_SERVICE",
            Self::Internal => "ERR_INTERNAL",
        }
    }

    /// HTTP-equivalent status code for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::Forbidden => 403,
            Self::Conflict => 409,
            Self::ExternalService => 502,
            Self::Database | Self::Configuration | Self::Serialization | Self::Internal => 500,
        }
    }

    /// Human-readable title for this kind.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Validation => "Bad Request",
            Self::NotFound => "Not Found",
            Self::Forbidden => "Access Forbidden",
            Self::Conflict => "Duplicate Resource",
            Self::Database => "Data Access Error",
            Self::Configuration => "Configuration Error",
            Self::Serialization => "Serialization Error",
            Self::ExternalService => "External Service Error",
            Self::Internal => "Internal Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Taskflow.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a permission error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a duplicate-resource error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a data-access error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Machine-readable code of this error.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = err
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let reasons: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                format!("{field}: {}", reasons.join(", "))
            })
            .collect();
        fields.sort();
        Self::with_source(ErrorKind::Validation, fields.join("; "), err)
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind as DbKind;

        let kind = match &err {
            sqlx::Error::RowNotFound => {
                return Self::with_source(ErrorKind::NotFound, "Record not found", err);
            }
            sqlx::Error::Database(db) => Some(db.kind()),
            _ => None,
        };
        match kind {
            Some(DbKind::UniqueViolation) => Self::with_source(
                ErrorKind::Conflict,
                "A resource with this value already exists",
                err,
            ),
            Some(DbKind::ForeignKeyViolation) => Self::with_source(
                ErrorKind::Conflict,
                "Referenced resource does not exist or is still in use",
                err,
            ),
            Some(DbKind::NotNullViolation) => Self::with_source(
                ErrorKind::Validation,
                "A required field is missing",
                err,
            ),
            Some(DbKind::CheckViolation) => {
                Self::with_source(ErrorKind::Validation, "A field value is out of range", err)
            }
            _ => Self::with_source(ErrorKind::Database, format!("Database error: {err}"), err),
        }
    }
}

/// Structured error body returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP-equivalent status code.
    pub status: u16,
    /// Short error title.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// The operation or path that failed.
    pub path: String,
    /// Machine-readable error code.
    pub error_code: String,
    /// Correlation identifier, matches the trace id in logs.
    pub trace_id: String,
    /// When the response was produced.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ErrorResponse {
    /// Build a response body for an error raised while serving `path`.
    pub fn from_error(err: &AppError, path: impl Into<String>, trace_id: impl Into<String>) -> Self {
        let message = match err.kind {
            // Internal details stay in the logs.
            ErrorKind::Internal if err.message.is_empty() => "Internal server error".to_string(),
            _ => err.message.clone(),
        };
        Self {
            status: err.kind.status_code(),
            error: err.kind.title().to_string(),
            message,
            path: path.into(),
            error_code: err.code().to_string(),
            trace_id: trace_id.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}
