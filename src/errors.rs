use miette::Diagnostic;
use thiserror::Error;

/// A validation failure attached to a single field, e.g.
/// `{dates: "overlap with other shift"}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ScheduleError {
    #[error("I/O error: {0}")]
    #[diagnostic(code(shiftboard::io))]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    #[diagnostic(code(shiftboard::config))]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    #[diagnostic(code(shiftboard::db))]
    Db(#[from] sea_orm::DbErr),

    #[error("Validation failed: {0}")]
    #[diagnostic(code(shiftboard::validation))]
    Validation(#[from] FieldError),

    /// Covers both "forbidden" and "not found": a record outside the
    /// subject's accessible set is indistinguishable from a missing one.
    #[error("You are not authorized to access this page.")]
    #[diagnostic(code(shiftboard::access_denied))]
    AccessDenied,

    #[error("{0}")]
    #[diagnostic(code(shiftboard::other))]
    Other(String),
}

impl ScheduleError {
    /// The field-level error, if this is a validation failure.
    pub fn field_error(&self) -> Option<&FieldError> {
        match self {
            ScheduleError::Validation(e) => Some(e),
            _ => None,
        }
    }
}
