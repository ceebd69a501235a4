use std::collections::BTreeMap;
use std::fmt;

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Field-to-message validation failures.
///
/// Violations are collected instead of short-circuiting so a caller
/// sees every invalid field in a single response.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `Err(AppError::Validation)` when any violation was recorded.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Malformed or out-of-range input, keyed by field name
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Referenced client or invoice does not exist
    #[error("{0}")]
    NotFound(String),

    /// Duplicate email or SIRET on create/update
    #[error("{0}")]
    Conflict(String),

    /// Database operation errors
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        match self {
            AppError::Validation(errors) => {
                HttpResponse::build(status_code).json(serde_json::json!({
                    "errors": errors,
                }))
            }
            AppError::NotFound(message) | AppError::Conflict(message) => {
                HttpResponse::build(status_code).json(serde_json::json!({
                    "error": {
                        "message": message,
                        "code": status_code.as_u16(),
                    }
                }))
            }
            // Unexpected failures are logged with detail but surfaced
            // generically, without leaking internals.
            other => {
                tracing::error!("internal error: {}", other);
                HttpResponse::build(status_code).json(serde_json::json!({
                    "error": {
                        "message": "an internal error occurred",
                        "code": status_code.as_u16(),
                    }
                }))
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    /// Single-field validation failure
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        AppError::Validation(errors)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
