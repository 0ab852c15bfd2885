//! Error handling for the Weather Records Platform
//!
//! Every error is rendered as `{"error": {"code", "message", ...}}` with a
//! status code matching its cause.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{RecordQueryError, WeatherSource, INVALID_RANGE_MESSAGE};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Range resolution errors
    #[error("Invalid range: {}", INVALID_RANGE_MESSAGE)]
    InvalidRange,

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("{weather_source} weather source unavailable: {message}")]
    SourceUnavailable {
        weather_source: WeatherSource,
        message: String,
    },

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // External service errors
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Tag a failed fetch with the weather source it came from
    pub fn source_unavailable(weather_source: WeatherSource, cause: AppError) -> Self {
        let message = match cause {
            AppError::SourceUnavailable { message, .. } => message,
            AppError::ExternalService(message) => message,
            other => other.to_string(),
        };
        AppError::SourceUnavailable {
            weather_source,
            message,
        }
    }

    /// Validation error pinned to one input field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

impl From<RecordQueryError> for AppError {
    fn from(error: RecordQueryError) -> Self {
        match error {
            RecordQueryError::InvalidRange(_) => AppError::InvalidRange,
            other => AppError::ValidationError(other.to_string()),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<WeatherSource>,
}

impl ErrorDetail {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
            source: None,
        }
    }
}

impl AppError {
    /// Status code and body for this error
    pub fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::InvalidRange => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    field: Some("end_date".to_string()),
                    ..ErrorDetail::new("INVALID_RANGE", INVALID_RANGE_MESSAGE)
                },
            ),
            AppError::LocationNotFound(_) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("LOCATION_NOT_FOUND", "Location not found"),
            ),
            AppError::SourceUnavailable { weather_source, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    source: Some(*weather_source),
                    ..ErrorDetail::new(
                        "SOURCE_UNAVAILABLE",
                        format!("The {} weather source is unavailable", weather_source),
                    )
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    field: Some(field.clone()),
                    ..ErrorDetail::new("VALIDATION_ERROR", message.clone())
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", msg.clone()),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource)),
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorDetail::new("CONFLICT", msg.clone()),
            ),
            AppError::MissingCredentials(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("MISSING_CREDENTIALS", msg.clone()),
            ),
            AppError::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new("EXTERNAL_SERVICE_ERROR", format!("External service error: {}", msg)),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("CONFIGURATION_ERROR", format!("Configuration error: {}", msg)),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("DATABASE_ERROR", "A database error occurred"),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone()),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", "An internal server error occurred"),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_is_bad_request() {
        let (status, detail) = AppError::InvalidRange.status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail.code, "INVALID_RANGE");
        assert_eq!(detail.message, "end date must be on/after start date");
    }

    #[test]
    fn test_source_unavailable_carries_source() {
        let err = AppError::source_unavailable(
            WeatherSource::Historical,
            AppError::ExternalService("timed out".to_string()),
        );
        assert_eq!(err.to_string(), "historical weather source unavailable: timed out");

        let (status, detail) = err.status_and_detail();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(detail.source, Some(WeatherSource::Historical));
    }

    #[test]
    fn test_retagging_keeps_original_message() {
        let first = AppError::source_unavailable(
            WeatherSource::Forecast,
            AppError::Internal("boom".to_string()),
        );
        let again = AppError::source_unavailable(WeatherSource::Historical, first);
        assert!(matches!(
            again,
            AppError::SourceUnavailable { weather_source: WeatherSource::Historical, ref message }
                if message == "Internal server error: boom"
        ));
    }

    #[test]
    fn test_record_query_errors_map() {
        assert!(matches!(
            AppError::from(RecordQueryError::InvalidRange(INVALID_RANGE_MESSAGE)),
            AppError::InvalidRange
        ));
        assert!(matches!(
            AppError::from(RecordQueryError::MissingDates),
            AppError::ValidationError(_)
        ));
    }

    #[test]
    fn test_not_found_message() {
        let (status, detail) = AppError::NotFound("Record".to_string()).status_and_detail();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(detail.message, "Record not found");
    }

    #[test]
    fn test_conflict_is_409() {
        let (status, detail) =
            AppError::Conflict("Record was modified concurrently".to_string()).status_and_detail();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(detail.code, "CONFLICT");
    }
}
