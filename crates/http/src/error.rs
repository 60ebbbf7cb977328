//! Error handling for the venuehub HTTP layer.
//!
//! The taxonomy follows the marketplace's failure surface: field-scoped
//! validation errors that block a write, conflicts (double bookings,
//! duplicate emails, price mismatches, illegal status transitions), the
//! authentication gate, and opaque internal failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use venuehub_store::StoreError;

/// One field-scoped validation failure, shown inline by clients.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub error: String,
}

impl FieldError {
    pub fn new(field: &'static str, error: impl Into<String>) -> Self {
        Self {
            field,
            error: error.into(),
        }
    }
}

/// Application error types that map to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed")]
    Validation { fields: Vec<FieldError> },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    /// The gate of the marketplace: anonymous callers of protected routes
    /// get this instead of a mutation.
    #[error("authentication required")]
    AuthRequired,

    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(fields: Vec<FieldError>) -> Self {
        Self::Validation { fields }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::Conflict { .. } => "conflict",
            AppError::NotFound { .. } => "not_found",
            AppError::AuthRequired => "auth_required",
            AppError::Forbidden { .. } => "forbidden",
            AppError::BadRequest { .. } => "bad_request",
            AppError::Internal(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::AuthRequired => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => AppError::not_found(format!("{entity} not found")),
            StoreError::DuplicateEmail | StoreError::OverlappingBooking => {
                AppError::conflict(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let trace_id = Uuid::new_v4();
        let timestamp = Utc::now().to_rfc3339();
        let status = self.status();
        let code = self.code();

        let (message, details) = match &self {
            AppError::Validation { fields } => (
                "validation failed".to_string(),
                serde_json::to_value(fields).unwrap_or_default(),
            ),
            AppError::Conflict { message }
            | AppError::NotFound { message }
            | AppError::Forbidden { message }
            | AppError::BadRequest { message } => (message.clone(), json!([])),
            AppError::AuthRequired => ("sign in to continue".to_string(), json!([])),
            AppError::Internal(e) => (e.to_string(), json!([])),
        };

        tracing::error!(
            trace_id = %trace_id,
            error_code = code,
            status_code = status.as_u16(),
            "request error"
        );

        // Outside debug builds internal details stay server-side.
        let message = if cfg!(not(debug_assertions)) && status == StatusCode::INTERNAL_SERVER_ERROR
        {
            "an internal server error occurred".to_string()
        } else {
            message
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
                "details": details,
                "trace_id": trace_id.to_string(),
                "timestamp": timestamp
            }
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_field_details() {
        let error = AppError::validation(vec![
            FieldError::new("end_time", "end time must be after start time"),
            FieldError::new("guest_count", "at least 1 guest required"),
        ]);
        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error.code(), "validation_error");
    }

    #[test]
    fn auth_gate_maps_to_unauthorized() {
        let response = AppError::AuthRequired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn store_errors_map_to_http_statuses() {
        let not_found: AppError = StoreError::NotFound("venue").into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let overlap: AppError = StoreError::OverlappingBooking.into();
        assert_eq!(overlap.status(), StatusCode::CONFLICT);

        let dup: AppError = StoreError::DuplicateEmail.into();
        assert_eq!(dup.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_error_mapping() {
        let error = AppError::Internal(anyhow::anyhow!("store wedged"));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
