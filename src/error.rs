use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::SqlErr;
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("Database error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Something went wrong")]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationErrors> for AppError {
    // Collapse field errors into a single "field: problem, field: problem"
    // string, matching the wire format of the error envelope.
    fn from(errors: ValidationErrors) -> Self {
        let mut parts: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let detail = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{field}: {detail}")
                })
            })
            .collect();
        parts.sort();
        AppError::Validation(parts.join(", "))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, stack) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::OrmError(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => (
                    StatusCode::CONFLICT,
                    "Resource already exists".to_string(),
                    None,
                ),
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => (
                    StatusCode::NOT_FOUND,
                    "Resource not found".to_string(),
                    None,
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    self.to_string(),
                    debug_detail(&format!("{err:?}")),
                ),
            },
            AppError::DbError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                self.to_string(),
                debug_detail(&format!("{err:?}")),
            ),
            AppError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                self.to_string(),
                debug_detail(&format!("{err:?}")),
            ),
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %error, "request failed");
        }

        let body = ErrorBody {
            success: false,
            error,
            stack,
        };

        (status, axum::Json(body)).into_response()
    }
}

// Error detail is only exposed outside release builds.
fn debug_detail(detail: &str) -> Option<String> {
    if cfg!(debug_assertions) {
        Some(detail.to_string())
    } else {
        None
    }
}

pub type AppResult<T> = Result<T, AppError>;
