use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// A message, or the list of validation failures for `VALIDATION_ERROR`.
    pub error: Value,
    pub code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),
    /// No usable session was presented.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// A session was presented but it lacks the required permission.
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("user already exists")]
    DuplicateEmail,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("validation failed: {0:?}")]
    Validation(Vec<String>),
    #[error(transparent)]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, code) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, Value::String(msg), "NOT_FOUND"),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Value::String(msg), "UNAUTHORIZED")
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, Value::String(msg), "FORBIDDEN"),
            AppError::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                Value::String("User already exists".to_string()),
                "DUPLICATE_EMAIL",
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, Value::String(msg), "CONFLICT"),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Value::String(msg), "BAD_REQUEST")
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Value::from(errors),
                "VALIDATION_ERROR",
            ),
            AppError::InternalServerError(err) => {
                tracing::error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Value::String("Internal server error".to_string()),
                    "INTERNAL_SERVER_ERROR",
                )
            }
        };

        let body = Json(ErrorResponse {
            error,
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::InternalServerError(err.into()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = Vec::new();
        collect_validation_messages(&errors, "", &mut messages);
        messages.sort();
        AppError::Validation(messages)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![rejection.body_text()])
    }
}

// Nested structs and lists are flattened to `parent.child` / `parent[0].child`.
fn collect_validation_messages(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| format!("{}: {}", path, e.code)));
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_validation_messages(inner, &path, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_validation_messages(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}
