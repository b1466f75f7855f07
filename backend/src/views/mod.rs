//! Server-rendered HTML pages.
//!
//! Pages share the JSON API's services and policy; they only differ in how
//! results and denials are presented.

pub mod admin_users;
pub mod complaints;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::error::AppError;

/// Denials render as explicit pages, never as partial data.
#[derive(Debug)]
pub enum PageError {
    Unauthenticated,
    Forbidden,
    NotFound,
    Internal,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, title, message) = match self {
            PageError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Please sign in to continue.",
            ),
            PageError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Unauthorized",
                "You do not have permission to view this page.",
            ),
            PageError::NotFound => (
                StatusCode::NOT_FOUND,
                "Not found",
                "The page you requested does not exist.",
            ),
            PageError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "Please try again later.",
            ),
        };
        let body = format!("<h1>{title}</h1>\n<p>{message}</p>");
        (status, Html(layout(title, &body))).into_response()
    }
}

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Unauthorized(_) => PageError::Unauthenticated,
            AppError::Forbidden(_) => PageError::Forbidden,
            AppError::NotFound(_) => PageError::NotFound,
            other => {
                tracing::error!(error = %other, "Page rendering failed");
                PageError::Internal
            }
        }
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Wraps page content in the shared document shell. `title` is escaped;
/// `body` must already be safe HTML.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} | Complaint Desk</title>\n</head>\n<body>\n<main>\n{}\n</main>\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}
