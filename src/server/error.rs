//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are rendered as an HTML error
//! page with an appropriate status code.
//!
//! Internal errors (staging I/O, template failures) are logged with full
//! detail but only a generic message reaches the browser, so temp paths and
//! other host details never leak to clients.

use crate::error::Tex2WordError;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

const GENERIC_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// All errors that can occur while serving the form.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller sent an invalid form value.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The multipart body could not be read (malformed or over the size limit).
    #[error("multipart error: {0}")]
    Multipart(#[from] MultipartError),

    /// Propagated from the conversion pipeline.
    #[error("conversion error: {0}")]
    Conversion(#[from] Tex2WordError),

    /// A page template failed to render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl ServerError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            // Client-facing errors: expose the message directly.
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::Multipart(e) => (e.status(), e.body_text()),
            ServerError::Conversion(e) if e.is_user_error() => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }

            // Internal errors: log the detail, return a generic message.
            ServerError::Conversion(e) => {
                error!(error = %e, "conversion pipeline error");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_MESSAGE.to_owned())
            }
            ServerError::Template(e) => {
                error!(error = %e, "template rendering error");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_MESSAGE.to_owned())
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        match super::templates::render_error(&message) {
            Ok(page) => (status, Html(page)).into_response(),
            Err(e) => {
                error!(error = %e, "failed to render error page");
                (status, message).into_response()
            }
        }
    }
}
