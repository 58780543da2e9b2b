//! Route handlers.

use super::error::ServerError;
use super::{form, templates, AppState};
use crate::convert::convert;
use crate::pipeline::input::ConversionRequest;
use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Register all routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/convert", post(convert_upload))
        .route("/health", get(health))
}

/// The upload form (`GET /`).
pub async fn index() -> Result<Html<String>, ServerError> {
    Ok(Html(templates::render_form()?))
}

/// Run one conversion from a submitted form (`POST /convert`).
///
/// Missing or mistyped uploads are rejected with 400 before anything is
/// staged. Otherwise the response is always the result page, whether or not
/// the converter produced a file.
pub async fn convert_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Html<String>, ServerError> {
    debug!("received conversion form");
    let submission = form::read_submission(&mut multipart).await?;
    let request = ConversionRequest::from_uploads(
        submission.source,
        submission.reference,
        submission.options,
    )?;

    let report = convert(request, &state.config.converter).await?;
    info!(
        succeeded = report.succeeded(),
        exit_code = ?report.exit_code,
        "conversion request finished"
    );
    Ok(Html(templates::render_report(&report)?))
}

/// Heartbeat (`GET /health`).
pub async fn health() -> Json<Value> {
    Json(json!({
        "status":  "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_response_has_ok_status() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
        assert!(!body["version"].as_str().unwrap_or("").is_empty());
    }

    #[tokio::test]
    async fn index_renders_form() {
        let Html(page) = index().await.unwrap();
        assert!(page.contains(r#"action="/convert""#));
    }
}
