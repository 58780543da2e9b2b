//! Multipart form parsing.
//!
//! Browser quirks handled here:
//! * an `<input type=file>` left empty is still submitted, with an empty
//!   file name and no bytes; it counts as "no upload";
//! * an unchecked checkbox is not submitted at all, so absence means `false`.

use super::error::ServerError;
use crate::config::{ConversionOptions, OutputFormat};
use crate::pipeline::input::UploadedDocument;
use axum::extract::Multipart;
use tracing::debug;

pub const SOURCE_FIELD: &str = "source";
pub const REFERENCE_FIELD: &str = "reference";
pub const FORMAT_FIELD: &str = "format";
pub const NUMBER_SECTIONS_FIELD: &str = "number_sections";
pub const ATTEMPT_FIX_FIELD: &str = "attempt_fix";
pub const EXTRA_ARGS_FIELD: &str = "extra_args";

/// Everything the form sent, before intake validation.
#[derive(Debug, Clone, Default)]
pub struct FormSubmission {
    pub source: Option<UploadedDocument>,
    pub reference: Option<UploadedDocument>,
    pub options: ConversionOptions,
}

/// Read every field of the multipart body into a [`FormSubmission`].
pub async fn read_submission(multipart: &mut Multipart) -> Result<FormSubmission, ServerError> {
    let mut source = None;
    let mut reference = None;
    let mut format = OutputFormat::default();
    let mut number_sections = false;
    let mut attempt_fix = false;
    let mut extra_args = String::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            SOURCE_FIELD | REFERENCE_FIELD => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                let upload = file_upload(file_name, bytes.to_vec());
                if let Some(ref u) = upload {
                    debug!(field = %name, file_name = ?u.file_name, size_bytes = u.bytes.len(), "received upload");
                }
                if name == SOURCE_FIELD {
                    source = upload;
                } else {
                    reference = upload;
                }
            }
            FORMAT_FIELD => format = parse_format(&field.text().await?)?,
            NUMBER_SECTIONS_FIELD => number_sections = is_checked(&field.text().await?),
            ATTEMPT_FIX_FIELD => attempt_fix = is_checked(&field.text().await?),
            EXTRA_ARGS_FIELD => extra_args = field.text().await?,
            other => debug!(field = %other, "ignoring unknown form field"),
        }
    }

    Ok(FormSubmission {
        source,
        reference,
        options: ConversionOptions::builder()
            .format(format)
            .number_sections(number_sections)
            .attempt_fix(attempt_fix)
            .extra_args(extra_args)
            .build(),
    })
}

/// The `format` select value, rejected with a form-level message.
fn parse_format(value: &str) -> Result<OutputFormat, ServerError> {
    value.parse::<OutputFormat>().map_err(|_| {
        ServerError::BadRequest(format!(
            "Unsupported output format '{}'. Choose docx or odt.",
            value.trim()
        ))
    })
}

/// An empty file input (no name, no bytes) is treated as absent.
fn file_upload(file_name: Option<String>, bytes: Vec<u8>) -> Option<UploadedDocument> {
    let file_name = file_name.filter(|n| !n.is_empty());
    if file_name.is_none() && bytes.is_empty() {
        return None;
    }
    Some(UploadedDocument { file_name, bytes })
}

/// Checkbox value as sent by browsers (`on`) or API clients (`true`, `1`, `yes`).
fn is_checked(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}
