//! Result reporting: decide the verdict and package the download.
//!
//! The only success oracle is whether a file exists at the expected output
//! path after the converter returns. The exit code is carried into the
//! report for the user to read but is never interpreted here.

use crate::config::OutputFormat;
use crate::error::Tex2WordError;
use crate::output::Artifact;
use std::path::Path;
use tracing::{debug, info};

/// Download name for a given base name and format, e.g. `converted.odt`.
pub fn download_name(basename: &str, format: OutputFormat) -> String {
    format!("{}.{}", basename, format.extension())
}

/// Read the converter's output into an [`Artifact`] if the file exists.
///
/// Returns `Ok(None)` when nothing was written, which is the failure case.
/// A file that exists but cannot be read is a hard error.
pub async fn collect_artifact(
    output_path: &Path,
    format: OutputFormat,
    basename: &str,
) -> Result<Option<Artifact>, Tex2WordError> {
    let read_err = |source| Tex2WordError::ArtifactRead {
        path: output_path.to_path_buf(),
        source,
    };

    if !tokio::fs::try_exists(output_path).await.map_err(read_err)? {
        debug!(path = %output_path.display(), "no output file written");
        return Ok(None);
    }

    let bytes = tokio::fs::read(output_path).await.map_err(read_err)?;
    info!(
        path = %output_path.display(),
        size_bytes = bytes.len(),
        "converter produced output"
    );
    Ok(Some(Artifact {
        file_name: download_name(basename, format),
        format,
        content_type: format.mime_type().to_string(),
        path: output_path.to_path_buf(),
        size_bytes: bytes.len() as u64,
        bytes,
    }))
}
