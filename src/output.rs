//! Result types returned by a conversion.

use crate::config::OutputFormat;
use crate::error::Tex2WordError;
use crate::pipeline::autofix::AutofixOutcome;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything the user gets to see about one conversion.
///
/// The verdict is [`ConversionReport::succeeded`]: a file exists at
/// `output_path` or it does not. `exit_code` is recorded for diagnosis only,
/// so a converter that exits non-zero but writes a file is a success, and
/// one that exits zero without writing the file is a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Space-joined argv, for display.
    pub command_line: String,
    pub argv: Vec<String>,
    pub autofix: AutofixOutcome,
    /// Captured stdout, a newline, then captured stderr.
    pub log: String,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    /// Where the converter was told to write.
    pub output_path: PathBuf,
    pub artifact: Option<Artifact>,
    pub stats: ConversionStats,
}

impl ConversionReport {
    pub fn succeeded(&self) -> bool {
        self.artifact.is_some()
    }

    /// Turn a report without an artifact into [`Tex2WordError::ConversionFailed`].
    pub fn into_result(self) -> Result<Artifact, Tex2WordError> {
        match self.artifact {
            Some(artifact) => Ok(artifact),
            None => Err(Tex2WordError::ConversionFailed {
                expected: self.output_path,
                log: self.log,
            }),
        }
    }
}

/// The converted document, ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Download name, e.g. `converted.docx`.
    pub file_name: String,
    pub format: OutputFormat,
    pub content_type: String,
    /// Location of the file the converter wrote.
    pub path: PathBuf,
    pub size_bytes: u64,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// `data:` URI embedding the whole file, usable as a download `href`.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Timing for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub staged_bytes: u64,
    pub converter_duration_ms: u64,
    pub total_duration_ms: u64,
}
