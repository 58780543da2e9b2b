//! Error types for the tex2word library.
//!
//! A single fatal error type, [`Tex2WordError`], covers everything that stops
//! a conversion from producing a report at all: missing or mistyped uploads,
//! staging I/O, and configuration mistakes.
//!
//! A converter that runs but fails is *not* an error here. Its outcome lives
//! in [`crate::output::ConversionReport`], whose verdict is decided solely by
//! whether the expected output file exists. Callers that want a hard error
//! for that case use [`crate::output::ConversionReport::into_result`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the tex2word library.
#[derive(Debug, Error)]
pub enum Tex2WordError {
    // ── Intake errors ─────────────────────────────────────────────────────
    /// No LaTeX source was uploaded.
    #[error("Please upload a LaTeX (.tex) file first")]
    MissingSource,

    /// An upload carries a file extension the form does not accept.
    #[error("'{file_name}' is not a .{expected} file ({role} must be .{expected})")]
    UnsupportedExtension {
        role: &'static str,
        expected: &'static str,
        file_name: String,
    },

    // ── Filesystem errors ─────────────────────────────────────────────────
    /// A document given by path could not be read.
    #[error("Failed to read '{path}': {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write a staged temporary file.
    #[error("Failed to stage upload in '{dir}': {source}")]
    Staging {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not read or rewrite the staged source during auto-fix.
    #[error("Auto-fix failed on '{path}': {source}")]
    Autofix {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converter produced an output file that could not be read back.
    #[error("Failed to read converted file '{path}': {source}")]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write the converted document to its final destination.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Converter errors ──────────────────────────────────────────────────
    /// The converter ran but no output file exists at the expected path.
    ///
    /// Only produced by [`crate::output::ConversionReport::into_result`].
    #[error("Conversion failed: no file was written to '{expected}'. Check the LaTeX source or the converter log.")]
    ConversionFailed { expected: PathBuf, log: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Tex2WordError {
    /// `true` when the error was caused by what the user submitted rather
    /// than by the host environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Tex2WordError::MissingSource | Tex2WordError::UnsupportedExtension { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extension_display() {
        let e = Tex2WordError::UnsupportedExtension {
            role: "reference document",
            expected: "docx",
            file_name: "style.dotx".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("style.dotx"), "got: {msg}");
        assert!(msg.contains(".docx"), "got: {msg}");
    }

    #[test]
    fn conversion_failed_display_mentions_path() {
        let e = Tex2WordError::ConversionFailed {
            expected: PathBuf::from("/tmp/tex2word-abc.docx"),
            log: "pandoc: error".into(),
        };
        assert!(e.to_string().contains("/tmp/tex2word-abc.docx"));
    }

    #[test]
    fn user_errors_are_classified() {
        assert!(Tex2WordError::MissingSource.is_user_error());
        assert!(!Tex2WordError::Internal("boom".into()).is_user_error());
        let staging = Tex2WordError::Staging {
            dir: PathBuf::from("/nonexistent"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(!staging.is_user_error());
    }
}
