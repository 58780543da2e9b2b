//! Form intake: the uploaded documents and the checks run before staging.
//!
//! The form accepts exactly one extension per upload slot: `.tex` for the
//! source and `.docx` for the optional style reference. Anything that fails
//! here is reported to the user immediately and nothing touches the disk.

use crate::config::ConversionOptions;
use crate::error::Tex2WordError;
use std::path::Path;
use tracing::debug;

/// Which upload slot a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    /// The LaTeX document to convert.
    Source,
    /// The Word style template handed to `--reference-doc`.
    Reference,
}

impl DocumentRole {
    /// Extension accepted for this slot, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            DocumentRole::Source => "tex",
            DocumentRole::Reference => "docx",
        }
    }

    /// Prefix of the staged temp file.
    ///
    /// The two prefixes differ in length, so a staged reference can never
    /// share a stem with the staged source (and thus with the output path
    /// derived from it).
    pub fn staging_prefix(self) -> &'static str {
        match self {
            DocumentRole::Source => "tex2word-",
            DocumentRole::Reference => "tex2word-ref-",
        }
    }

    /// Suffix used for the staged temp file.
    pub fn staging_suffix(self) -> &'static str {
        match self {
            DocumentRole::Source => ".tex",
            DocumentRole::Reference => ".docx",
        }
    }

    fn label(self) -> &'static str {
        match self {
            DocumentRole::Source => "LaTeX source",
            DocumentRole::Reference => "reference document",
        }
    }
}

/// Raw bytes of one upload plus the file name the client reported, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedDocument {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            bytes: bytes.into(),
        }
    }

    /// An upload with no client-side name (e.g. piped from a program).
    pub fn anonymous(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: None,
            bytes: bytes.into(),
        }
    }

    /// Reject the upload if its file name has the wrong extension.
    ///
    /// Uploads without a file name are accepted; there is nothing to check.
    pub fn check_extension(&self, role: DocumentRole) -> Result<(), Tex2WordError> {
        let Some(ref name) = self.file_name else {
            return Ok(());
        };
        let matches = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(role.extension()));
        if matches {
            Ok(())
        } else {
            Err(Tex2WordError::UnsupportedExtension {
                role: role.label(),
                expected: role.extension(),
                file_name: name.clone(),
            })
        }
    }
}

/// Everything one conversion needs, validated.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub source: UploadedDocument,
    pub reference: Option<UploadedDocument>,
    pub options: ConversionOptions,
}

impl ConversionRequest {
    /// Validate the uploads and bundle them with the options.
    ///
    /// Fails with [`Tex2WordError::MissingSource`] when no source was given,
    /// and with [`Tex2WordError::UnsupportedExtension`] when either upload
    /// has the wrong extension.
    pub fn from_uploads(
        source: Option<UploadedDocument>,
        reference: Option<UploadedDocument>,
        options: ConversionOptions,
    ) -> Result<Self, Tex2WordError> {
        let source = source.ok_or(Tex2WordError::MissingSource)?;
        source.check_extension(DocumentRole::Source)?;
        if let Some(ref r) = reference {
            r.check_extension(DocumentRole::Reference)?;
        }
        debug!(
            source = ?source.file_name,
            source_bytes = source.bytes.len(),
            has_reference = reference.is_some(),
            "accepted conversion request"
        );
        Ok(Self {
            source,
            reference,
            options,
        })
    }
}
