//! Auto-fix: append a missing `\end{document}` to the staged source.
//!
//! This is one rule and only one rule. It does not balance braces, close
//! environments or otherwise understand LaTeX. If the closing marker occurs
//! anywhere in the text the file is left alone; otherwise a newline, the
//! marker and a trailing newline are appended.
//!
//! The check decodes the file as UTF-8 with lossy replacement. The rewrite
//! keeps the original bytes untouched and only appends, so a file with
//! invalid UTF-8 is not mangled by the fix.

use crate::error::Tex2WordError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// The closing marker the conversion grammar expects.
pub const DOCUMENT_END_MARKER: &str = "\\end{document}";

/// What the auto-fix stage did to the staged source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutofixOutcome {
    /// Auto-fix was switched off for this request.
    NotRequested,
    /// The marker was already present; the file was not touched.
    AlreadyTerminated,
    /// The marker was appended.
    MarkerAppended,
}

impl AutofixOutcome {
    /// Short user-facing notice, if the stage ran.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            AutofixOutcome::NotRequested => None,
            AutofixOutcome::AlreadyTerminated => {
                Some("Auto-fix: \\end{document} already present, source left unchanged")
            }
            AutofixOutcome::MarkerAppended => Some("Auto-fix: appended missing \\end{document}"),
        }
    }
}

/// Return the fixed content, or `None` when `content` needs no change.
pub fn terminate_document(content: &[u8]) -> Option<Vec<u8>> {
    if String::from_utf8_lossy(content).contains(DOCUMENT_END_MARKER) {
        return None;
    }
    let mut fixed = Vec::with_capacity(content.len() + DOCUMENT_END_MARKER.len() + 2);
    fixed.extend_from_slice(content);
    fixed.push(b'\n');
    fixed.extend_from_slice(DOCUMENT_END_MARKER.as_bytes());
    fixed.push(b'\n');
    Some(fixed)
}

/// Apply the fix to the file at `path`, rewriting it in place if needed.
pub fn apply_autofix(path: &Path) -> Result<AutofixOutcome, Tex2WordError> {
    let autofix_err = |source| Tex2WordError::Autofix {
        path: path.to_path_buf(),
        source,
    };

    let content = std::fs::read(path).map_err(autofix_err)?;
    match terminate_document(&content) {
        None => {
            debug!(path = %path.display(), "source already terminated");
            Ok(AutofixOutcome::AlreadyTerminated)
        }
        Some(fixed) => {
            // `fs::write` truncates, so the file ends exactly at the new length.
            std::fs::write(path, &fixed).map_err(autofix_err)?;
            info!(path = %path.display(), "appended missing {}", DOCUMENT_END_MARKER);
            Ok(AutofixOutcome::MarkerAppended)
        }
    }
}
