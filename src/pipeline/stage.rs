//! Staging: write uploaded bytes to uniquely named temporary files.
//!
//! The converter only understands file paths, so every upload is written to
//! disk before anything else happens. Each request first gets its own
//! directory under the staging root ([`create_request_dir`]); its uploads
//! and the converter's output live only there. A stale output from an
//! earlier request therefore can never be mistaken for this one's.
//!
//! Name uniqueness comes from `tempfile`, which retries on collision; no
//! locking is involved, so concurrent requests never share a path.
//!
//! Staged files and directories are persisted with `keep()` and are never
//! removed by this crate. Clean-up is left to the operating system's
//! temp-directory policy.

use crate::error::Tex2WordError;
use crate::pipeline::input::DocumentRole;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of every staged file and request directory name.
pub const STAGING_PREFIX: &str = "tex2word-";

fn staging_root(dir: Option<&Path>) -> PathBuf {
    dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir)
}

/// Create a fresh, uniquely named directory for one request and return it.
///
/// `dir` selects the staging root; `None` uses the platform temp dir.
pub fn create_request_dir(dir: Option<&Path>) -> Result<PathBuf, Tex2WordError> {
    let root = staging_root(dir);
    let request_dir = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(&root)
        .map_err(|source| Tex2WordError::Staging {
            dir: root.clone(),
            source,
        })?
        .keep();
    debug!(dir = %request_dir.display(), "created request staging dir");
    Ok(request_dir)
}

/// Write `bytes` to a fresh temp file ending in `suffix` and return its path.
///
/// `dir` selects the staging directory; `None` uses the platform temp dir.
/// Content is written as-is, never inspected.
pub fn stage_bytes(bytes: &[u8], suffix: &str, dir: Option<&Path>) -> Result<PathBuf, Tex2WordError> {
    stage_with_prefix(bytes, STAGING_PREFIX, suffix, &staging_root(dir))
}

/// Stage an upload inside a request directory, named for its role
/// (`tex2word-*.tex` or `tex2word-ref-*.docx`).
pub fn stage_document(
    bytes: &[u8],
    role: DocumentRole,
    request_dir: &Path,
) -> Result<PathBuf, Tex2WordError> {
    stage_with_prefix(bytes, role.staging_prefix(), role.staging_suffix(), request_dir)
}

fn stage_with_prefix(
    bytes: &[u8],
    prefix: &str,
    suffix: &str,
    dir: &Path,
) -> Result<PathBuf, Tex2WordError> {
    let staging_err = |source| Tex2WordError::Staging {
        dir: dir.to_path_buf(),
        source,
    };

    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .tempfile_in(dir)
        .map_err(staging_err)?;
    file.write_all(bytes).map_err(staging_err)?;
    file.flush().map_err(staging_err)?;

    let (_file, path) = file.keep().map_err(|e| staging_err(e.error))?;
    debug!(path = %path.display(), bytes = bytes.len(), "staged upload");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::pipeline::command::output_path_for;

    #[test]
    fn staged_file_holds_bytes_and_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let path = stage_document(b"\\begin{document}", DocumentRole::Source, dir.path()).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"\\begin{document}");
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("tex"));
        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(STAGING_PREFIX), "got: {name}");
    }

    #[test]
    fn staged_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let a = stage_bytes(b"a", ".tex", Some(dir.path())).unwrap();
        let b = stage_bytes(b"a", ".tex", Some(dir.path())).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn staged_file_survives_the_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = stage_document(b"PK", DocumentRole::Reference, dir.path()).unwrap();
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("docx"));
    }

    #[test]
    fn request_dirs_are_fresh_and_kept() {
        let root = tempfile::tempdir().unwrap();
        let a = create_request_dir(Some(root.path())).unwrap();
        let b = create_request_dir(Some(root.path())).unwrap();

        assert_ne!(a, b);
        assert!(a.is_dir() && b.is_dir());
        assert!(a.starts_with(root.path()));
        assert_eq!(std::fs::read_dir(&a).unwrap().count(), 0);
    }

    #[test]
    fn docx_output_never_lands_on_the_staged_reference() {
        let root = tempfile::tempdir().unwrap();
        for _ in 0..64 {
            let request_dir = create_request_dir(Some(root.path())).unwrap();
            let source = stage_document(b"x", DocumentRole::Source, &request_dir).unwrap();
            let reference = stage_document(b"PK", DocumentRole::Reference, &request_dir).unwrap();
            let output = output_path_for(&source, OutputFormat::Docx);

            assert_ne!(output, reference);
            assert!(!output.exists());
            let ref_name = reference.file_name().unwrap().to_string_lossy();
            assert!(ref_name.starts_with("tex2word-ref-"), "got: {ref_name}");
        }
    }

    #[test]
    fn unwritable_dir_is_a_staging_error() {
        let err = stage_bytes(b"x", ".tex", Some(Path::new("/definitely/not/a/dir"))).unwrap_err();
        assert!(matches!(err, Tex2WordError::Staging { .. }));
        let err = create_request_dir(Some(Path::new("/definitely/not/a/dir"))).unwrap_err();
        assert!(matches!(err, Tex2WordError::Staging { .. }));
    }
}
