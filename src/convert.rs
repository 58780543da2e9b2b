//! Conversion entry points.
//!
//! [`convert`] runs the whole pipeline for one request and returns a
//! [`ConversionReport`]. It only returns `Err` when no report can be made
//! (bad uploads, staging I/O); a converter that fails still yields `Ok`
//! with a report that has no artifact.

use crate::config::ConverterConfig;
use crate::error::Tex2WordError;
use crate::output::{Artifact, ConversionReport, ConversionStats};
use crate::pipeline::autofix::{self, AutofixOutcome};
use crate::pipeline::command::{self, StagedPaths};
use crate::pipeline::input::{ConversionRequest, DocumentRole, UploadedDocument};
use crate::pipeline::{invoke, report, stage};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Convert an uploaded LaTeX document through the configured converter.
///
/// # Example
/// ```rust,no_run
/// use tex2word::{convert, ConversionOptions, ConversionRequest, ConverterConfig, UploadedDocument};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = UploadedDocument::new("paper.tex", std::fs::read("paper.tex")?);
/// let request = ConversionRequest::from_uploads(Some(source), None, ConversionOptions::default())?;
/// let report = convert(request, &ConverterConfig::default()).await?;
/// println!("{}", report.log);
/// if let Some(artifact) = report.artifact {
///     std::fs::write(&artifact.file_name, &artifact.bytes)?;
/// }
/// # Ok(())
/// # }
/// ```
pub async fn convert(
    request: ConversionRequest,
    config: &ConverterConfig,
) -> Result<ConversionReport, Tex2WordError> {
    let total_start = Instant::now();
    let ConversionRequest {
        source,
        reference,
        options,
    } = request;
    let staged_bytes = source.bytes.len() as u64;
    info!(
        source = ?source.file_name,
        format = %options.format,
        "Starting conversion"
    );

    // ── Step 1: Stage uploads + auto-fix (blocking file I/O) ─────────────
    let staging_dir = config.staging_dir.clone();
    let attempt_fix = options.attempt_fix;
    let (input_path, reference_path, autofix) = tokio::task::spawn_blocking(move || {
        stage_and_fix(&source, reference.as_ref(), staging_dir.as_deref(), attempt_fix)
    })
    .await
    .map_err(|e| Tex2WordError::Internal(format!("Staging task panicked: {}", e)))??;

    if let Some(ref cb) = config.progress_callback {
        cb.on_staged(&input_path, reference_path.as_deref());
        cb.on_autofix(autofix);
    }

    // ── Step 2: Build command ────────────────────────────────────────────
    let staged = StagedPaths::new(input_path, reference_path, options.format);
    let cmd = command::build_command(&config.program, &staged, &options);
    info!(command = %cmd, "Running converter");

    // ── Step 3: Run converter ────────────────────────────────────────────
    if let Some(ref cb) = config.progress_callback {
        cb.on_converter_start(&cmd);
    }
    let output = invoke::run_converter(&cmd, config.timeout).await;
    if let Some(ref cb) = config.progress_callback {
        cb.on_converter_finished(&output);
    }

    // ── Step 4: Report ───────────────────────────────────────────────────
    let artifact =
        report::collect_artifact(&staged.output, options.format, &config.download_basename)
            .await?;
    let succeeded = artifact.is_some();

    let report = ConversionReport {
        command_line: cmd.to_string(),
        argv: cmd.argv(),
        autofix,
        log: output.combined_log(),
        exit_code: output.exit_code,
        timed_out: output.timed_out,
        output_path: staged.output,
        artifact,
        stats: ConversionStats {
            staged_bytes,
            converter_duration_ms: output.elapsed_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
        },
    };

    info!(
        succeeded,
        exit_code = ?report.exit_code,
        total_ms = report.stats.total_duration_ms,
        "Conversion complete"
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(succeeded);
    }

    Ok(report)
}

/// Convert a LaTeX file on disk, with an optional reference document.
///
/// The file names are checked the same way the web form checks uploads.
pub async fn convert_file(
    input: impl AsRef<Path>,
    reference: Option<&Path>,
    options: crate::config::ConversionOptions,
    config: &ConverterConfig,
) -> Result<ConversionReport, Tex2WordError> {
    let source = read_upload(input.as_ref()).await?;
    let reference = match reference {
        Some(path) => Some(read_upload(path).await?),
        None => None,
    };
    let request = ConversionRequest::from_uploads(Some(source), reference, options)?;
    convert(request, config).await
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    request: ConversionRequest,
    config: &ConverterConfig,
) -> Result<ConversionReport, Tex2WordError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Tex2WordError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(request, config))
}

/// Write an artifact to `path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn save_artifact(artifact: &Artifact, path: impl AsRef<Path>) -> Result<(), Tex2WordError> {
    let path = path.as_ref();
    let write_err = |source| Tex2WordError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = tmp_sibling(path);
    tokio::fs::write(&tmp_path, &artifact.bytes)
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    debug!(path = %path.display(), size_bytes = artifact.size_bytes, "Saved artifact");
    Ok(())
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn stage_and_fix(
    source: &UploadedDocument,
    reference: Option<&UploadedDocument>,
    staging_dir: Option<&Path>,
    attempt_fix: bool,
) -> Result<(PathBuf, Option<PathBuf>, AutofixOutcome), Tex2WordError> {
    let request_dir = stage::create_request_dir(staging_dir)?;
    let input = stage::stage_document(&source.bytes, DocumentRole::Source, &request_dir)?;
    let reference = reference
        .map(|r| stage::stage_document(&r.bytes, DocumentRole::Reference, &request_dir))
        .transpose()?;

    let outcome = if attempt_fix {
        autofix::apply_autofix(&input)?
    } else {
        AutofixOutcome::NotRequested
    };
    Ok((input, reference, outcome))
}

async fn read_upload(path: &Path) -> Result<UploadedDocument, Tex2WordError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| Tex2WordError::InputRead {
            path: path.to_path_buf(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    Ok(UploadedDocument { file_name, bytes })
}

/// `report.docx` → `report.docx.tmp`, next to the destination.
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn tmp_sibling_appends_suffix() {
        assert_eq!(
            tmp_sibling(Path::new("/out/paper.docx")),
            PathBuf::from("/out/paper.docx.tmp")
        );
    }

    #[test]
    fn stage_and_fix_respects_attempt_fix() {
        let dir = tempfile::tempdir().unwrap();
        let source = UploadedDocument::new("a.tex", b"\\begin{document}".to_vec());

        let (path, reference, outcome) =
            stage_and_fix(&source, None, Some(dir.path()), false).unwrap();
        assert_eq!(outcome, AutofixOutcome::NotRequested);
        assert!(reference.is_none());
        assert_eq!(std::fs::read(&path).unwrap(), b"\\begin{document}");

        let (path, _, outcome) = stage_and_fix(&source, None, Some(dir.path()), true).unwrap();
        assert_eq!(outcome, AutofixOutcome::MarkerAppended);
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .ends_with("\\end{document}\n"));
    }

    #[tokio::test]
    async fn save_artifact_writes_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested/out.odt");
        let artifact = Artifact {
            file_name: "converted.odt".into(),
            format: OutputFormat::Odt,
            content_type: OutputFormat::Odt.mime_type().into(),
            path: dir.path().join("src.odt"),
            size_bytes: 3,
            bytes: b"odt".to_vec(),
        };

        save_artifact(&artifact, &dest).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"odt");
        assert!(!tmp_sibling(&dest).exists());
    }

    #[tokio::test]
    async fn convert_file_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# hi").unwrap();

        let err = convert_file(
            &path,
            None,
            crate::config::ConversionOptions::default(),
            &ConverterConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Tex2WordError::UnsupportedExtension { .. }));
    }
}
