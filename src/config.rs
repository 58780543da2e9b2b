//! Configuration types for LaTeX-to-Word conversion.
//!
//! Two structs split the knobs by who owns them:
//!
//! * [`ConversionOptions`]: what the *user* picked on the form for one
//!   request (format, numbering, auto-fix, extra arguments). It is a plain
//!   value passed into the pipeline stages; nothing in the pipeline reads
//!   form state from anywhere else.
//! * [`ConverterConfig`]: how the *host* runs the converter (program name,
//!   timeout, staging directory, download name, progress hooks). Built once
//!   at startup and shared across requests.
//!
//! Both are built through builders so callers set only what they care about
//! and rely on documented defaults for the rest.

use crate::error::Tex2WordError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default external converter.
pub const DEFAULT_PROGRAM: &str = "pandoc";

/// Default base name of the downloadable artifact (`converted.docx`).
pub const DEFAULT_DOWNLOAD_BASENAME: &str = "converted";

/// Default converter timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

// ── Output format ────────────────────────────────────────────────────────

/// Document format produced by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Office Open XML word-processing document. (default)
    #[default]
    Docx,
    /// OpenDocument text.
    Odt,
}

impl OutputFormat {
    /// All selectable formats, in the order the form lists them.
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Docx, OutputFormat::Odt];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Odt => "odt",
        }
    }

    /// MIME type used when offering the artifact for download.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputFormat::Odt => "application/vnd.oasis.opendocument.text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Tex2WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx" => Ok(OutputFormat::Docx),
            "odt" => Ok(OutputFormat::Odt),
            other => Err(Tex2WordError::InvalidConfig(format!(
                "Unknown output format '{other}' (expected docx or odt)"
            ))),
        }
    }
}

// ── Per-request options ──────────────────────────────────────────────────

/// Options chosen for a single conversion.
///
/// Built via [`ConversionOptions::builder()`] or [`ConversionOptions::default()`].
///
/// # Example
/// ```rust
/// use tex2word::{ConversionOptions, OutputFormat};
///
/// let options = ConversionOptions::builder()
///     .format(OutputFormat::Odt)
///     .number_sections(false)
///     .extra_args("--toc")
///     .build();
/// assert_eq!(options.format, OutputFormat::Odt);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// Output format. Default: docx.
    pub format: OutputFormat,

    /// Pass `--number-sections` to the converter. Default: true.
    pub number_sections: bool,

    /// Run the auto-fix preprocessor on the staged source. Default: true.
    pub attempt_fix: bool,

    /// Free-text extra converter arguments. Default: empty.
    ///
    /// Split on whitespace and appended verbatim: no quoting, escaping or
    /// validation is applied. Whoever can fill this field can pass any flag
    /// the converter understands.
    pub extra_args: String,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            number_sections: true,
            attempt_fix: true,
            extra_args: String::new(),
        }
    }
}

impl ConversionOptions {
    /// Create a new builder starting from the defaults.
    pub fn builder() -> ConversionOptionsBuilder {
        ConversionOptionsBuilder {
            options: Self::default(),
        }
    }

    /// Whitespace-split tokens of [`Self::extra_args`], in order.
    pub fn extra_tokens(&self) -> Vec<String> {
        self.extra_args
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

/// Builder for [`ConversionOptions`].
#[derive(Debug)]
pub struct ConversionOptionsBuilder {
    options: ConversionOptions,
}

impl ConversionOptionsBuilder {
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.options.format = format;
        self
    }

    pub fn number_sections(mut self, v: bool) -> Self {
        self.options.number_sections = v;
        self
    }

    pub fn attempt_fix(mut self, v: bool) -> Self {
        self.options.attempt_fix = v;
        self
    }

    pub fn extra_args(mut self, args: impl Into<String>) -> Self {
        self.options.extra_args = args.into();
        self
    }

    pub fn build(self) -> ConversionOptions {
        self.options
    }
}

// ── Host-level converter configuration ───────────────────────────────────

/// How the external converter is run.
///
/// # Example
/// ```rust
/// use tex2word::ConverterConfig;
///
/// let config = ConverterConfig::builder()
///     .program("/usr/local/bin/pandoc")
///     .timeout_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.program, "/usr/local/bin/pandoc");
/// ```
#[derive(Clone)]
pub struct ConverterConfig {
    /// Converter program, resolved through `PATH` when not absolute. Default: `pandoc`.
    pub program: String,

    /// Wall-clock limit for one converter run. `None` waits forever. Default: 300 s.
    ///
    /// When the limit is hit the child is killed; whatever file it may have
    /// written still decides the verdict.
    pub timeout: Option<Duration>,

    /// Directory for staged uploads. `None` uses the platform temp dir.
    ///
    /// Staged files are never removed by this crate.
    pub staging_dir: Option<PathBuf>,

    /// Base name of the offered download. Default: `converted`.
    pub download_basename: String,

    /// Optional stage-by-stage progress hooks.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            staging_dir: None,
            download_basename: DEFAULT_DOWNLOAD_BASENAME.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConverterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterConfig")
            .field("program", &self.program)
            .field("timeout", &self.timeout)
            .field("staging_dir", &self.staging_dir)
            .field("download_basename", &self.download_basename)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConverterConfig {
    /// Create a new builder for `ConverterConfig`.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConverterConfig`].
#[derive(Debug)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.config.program = program.into();
        self
    }

    /// Timeout in seconds; `0` disables the limit.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.staging_dir = Some(dir.into());
        self
    }

    pub fn download_basename(mut self, name: impl Into<String>) -> Self {
        self.config.download_basename = name.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConverterConfig, Tex2WordError> {
        let c = &self.config;
        if c.program.trim().is_empty() {
            return Err(Tex2WordError::InvalidConfig(
                "Converter program must not be empty".into(),
            ));
        }
        let name = c.download_basename.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(Tex2WordError::InvalidConfig(format!(
                "Download name must be a plain file name, got '{}'",
                c.download_basename
            )));
        }
        if let Some(ref dir) = c.staging_dir {
            if !dir.is_dir() {
                return Err(Tex2WordError::InvalidConfig(format!(
                    "Staging directory '{}' does not exist",
                    dir.display()
                )));
            }
        }
        Ok(self.config)
    }
}
