//! # tex2word
//!
//! Convert LaTeX documents to Word (`.docx`) or OpenDocument (`.odt`) files
//! by driving an external converter (pandoc by default), from a browser
//! form, the command line, or as a library.
//!
//! ## Pipeline Overview
//!
//! ```text
//! .tex upload (+ optional reference.docx)
//!  │
//!  ├─ 1. Intake    source present? extensions allowed?
//!  ├─ 2. Stage     bytes → uniquely named temp files
//!  ├─ 3. Auto-fix  append missing \end{document} (optional)
//!  ├─ 4. Command   pandoc <in> -o <out> [--reference-doc r] [--number-sections] [extra…]
//!  ├─ 5. Invoke    run with timeout, capture stdout + stderr
//!  └─ 6. Report    output file exists? → download, else failure + log
//! ```
//!
//! The verdict is decided only by whether the output file exists after the
//! converter returns. The exit code is shown to the user but never trusted.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tex2word::{convert_file, ConversionOptions, ConverterConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = convert_file(
//!         "paper.tex",
//!         None,
//!         ConversionOptions::default(),
//!         &ConverterConfig::default(),
//!     )
//!     .await?;
//!     eprintln!("{}", report.log);
//!     let artifact = report.into_result()?;
//!     std::fs::write(&artifact.file_name, &artifact.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | The axum web form ([`server`]) |
//! | `cli`    | on      | The `tex2word` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionOptions, ConversionOptionsBuilder, ConverterConfig, ConverterConfigBuilder,
    OutputFormat,
};
pub use convert::{convert, convert_file, convert_sync, save_artifact};
pub use error::Tex2WordError;
pub use output::{Artifact, ConversionReport, ConversionStats};
pub use pipeline::autofix::AutofixOutcome;
pub use pipeline::command::ConverterCommand;
pub use pipeline::input::{ConversionRequest, UploadedDocument};
pub use pipeline::invoke::ConverterOutput;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
