//! Command builder: options + staged paths → converter argv.
//!
//! ```text
//! [program, input, -o, output, (--reference-doc, ref)?, (--number-sections)?, extra…]
//! ```
//!
//! The builder is a pure function of its inputs. Extra arguments are split
//! on whitespace and appended verbatim; nothing is quoted or validated.

use crate::config::{ConversionOptions, OutputFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const OUTPUT_FLAG: &str = "-o";
pub const REFERENCE_DOC_FLAG: &str = "--reference-doc";
pub const NUMBER_SECTIONS_FLAG: &str = "--number-sections";

/// Paths produced by staging, plus the output path derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPaths {
    pub input: PathBuf,
    pub output: PathBuf,
    pub reference: Option<PathBuf>,
}

impl StagedPaths {
    pub fn new(input: PathBuf, reference: Option<PathBuf>, format: OutputFormat) -> Self {
        Self {
            output: output_path_for(&input, format),
            input,
            reference,
        }
    }
}

/// The staged input path with its extension replaced by the format's.
pub fn output_path_for(input: &Path, format: OutputFormat) -> PathBuf {
    input.with_extension(format.extension())
}

/// A fully assembled converter invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ConverterCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program name followed by every argument.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl fmt::Display for ConverterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

/// Assemble the converter command for one request.
pub fn build_command(
    program: &str,
    staged: &StagedPaths,
    options: &ConversionOptions,
) -> ConverterCommand {
    let mut cmd = ConverterCommand::new(program)
        .arg(staged.input.to_string_lossy())
        .arg(OUTPUT_FLAG)
        .arg(staged.output.to_string_lossy());

    if let Some(ref reference) = staged.reference {
        cmd = cmd
            .arg(REFERENCE_DOC_FLAG)
            .arg(reference.to_string_lossy());
    }
    if options.number_sections {
        cmd = cmd.arg(NUMBER_SECTIONS_FLAG);
    }
    if !options.extra_args.trim().is_empty() {
        cmd = cmd.args(options.extra_tokens());
    }
    cmd
}
