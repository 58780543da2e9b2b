//! CLI binary for tex2word.
//!
//! A thin shim over the library crate: `serve` maps flags to a
//! `ServerConfig` and runs the web form, `convert` runs one conversion and
//! writes the result next to the input.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tex2word::server::{self, ServerConfig, DEFAULT_BIND_ADDRESS};
use tex2word::{
    convert_file, save_artifact, AutofixOutcome, ConversionOptions, ConversionProgressCallback,
    ConverterCommand, ConverterConfig, ConverterOutput, OutputFormat, ProgressCallback,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner shown while the converter runs, with one log line per stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Staging");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_staged(&self, source: &Path, _reference: Option<&Path>) {
        self.bar
            .println(format!("  {} staged {}", green("✓"), dim(&source.display().to_string())));
    }

    fn on_autofix(&self, outcome: AutofixOutcome) {
        if let Some(notice) = outcome.notice() {
            self.bar.println(format!("  {} {}", green("✓"), notice));
        }
    }

    fn on_converter_start(&self, command: &ConverterCommand) {
        self.bar.println(format!("  {} {}", dim("$"), command));
        self.bar.set_prefix("Converting");
        self.bar.set_message(command.program.clone());
    }

    fn on_converter_finished(&self, output: &ConverterOutput) {
        let status = match (output.timed_out, output.exit_code) {
            (true, _) => red("timed out"),
            (false, Some(0)) => green("exit 0"),
            (false, Some(code)) => red(&format!("exit {code}")),
            (false, None) => red("no exit code"),
        };
        self.bar.println(format!(
            "  {} converter finished  {}  {}",
            dim("·"),
            status,
            dim(&format!("{:.1}s", output.elapsed_ms as f64 / 1000.0)),
        ));
    }

    fn on_conversion_complete(&self, _succeeded: bool) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve the upload form on http://127.0.0.1:8501
  tex2word serve

  # Convert one file (writes paper.docx)
  tex2word convert paper.tex

  # OpenDocument output with a style template and extra pandoc flags
  tex2word convert paper.tex --format odt --reference style.docx --extra-args "--toc"

  # Use a specific pandoc binary and a 60 s limit
  tex2word --converter /opt/pandoc/bin/pandoc --timeout 60 convert paper.tex

ENVIRONMENT VARIABLES:
  TEX2WORD_CONVERTER      Converter program (default: pandoc)
  TEX2WORD_TIMEOUT        Converter timeout in seconds, 0 = none (default: 300)
  TEX2WORD_STAGING_DIR    Directory for staged uploads (default: system temp)
  TEX2WORD_BIND           Server bind address
  TEX2WORD_MAX_UPLOAD_MB  Server request-body limit in MiB
  RUST_LOG                Overrides the log filter

NOTE:
  Staged uploads and converter outputs are left in the staging directory.
  Extra arguments are passed to the converter verbatim.
"#;

/// Convert LaTeX documents to Word/OpenDocument through pandoc.
#[derive(Parser, Debug)]
#[command(
    name = "tex2word",
    version,
    about = "Convert LaTeX documents to Word/OpenDocument through pandoc",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    converter: ConverterArgs,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "TEX2WORD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "TEX2WORD_QUIET")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct ConverterArgs {
    /// Converter program.
    #[arg(long, env = "TEX2WORD_CONVERTER", default_value = tex2word::config::DEFAULT_PROGRAM)]
    converter: String,

    /// Converter timeout in seconds (0 disables the limit).
    #[arg(long, env = "TEX2WORD_TIMEOUT", default_value_t = tex2word::config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Directory for staged uploads.
    #[arg(long, env = "TEX2WORD_STAGING_DIR")]
    staging_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the upload form over HTTP.
    Serve {
        /// Address to bind.
        #[arg(long, env = "TEX2WORD_BIND", default_value = DEFAULT_BIND_ADDRESS)]
        bind: String,

        /// Request-body limit in MiB.
        #[arg(long, env = "TEX2WORD_MAX_UPLOAD_MB", default_value_t = 50)]
        max_upload_mb: usize,

        /// Emit log records as newline-delimited JSON.
        #[arg(long, env = "TEX2WORD_LOG_JSON")]
        log_json: bool,
    },

    /// Convert a single .tex file.
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// LaTeX source file (.tex).
    input: PathBuf,

    /// Where to write the result. Default: input path with the format's extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Word style template passed as --reference-doc (.docx).
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "docx")]
    format: FormatArg,

    /// Do not pass --number-sections.
    #[arg(long)]
    no_number_sections: bool,

    /// Do not append a missing \end{document}.
    #[arg(long)]
    no_fix: bool,

    /// Extra converter arguments, split on whitespace.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    extra_args: String,

    /// Print the conversion report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Docx,
    Odt,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Docx => OutputFormat::Docx,
            FormatArg::Odt => OutputFormat::Odt,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The one-shot convert command shows a spinner; keep library logs
    // quiet there unless asked for.
    let serving = matches!(cli.command, Commands::Serve { .. });
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || !serving {
        "error"
    } else {
        "info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr);
    match cli.command {
        Commands::Serve { log_json: true, .. } => subscriber.json().init(),
        _ => subscriber.init(),
    }

    match cli.command {
        Commands::Serve {
            ref bind,
            max_upload_mb,
            ..
        } => {
            let config = ServerConfig {
                bind_address: bind.clone(),
                max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
                converter: build_converter_config(&cli.converter, None)?,
            };
            server::serve(config).await.context("Server failed")?;
        }
        Commands::Convert(ref args) => run_convert(&cli, args).await?,
    }

    Ok(())
}

async fn run_convert(cli: &Cli, args: &ConvertArgs) -> Result<()> {
    let show_progress = !cli.quiet && !args.json;
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_converter_config(&cli.converter, progress)?;

    let format: OutputFormat = args.format.into();
    let options = ConversionOptions::builder()
        .format(format)
        .number_sections(!args.no_number_sections)
        .attempt_fix(!args.no_fix)
        .extra_args(args.extra_args.clone())
        .build();

    let report = convert_file(&args.input, args.reference.as_deref(), options, &config)
        .await
        .context("Conversion could not start")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else if !cli.quiet {
        let log = report.log.trim();
        if !log.is_empty() {
            eprintln!("{}", dim("── converter log ──"));
            eprintln!("{log}");
        }
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension(format.extension()));
    let artifact = report.into_result()?;
    save_artifact(&artifact, &output_path)
        .await
        .context("Failed to save converted document")?;

    if !cli.quiet {
        eprintln!(
            "{}  {} bytes  →  {}",
            green("✔"),
            artifact.size_bytes,
            bold(&output_path.display().to_string()),
        );
    }
    Ok(())
}

/// Map shared CLI args to `ConverterConfig`.
fn build_converter_config(
    args: &ConverterArgs,
    progress: Option<ProgressCallback>,
) -> Result<ConverterConfig> {
    let mut builder = ConverterConfig::builder()
        .program(args.converter.clone())
        .timeout_secs(args.timeout);
    if let Some(ref dir) = args.staging_dir {
        builder = builder.staging_dir(dir.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}
