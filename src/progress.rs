//! Progress-callback trait for per-stage conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConverterConfigBuilder::progress_callback`] to observe a
//! conversion as it moves through the pipeline. The CLI uses it to drive a
//! spinner while the converter runs; the server does not install one and
//! relies on `tracing` instead.
//!
//! # Example
//!
//! ```rust
//! use tex2word::{ConversionProgressCallback, ConverterConfig, ConverterCommand};
//! use std::sync::Arc;
//!
//! struct PrintCommand;
//!
//! impl ConversionProgressCallback for PrintCommand {
//!     fn on_converter_start(&self, command: &ConverterCommand) {
//!         eprintln!("running: {command}");
//!     }
//! }
//!
//! let config = ConverterConfig::builder()
//!     .progress_callback(Arc::new(PrintCommand))
//!     .build()
//!     .unwrap();
//! ```

use crate::pipeline::autofix::AutofixOutcome;
use crate::pipeline::command::ConverterCommand;
use crate::pipeline::invoke::ConverterOutput;
use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as a conversion moves from stage to stage.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`: the server
/// runs many conversions at once and they may share one callback.
pub trait ConversionProgressCallback: Send + Sync {
    /// Uploads have been written to disk.
    fn on_staged(&self, source: &Path, reference: Option<&Path>) {
        let _ = (source, reference);
    }

    /// The auto-fix stage finished (or was skipped).
    fn on_autofix(&self, outcome: AutofixOutcome) {
        let _ = outcome;
    }

    /// The converter is about to be spawned.
    fn on_converter_start(&self, command: &ConverterCommand) {
        let _ = command;
    }

    /// The converter exited, was killed, or could not be started.
    fn on_converter_finished(&self, output: &ConverterOutput) {
        let _ = output;
    }

    /// The report is ready; `succeeded` is whether an output file exists.
    fn on_conversion_complete(&self, succeeded: bool) {
        let _ = succeeded;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConverterConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        staged: AtomicUsize,
        started: AtomicUsize,
        finished: AtomicUsize,
        succeeded: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_staged(&self, _source: &Path, _reference: Option<&Path>) {
            self.staged.fetch_add(1, Ordering::SeqCst);
        }

        fn on_converter_start(&self, _command: &ConverterCommand) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }

        fn on_converter_finished(&self, _output: &ConverterOutput) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, succeeded: bool) {
            if succeeded {
                self.succeeded.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_staged(Path::new("/tmp/a.tex"), None);
        cb.on_autofix(AutofixOutcome::MarkerAppended);
        cb.on_converter_start(&ConverterCommand::new("pandoc"));
        cb.on_converter_finished(&ConverterOutput::default());
        cb.on_conversion_complete(false);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_staged(Path::new("/tmp/a.tex"), Some(Path::new("/tmp/r.docx")));
        tracker.on_converter_start(&ConverterCommand::new("pandoc"));
        tracker.on_converter_finished(&ConverterOutput::default());
        tracker.on_conversion_complete(true);
        tracker.on_conversion_complete(false);

        assert_eq!(tracker.staged.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.started.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.finished.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.succeeded.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_autofix(AutofixOutcome::NotRequested);
    }
}
