//! Pipeline stages for LaTeX-to-Word conversion.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own and the orchestration in [`crate::convert`] stays a flat sequence.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ stage ──▶ autofix ──▶ command ──▶ invoke ──▶ report
//! (form)    (temp)    (\end{…})   (argv)      (child)    (file?)
//! ```
//!
//! 1. [`input`]   : check uploads (source present, extensions allowed)
//! 2. [`stage`]   : write uploads to uniquely named temp files
//! 3. [`autofix`] : append a missing `\end{document}` (optional)
//! 4. [`command`] : build the converter argv from options and paths
//! 5. [`invoke`]  : run the converter with a timeout, capture output
//! 6. [`report`]  : output file exists ⇒ artifact; otherwise failure

pub mod autofix;
pub mod command;
pub mod input;
pub mod invoke;
pub mod report;
pub mod stage;
