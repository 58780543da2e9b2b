//! HTML pages, rendered with minijinja.
//!
//! Templates are compiled into the binary and auto-escaped (their names end
//! in `.html`), so converter logs and user-supplied arguments are safe to
//! echo back.

use crate::config::{ConversionOptions, OutputFormat};
use crate::output::ConversionReport;
use minijinja::{context, Environment};
use once_cell::sync::Lazy;

/// Shown when no output file exists after the converter returns.
pub const FAILURE_MESSAGE: &str =
    "Conversion failed. Check the LaTeX source or the pandoc log above.";

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("layout.html", include_str!("templates/layout.html"))
        .unwrap();
    env.add_template("form.html", include_str!("templates/form.html"))
        .unwrap();
    env.add_template("result.html", include_str!("templates/result.html"))
        .unwrap();
    env.add_template("error.html", include_str!("templates/error.html"))
        .unwrap();
    env
});

/// The upload form, pre-filled with the default options.
pub fn render_form() -> Result<String, minijinja::Error> {
    TEMPLATES.get_template("form.html")?.render(context! {
        formats => OutputFormat::ALL,
        defaults => ConversionOptions::default(),
    })
}

/// The result page: command, auto-fix notice, log, then download or failure.
pub fn render_report(report: &ConversionReport) -> Result<String, minijinja::Error> {
    let download = report.artifact.as_ref().map(|a| {
        context! {
            href => a.data_uri(),
            file_name => a.file_name.as_str(),
            size_bytes => a.size_bytes,
        }
    });
    TEMPLATES.get_template("result.html")?.render(context! {
        report => report,
        autofix_notice => report.autofix.notice(),
        download => download,
        failure_message => FAILURE_MESSAGE,
    })
}

/// A standalone error page.
pub fn render_error(message: &str) -> Result<String, minijinja::Error> {
    TEMPLATES
        .get_template("error.html")?
        .render(context! { message => message })
}
