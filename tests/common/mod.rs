//! Shared helpers for the integration tests.
//!
//! The converter is replaced by the shell scripts in `tests/fixtures/`, so
//! these tests need neither pandoc nor a network. They are Unix-only.

#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tex2word::ConverterConfig;

pub const MINIMAL_DOC: &str = "\\documentclass{article}\n\\begin{document}\nHello.\n\\end{document}\n";
pub const UNTERMINATED_DOC: &str = "\\documentclass{article}\n\\begin{document}\nHello.\n";

/// Executable copies of every fixture script, made once per test binary.
///
/// The checked-in `tests/fixtures/` tree is only read. All copies are written
/// and closed inside this one initialiser, before any test can spawn a
/// process, so executing them can never hit ETXTBSY.
static STUBS: Lazy<TempDir> = Lazy::new(|| {
    let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let dir = tempfile::tempdir().unwrap();
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let src = entry.unwrap().path();
        let dest = dir.path().join(src.file_name().unwrap());
        std::fs::copy(&src, &dest).unwrap();
        std::fs::set_permissions(&dest, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    dir
});

/// Path of an executable copy of a stub converter script.
pub fn stub(name: &str) -> PathBuf {
    let path = STUBS.path().join(name);
    assert!(path.exists(), "no fixture named {name}");
    path
}

/// A converter config pointing at `script`, staging into a fresh temp dir.
///
/// The returned [`TempDir`] must outlive the conversion.
pub fn config_for(script: &str) -> (ConverterConfig, TempDir) {
    config_with_timeout(script, Some(Duration::from_secs(30)))
}

pub fn config_with_timeout(script: &str, timeout: Option<Duration>) -> (ConverterConfig, TempDir) {
    config_with_program(&stub(script).to_string_lossy(), timeout)
}

/// Like [`config_for`] but with an arbitrary program name.
pub fn config_with_program(program: &str, timeout: Option<Duration>) -> (ConverterConfig, TempDir) {
    Lazy::force(&STUBS);
    let dir = tempfile::tempdir().unwrap();
    let config = ConverterConfig::builder()
        .program(program)
        .timeout(timeout)
        .staging_dir(dir.path())
        .build()
        .unwrap();
    (config, dir)
}

/// One part of a hand-built `multipart/form-data` body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        bytes: &'a [u8],
    },
}

pub const BOUNDARY: &str = "tex2word-test-boundary";

/// Encode `parts` as a multipart body using [`BOUNDARY`].
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
