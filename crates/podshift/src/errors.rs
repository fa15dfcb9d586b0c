//! CLI-specific errors

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Failures outside the conversion itself
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Failed to open input file '{}'", path.display())]
    #[diagnostic(
        code(podshift::cli::file_error),
        help("Check file permissions and ensure the path exists")
    )]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
