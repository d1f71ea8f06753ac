//! Errors produced while reading a solution file

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Solution loading error
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SolutionError {
    /// The solution file does not exist
    #[error("could not find solution file: {}", path.display())]
    #[diagnostic(code(solution::file_not_found))]
    FileNotFound {
        /// Requested path
        path: PathBuf,
    },

    /// The solution file exists but could not be read
    #[error("failed to read solution file {}: {message}", path.display())]
    #[diagnostic(code(solution::io_error))]
    Io {
        /// Requested path
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// The file does not start with the solution header
    #[error("not a solution file: missing `Microsoft Visual Studio Solution File` header")]
    #[diagnostic(code(solution::missing_header))]
    MissingHeader,

    /// A line could not be understood
    #[error("line {line}: {message}")]
    #[diagnostic(code(solution::parse_error))]
    Parse {
        /// One-based line number
        line: usize,
        /// What was wrong with it
        message: String,
    },
}
