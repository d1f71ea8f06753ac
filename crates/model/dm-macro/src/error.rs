//! Errors produced while loading a macro

use dm_xml::XmlError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Macro loading error
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MacroError {
    /// An argument violates the caller contract
    #[error("invalid argument `{name}`: {reason}")]
    #[diagnostic(code(dismacro::invalid_argument))]
    InvalidArgument {
        /// Parameter name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// The macro file does not exist
    #[error("the macro file '{}' could not be found", path.display())]
    #[diagnostic(code(dismacro::file_not_found))]
    FileNotFound {
        /// Requested path
        path: PathBuf,
    },

    /// The macro file exists but could not be read
    #[error("failed to read macro file {}: {message}", path.display())]
    #[diagnostic(code(dismacro::io_error))]
    Io {
        /// Requested path
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// The macro file is not well-formed XML
    #[error("failed to parse macro file {}", path.display())]
    #[diagnostic(code(dismacro::xml_error))]
    Xml {
        /// Requested path
        path: PathBuf,
        /// Underlying XML error
        #[source]
        source: XmlError,
    },
}
