//! Errors produced while building an XML document

use miette::Diagnostic;
use thiserror::Error;

/// XML parse error
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum XmlError {
    /// The underlying reader rejected the input
    #[error("malformed XML at byte {offset}: {message}")]
    #[diagnostic(code(xml::syntax))]
    Syntax {
        /// Byte offset where the failing construct starts
        offset: u64,
        /// Reader error message
        message: String,
    },

    /// An end tag does not close the innermost open element
    #[error("expected `</{expected}>`, found `</{found}>`")]
    #[diagnostic(code(xml::mismatched_tag))]
    MismatchedTag {
        /// Name of the open element
        expected: String,
        /// Name in the end tag
        found: String,
    },

    /// An end tag appeared with no element open
    #[error("unexpected end tag `</{name}>`")]
    #[diagnostic(code(xml::unexpected_end_tag))]
    UnexpectedEndTag {
        /// Name in the end tag
        name: String,
    },

    /// Input ended while an element was still open
    #[error("element `<{name}>` is never closed")]
    #[diagnostic(code(xml::unclosed_element))]
    UnclosedElement {
        /// Name of the open element
        name: String,
    },

    /// Input contains no element at all
    #[error("document has no root element")]
    #[diagnostic(code(xml::missing_root))]
    MissingRoot,

    /// A second top-level element follows the root
    #[error("document has more than one root element (found `<{name}>`)")]
    #[diagnostic(code(xml::multiple_roots))]
    MultipleRoots {
        /// Name of the extra element
        name: String,
    },

    /// Character data outside the root element
    #[error("text is not allowed outside the root element")]
    #[diagnostic(code(xml::text_outside_root), help("wrap the content in the root element"))]
    TextOutsideRoot,
}
