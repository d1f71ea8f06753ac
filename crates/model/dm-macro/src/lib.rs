//! DIS macro documents
//!
//! A macro document is an XML file whose root element is `DisMacro`:
//!
//! ```xml
//! <DisMacro>
//!   <Description>Macro_2</Description>
//!   <Author>SKY</Author>
//!   <Script>
//!     <Code><![CDATA[[Project:Script_2]]]></Code>
//!     <DllImports>
//!       <DllImport>SLManagedScripting.dll</DllImport>
//!     </DllImports>
//!   </Script>
//! </DisMacro>
//! ```
//!
//! Every part below the root is optional. Missing parts leave the matching
//! field empty instead of failing the parse.

pub mod code;
pub mod error;

pub use code::{CodeSource, MacroCode};
pub use error::MacroError;

use dm_log::LogCollector;
use dm_vfs::VirtualFileSystem;
use dm_xml::{Document, Element, XmlError};
use serde::Serialize;
use std::path::Path;

/// Name of the root element of a macro document
pub const MACRO_ROOT: &str = "DisMacro";

/// A parsed DIS macro
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Macro {
    #[serde(skip)]
    document: Document,
    description: Option<String>,
    author: Option<String>,
    code: Option<MacroCode>,
    dll_imports: Vec<String>,
}

impl Macro {
    /// Builds a macro from a parsed document
    ///
    /// A document whose root is not `DisMacro` yields a macro with every
    /// field empty.
    pub fn from_document(document: Document) -> Self {
        let Some(root) = document.element(MACRO_ROOT) else {
            return Self::empty(document);
        };

        let description = trimmed_text(root.element("Description"));
        let author = trimmed_text(root.element("Author"));

        let script = root.element("Script");
        let (code, dll_imports) = match script.and_then(|script| script.element("Code")) {
            Some(code) => {
                let dll_imports = script
                    .and_then(|script| script.element("DllImports"))
                    .map(|imports| {
                        imports
                            .elements("DllImport")
                            .map(|import| import.inner_text().trim().to_string())
                            .collect()
                    })
                    .unwrap_or_default();
                (Some(MacroCode::from_element(code)), dll_imports)
            }
            None => (None, Vec::new()),
        };

        Self {
            document,
            description,
            author,
            code,
            dll_imports,
        }
    }

    fn empty(document: Document) -> Self {
        Self {
            document,
            description: None,
            author: None,
            code: None,
            dll_imports: Vec::new(),
        }
    }

    /// Parses macro XML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not well-formed XML
    pub fn parse(source: &str) -> Result<Self, XmlError> {
        Document::parse(source).map(Self::from_document)
    }

    /// Loads a macro file
    ///
    /// The file is decoded by its byte order mark or declared encoding,
    /// falling back to UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read, or is not
    /// well-formed XML
    pub fn load(vfs: &VirtualFileSystem, path: impl AsRef<Path>) -> Result<Self, MacroError> {
        let path = path.as_ref();
        if !vfs.exists(path) {
            return Err(MacroError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = vfs.read_bytes(path).map_err(|err| MacroError::Io {
            path: path.to_path_buf(),
            message: format!("{err:#}"),
        })?;

        Document::parse_bytes(&bytes)
            .map(Self::from_document)
            .map_err(|source| MacroError::Xml {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Checks whether a file is a macro document
    ///
    /// The file is read and parsed on its own; it is a macro when it is
    /// well-formed XML whose root element's local name is `DisMacro`,
    /// ignoring case. Files that cannot be read or parsed are reported to
    /// `log` and classified as not being a macro.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is empty or only whitespace
    pub fn is_macro_file(
        vfs: &VirtualFileSystem,
        path: impl AsRef<Path>,
        log: &dyn LogCollector,
    ) -> Result<bool, MacroError> {
        let path = path.as_ref();
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(MacroError::InvalidArgument {
                name: "path",
                reason: "cannot be empty or whitespace".to_string(),
            });
        }

        let root = vfs
            .read_bytes(path)
            .map_err(|err| format!("{err:#}"))
            .and_then(|bytes| Document::parse_bytes(&bytes).map_err(|err| err.to_string()));

        match root {
            Ok(document) => {
                let is_macro = document.root().local_name().eq_ignore_ascii_case(MACRO_ROOT);
                tracing::debug!(path = %path.display(), is_macro, "classified XML file");
                Ok(is_macro)
            }
            Err(message) => {
                log.report_error(&format!(
                    "failed to load {} as XML: {message}",
                    path.display()
                ));
                Ok(false)
            }
        }
    }

    /// The document the macro was built from
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Trimmed `Description` text, if the element is present
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Trimmed `Author` text, if the element is present
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// The `Script/Code` block, if present
    pub fn code(&self) -> Option<&MacroCode> {
        self.code.as_ref()
    }

    /// Trimmed `Script/DllImports/DllImport` texts in document order
    pub fn dll_imports(&self) -> &[String] {
        &self.dll_imports
    }
}

fn trimmed_text(element: Option<&Element>) -> Option<String> {
    element.map(|element| element.inner_text().trim().to_string())
}
