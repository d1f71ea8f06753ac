//! XML document model for macro and project files
//!
//! This crate wraps `quick-xml` to build an owned element tree that keeps
//! CDATA sections apart from ordinary text. Every lookup returns an explicit
//! `Option`, so a chain of lookups stops at the first missing element.

mod encoding;
pub mod error;
mod parser;

pub use error::XmlError;

/// A node inside an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Character data with entities already unescaped
    Text(String),
    /// Contents of a `<![CDATA[...]]>` section
    CData(String),
    /// Comment contents
    Comment(String),
}

/// An XML element with its attributes and children in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an element without attributes or children
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Qualified name as written in the source, prefix included
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace prefix
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Looks up an attribute value by qualified name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All attributes in document order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Direct children in document order
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct child elements
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) | Node::CData(_) | Node::Comment(_) => None,
        })
    }

    /// First direct child element with the given name
    pub fn element(&self, name: &str) -> Option<&Self> {
        self.child_elements().find(|element| element.name == name)
    }

    /// Every direct child element with the given name
    pub fn elements<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.child_elements().filter(move |element| element.name == name)
    }

    /// Contents of the direct CDATA children
    pub fn cdata_children(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|node| match node {
            Node::CData(text) => Some(text.as_str()),
            Node::Element(_) | Node::Text(_) | Node::Comment(_) => None,
        })
    }

    /// Concatenated text and CDATA of all descendants
    pub fn inner_text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Element(element) => element.collect_text(out),
                Node::Text(text) | Node::CData(text) => out.push_str(text),
                Node::Comment(_) => {}
            }
        }
    }

    pub(crate) fn push_attribute(&mut self, name: String, value: String) {
        self.attributes.push((name, value));
    }

    pub(crate) fn push(&mut self, node: Node) {
        self.children.push(node);
    }
}

/// A parsed XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parses a complete document
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not well-formed or has no single
    /// root element
    pub fn parse(source: &str) -> Result<Self, XmlError> {
        parser::parse_document(source).map(|root| Self { root })
    }

    /// Parses a document from raw bytes
    ///
    /// The bytes are decoded using the byte order mark, else the encoding
    /// named in the XML declaration, else UTF-8. Undecodable sequences
    /// become U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoded text is not well-formed or has no
    /// single root element
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, XmlError> {
        Self::parse(&encoding::decode(bytes))
    }

    /// The root element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The root element, if it carries the given name
    pub fn element(&self, name: &str) -> Option<&Element> {
        (self.root.name == name).then_some(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MACRO: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\r\n\
        <!-- header -->\r\n\
        <DisMacro>\r\n\
        \t<Description> Macro_2 </Description>\r\n\
        \t<Script>\r\n\
        \t\t<Code>before<![CDATA[[Project:Script_2]]]>after</Code>\r\n\
        \t\t<DllImports><DllImport>a.dll</DllImport><DllImport>b.dll</DllImport></DllImports>\r\n\
        \t</Script>\r\n\
        </DisMacro>\r\n";

    #[test]
    fn test_navigates_elements() {
        let document = Document::parse(MACRO).unwrap();
        let root = document.element("DisMacro").unwrap();

        assert_eq!(root.element("Description").unwrap().inner_text(), " Macro_2 ");
        assert!(root.element("Author").is_none());
        assert!(document.element("Protocol").is_none());

        let imports: Vec<String> = root
            .element("Script")
            .and_then(|script| script.element("DllImports"))
            .map(|imports| imports.elements("DllImport").map(Element::inner_text).collect())
            .unwrap_or_default();
        assert_eq!(imports, vec!["a.dll", "b.dll"]);
    }

    #[test]
    fn test_keeps_cdata_apart_from_text() {
        let document = Document::parse(MACRO).unwrap();
        let code = document
            .root()
            .element("Script")
            .and_then(|script| script.element("Code"))
            .unwrap();

        assert_eq!(code.cdata_children().collect::<Vec<_>>(), vec!["[Project:Script_2]"]);
        assert_eq!(code.inner_text(), "before[Project:Script_2]after");
    }

    #[test]
    fn test_unescapes_entities_and_attributes() {
        let document = Document::parse(r#"<root kind="a &amp; b">x &lt; y</root>"#).unwrap();
        assert_eq!(document.root().attribute("kind"), Some("a & b"));
        assert_eq!(document.root().inner_text(), "x < y");
    }

    #[test]
    fn test_preserves_line_endings() {
        let document = Document::parse("<Code>line1\r\nline2\nline3</Code>").unwrap();
        assert_eq!(document.root().inner_text(), "line1\r\nline2\nline3");
    }

    #[test]
    fn test_local_name_strips_prefix() {
        let document = Document::parse(r#"<dm:DisMacro xmlns:dm="urn:dm"/>"#).unwrap();
        assert_eq!(document.root().name(), "dm:DisMacro");
        assert_eq!(document.root().local_name(), "DisMacro");
    }

    #[test]
    fn test_rejects_mismatched_tag() {
        let error = Document::parse("<DisMacro><Code></Script></DisMacro>").unwrap_err();
        assert_eq!(
            error,
            XmlError::MismatchedTag {
                expected: "Code".to_string(),
                found: "Script".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_unclosed_element() {
        let error = Document::parse("<DisMacro><Code>").unwrap_err();
        assert_eq!(
            error,
            XmlError::UnclosedElement {
                name: "Code".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_structural_problems() {
        assert_eq!(Document::parse("").unwrap_err(), XmlError::MissingRoot);
        assert_eq!(
            Document::parse("<!-- only a comment -->").unwrap_err(),
            XmlError::MissingRoot
        );
        assert_eq!(
            Document::parse("<a/><b/>").unwrap_err(),
            XmlError::MultipleRoots {
                name: "b".to_string()
            }
        );
        assert_eq!(
            Document::parse("not xml at all").unwrap_err(),
            XmlError::TextOutsideRoot
        );
        assert!(matches!(
            Document::parse("</a>").unwrap_err(),
            XmlError::UnexpectedEndTag { .. } | XmlError::Syntax { .. }
        ));
    }

    #[test]
    fn test_rejects_unknown_entity() {
        let error = Document::parse("<a>&unknown;</a>").unwrap_err();
        assert!(matches!(error, XmlError::Syntax { .. }));
    }

    #[test]
    fn test_parse_bytes_uses_declared_encoding() {
        let document = Document::parse_bytes(
            b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>\r\n<DisMacro><Description>Caf\xE9</Description></DisMacro>",
        )
        .unwrap();
        let description = document.root().element("Description").unwrap();
        assert_eq!(description.inner_text(), "Caf\u{e9}");
    }
}
