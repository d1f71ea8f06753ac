//! The executable code block of a macro

use dm_xml::Element;
use serde::Serialize;

/// Where the code text was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CodeSource {
    /// First CDATA section directly inside the Code element
    CData,
    /// Inner text of the Code element
    Text,
}

/// Code block of a DIS macro
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroCode {
    #[serde(skip)]
    element: Element,
    code: String,
    lines: Vec<String>,
    source: CodeSource,
}

impl MacroCode {
    /// Extracts the code of a `Code` element
    ///
    /// A CDATA section wins over any text around it. Without one the
    /// element's inner text is used, which may be empty.
    pub fn from_element(element: &Element) -> Self {
        let (code, source) = match element.cdata_children().next() {
            Some(cdata) => (cdata.to_string(), CodeSource::CData),
            None => (element.inner_text(), CodeSource::Text),
        };
        let lines = split_lines(&code);

        Self {
            element: element.clone(),
            code,
            lines,
            source,
        }
    }

    /// The `Code` element the code was extracted from
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// The CDATA section the code was taken from, if any
    pub fn cdata(&self) -> Option<&str> {
        self.element.cdata_children().next()
    }

    /// The code exactly as extracted
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The code split on CRLF with tabs expanded to four spaces
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Where the code was taken from
    pub fn source(&self) -> CodeSource {
        self.source
    }
}

/// Splits on `"\r\n"` only; a lone `'\n'` or `'\r'` stays inside its line.
pub fn split_lines(code: &str) -> Vec<String> {
    code.split("\r\n")
        .map(|line| line.replace('\t', "    "))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dm_xml::Document;

    fn code_of(xml: &str) -> MacroCode {
        let document = Document::parse(xml).unwrap();
        MacroCode::from_element(document.root())
    }

    #[test]
    fn test_prefers_cdata() {
        let code = code_of("<Code>\r\n  ignored <![CDATA[[Project:Script_2]]]> ignored\r\n</Code>");
        assert_eq!(code.code(), "[Project:Script_2]");
        assert_eq!(code.source(), CodeSource::CData);
        assert_eq!(code.lines(), ["[Project:Script_2]"]);
    }

    #[test]
    fn test_uses_first_cdata_only() {
        let code = code_of("<Code><![CDATA[first]]><![CDATA[second]]></Code>");
        assert_eq!(code.code(), "first");
        assert_eq!(code.cdata(), Some("first"));
    }

    #[test]
    fn test_keeps_source_element() {
        let code = code_of("<Code lang=\"cs\">return;</Code>");
        assert_eq!(code.element().name(), "Code");
        assert_eq!(code.element().attribute("lang"), Some("cs"));
        assert_eq!(code.cdata(), None);
    }

    #[test]
    fn test_falls_back_to_text() {
        let code = code_of("<Code>int x = 1;&#13;\nreturn x;</Code>");
        assert_eq!(code.source(), CodeSource::Text);
        assert_eq!(code.code(), "int x = 1;\r\nreturn x;");
        assert_eq!(code.lines(), ["int x = 1;", "return x;"]);
    }

    #[test]
    fn test_empty_element_yields_one_empty_line() {
        let code = code_of("<Code/>");
        assert_eq!(code.code(), "");
        assert_eq!(code.lines(), [""]);
    }

    #[test]
    fn test_only_crlf_separates_lines() {
        assert_eq!(split_lines("a\nb\rc\r\nd"), vec!["a\nb\rc", "d"]);
        assert_eq!(split_lines("a\r\n\r\nb\r\n"), vec!["a", "", "b", ""]);
    }

    #[test]
    fn test_expands_tabs() {
        let lines = split_lines("\tif (x)\r\n\t\treturn;\t// done");
        assert_eq!(lines, vec!["    if (x)", "        return;    // done"]);
        assert!(lines.iter().all(|line| !line.contains('\t')));
    }

    #[test]
    fn test_rejoining_reproduces_code() {
        let code = "using System;\r\n\r\npublic class Script\r\n{\r\n}";
        assert_eq!(split_lines(code).join("\r\n"), code);
    }
}
