//! Event-driven tree builder on top of `quick-xml`

use crate::{Element, Node, XmlError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Builds the root element of `source`
pub(crate) fn parse_document(source: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(source);
    let config = reader.config_mut();
    config.trim_text(false);
    // End tags are matched against the open-element stack below
    config.check_end_names = false;

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let offset = reader.buffer_position() as u64;
        let syntax = |message: String| XmlError::Syntax { offset, message };

        match reader.read_event().map_err(|err| syntax(err.to_string()))? {
            Event::Start(start) => {
                open.push(start_element(&start).map_err(syntax)?);
            }
            Event::Empty(start) => {
                let element = start_element(&start).map_err(syntax)?;
                close(element, &mut open, &mut root)?;
            }
            Event::End(end) => {
                let name = decode(end.name().as_ref()).map_err(syntax)?;
                let Some(element) = open.pop() else {
                    return Err(XmlError::UnexpectedEndTag { name });
                };
                if element.name != name {
                    return Err(XmlError::MismatchedTag {
                        expected: element.name,
                        found: name,
                    });
                }
                close(element, &mut open, &mut root)?;
            }
            Event::Text(text) => {
                let value = text.unescape().map_err(|err| syntax(err.to_string()))?;
                match open.last_mut() {
                    Some(parent) => parent.push(Node::Text(value.into_owned())),
                    None if value.trim().is_empty() => {}
                    None => return Err(XmlError::TextOutsideRoot),
                }
            }
            Event::CData(cdata) => {
                let value = decode(&cdata.into_inner()).map_err(syntax)?;
                let Some(parent) = open.last_mut() else {
                    return Err(XmlError::TextOutsideRoot);
                };
                parent.push(Node::CData(value));
            }
            Event::Comment(comment) => {
                if let Some(parent) = open.last_mut() {
                    parent.push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(element) = open.pop() {
        return Err(XmlError::UnclosedElement { name: element.name });
    }

    root.ok_or(XmlError::MissingRoot)
}

/// Attaches a finished element to its parent, or makes it the root
fn close(
    element: Element,
    open: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), XmlError> {
    if let Some(parent) = open.last_mut() {
        parent.push(Node::Element(element));
        return Ok(());
    }

    if root.is_some() {
        return Err(XmlError::MultipleRoots { name: element.name });
    }

    *root = Some(element);
    Ok(())
}

fn start_element(start: &BytesStart<'_>) -> Result<Element, String> {
    let mut element = Element::new(decode(start.name().as_ref())?);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| err.to_string())?;
        let key = decode(attribute.key.as_ref())?;
        let value = attribute.unescape_value().map_err(|err| err.to_string())?;
        element.push_attribute(key, value.into_owned());
    }

    Ok(element)
}

fn decode(bytes: &[u8]) -> Result<String, String> {
    String::from_utf8(bytes.to_vec()).map_err(|err| err.to_string())
}
