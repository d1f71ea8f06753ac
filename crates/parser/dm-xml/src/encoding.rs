//! Decoding of raw document bytes

use encoding_rs::{Encoding, UTF_8};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::borrow::Cow;

/// Decodes a document using its byte order mark, else its declared
/// encoding, else UTF-8
///
/// Malformed sequences decode to U+FFFD instead of failing.
pub(crate) fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let (encoding, bom_length) =
        Encoding::for_bom(bytes).unwrap_or_else(|| (declared_encoding(bytes).unwrap_or(UTF_8), 0));
    let body = bytes.get(bom_length..).unwrap_or_default();
    encoding.decode_without_bom_handling(body).0
}

/// Encoding named by the `<?xml ... encoding="..."?>` declaration
///
/// A declaration readable as ASCII cannot be UTF-16, so UTF-16 labels map to
/// UTF-8 the way browsers treat them.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let mut reader = Reader::from_reader(bytes);
    let Ok(Event::Decl(declaration)) = reader.read_event() else {
        return None;
    };
    let label = declaration.encoding()?.ok()?;
    Encoding::for_label(&label).map(Encoding::output_encoding)
}
