//! Parsing of the renderer's XML metadata envelope.
//!
//! The renderer answers an info fetch with an XML document carrying nested
//! width/height elements, typically namespaced and attribute-valued:
//!
//! ```xml
//! <fsi:FSI xmlns:fsi="http://www.fsi-viewer.com/schema">
//!   <fsi:Image>
//!     <fsi:Width value="3732"/>
//!     <fsi:Height value="5742"/>
//!   </fsi:Image>
//! </fsi:FSI>
//! ```
//!
//! Parsing is tolerant of the envelope shape: any `Width`/`Height` element
//! (case-insensitive local name, any namespace prefix) counts, whether the
//! pixel count sits in a `value` attribute or in text content. Both elements
//! must be present for the document to parse.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Errors from parsing renderer metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The XML is not well-formed.
    #[error("malformed metadata XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A required element is missing.
    #[error("missing element in metadata XML: {0}")]
    MissingElement(&'static str),

    /// A dimension value is not a positive integer.
    #[error("invalid dimension value: {0:?}")]
    InvalidValue(String),
}

/// Parse the renderer's metadata envelope into `(width, height)`.
///
/// # Errors
///
/// Returns a [`MetadataError`] if the XML is malformed, either dimension is
/// missing, or a dimension value does not parse as a positive integer.
pub fn parse_render_info(xml: &[u8]) -> Result<(u32, u32), MetadataError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut width: Option<u32> = None;
    let mut height: Option<u32> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if let Some(slot) = dimension_slot(&e, &mut width, &mut height) {
                    let value = match attribute_value(&e)? {
                        Some(value) => value,
                        None => read_text_content(&mut reader)?,
                    };
                    *slot = Some(parse_dimension(&value)?);
                }
            }
            Event::Empty(e) => {
                if let Some(slot) = dimension_slot(&e, &mut width, &mut height) {
                    let value = attribute_value(&e)?
                        .ok_or(MetadataError::MissingElement("value attribute"))?;
                    *slot = Some(parse_dimension(&value)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match (width, height) {
        (Some(width), Some(height)) => Ok((width, height)),
        (None, _) => Err(MetadataError::MissingElement("Width")),
        (_, None) => Err(MetadataError::MissingElement("Height")),
    }
}

/// If this element is a width/height dimension, return the slot to fill.
fn dimension_slot<'a>(
    element: &BytesStart<'_>,
    width: &'a mut Option<u32>,
    height: &'a mut Option<u32>,
) -> Option<&'a mut Option<u32>> {
    let name = element.local_name();
    if name.as_ref().eq_ignore_ascii_case(b"width") {
        Some(width)
    } else if name.as_ref().eq_ignore_ascii_case(b"height") {
        Some(height)
    } else {
        None
    }
}

/// Read the `value` attribute of an element, if present.
fn attribute_value(element: &BytesStart<'_>) -> Result<Option<String>, MetadataError> {
    let attribute = element
        .try_get_attribute("value")
        .map_err(quick_xml::Error::from)?;
    match attribute {
        Some(attribute) => {
            let value = attribute
                .unescape_value()
                .map_err(quick_xml::Error::from)?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Read the text content of the current element through its end tag.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, MetadataError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let decoded = e.decode().map_err(quick_xml::Error::from)?;
                text.push_str(&decoded);
            }
            Event::End(_) => return Ok(text),
            Event::Eof => return Err(MetadataError::MissingElement("closing tag")),
            _ => {}
        }
    }
}

/// Parse one dimension value as a positive pixel count.
fn parse_dimension(value: &str) -> Result<u32, MetadataError> {
    let parsed: u32 = value
        .trim()
        .parse()
        .map_err(|_| MetadataError::InvalidValue(value.to_owned()))?;
    if parsed == 0 {
        return Err(MetadataError::InvalidValue(value.to_owned()));
    }
    Ok(parsed)
}
