//! Reading and writing the CIB document as a raw element tree
//!
//! Whitespace-only text between elements is dropped on read; output is
//! indented by two spaces. Comments and processing instructions are not
//! kept.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use cibctl_core::model::{Attributes, RawElement, RawNode};

use crate::errors::{xml_error, Result};

fn element_from_start(start: &BytesStart<'_>) -> Result<RawElement> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Attributes::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_error("parse_xml", e))?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| xml_error("parse_xml", e))?
            .into_owned();
        attributes.set(&name, value);
    }
    Ok(RawElement {
        tag,
        attributes,
        children: Vec::new(),
    })
}

/// Parse a complete XML document into its root element
///
/// # Errors
///
/// `Serialization` for malformed XML, a missing root or trailing content.
pub fn parse_document(xml: &str) -> Result<RawElement> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<RawElement> = Vec::new();
    let mut root = None;

    let mut attach = |stack: &mut Vec<RawElement>, element: RawElement| -> Result<()> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(RawNode::Element(element)),
            None if root.is_none() => root = Some(element),
            None => return Err(xml_error("parse_xml", "more than one root element")),
        }
        Ok(())
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(element_from_start(&start)?),
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| xml_error("parse_xml", "unexpected closing tag"))?;
                attach(&mut stack, element)?;
            }
            Ok(Event::Text(text)) => {
                let text = text
                    .unescape()
                    .map_err(|e| xml_error("parse_xml", e))?
                    .into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(RawNode::Text(text));
                }
            }
            Ok(Event::CData(data)) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(RawNode::Text(text));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(xml_error("parse_xml", e)),
        }
    }

    if !stack.is_empty() {
        return Err(xml_error("parse_xml", "unclosed element"));
    }
    root.ok_or_else(|| xml_error("parse_xml", "document has no root element"))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &RawElement) -> Result<()> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (name, value) in element.attributes.iter() {
        start.push_attribute((name, value));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| xml_error("write_xml", e));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| xml_error("write_xml", e))?;
    for child in &element.children {
        match child {
            RawNode::Element(el) => write_element(writer, el)?,
            RawNode::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| xml_error("write_xml", e))?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.tag.as_str())))
        .map_err(|e| xml_error("write_xml", e))
}

/// Serialize a root element as an indented XML document
///
/// # Errors
///
/// `Serialization` if the writer fails.
pub fn write_document(root: &RawElement) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_element(&mut writer, root)?;
    let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| xml_error("write_xml", e))?;
    xml.push('\n');
    Ok(xml)
}
