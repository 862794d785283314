//! Parse XML part text into the document tree.
use crate::error::{Error, Result};
use crate::xml::{unescape_xml, XmlAttr, XmlDocument, XmlElement, XmlNode};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::rc::Rc;

/// Parse a complete XML document (a package part) into a tree.
///
/// The XML declaration and DOCTYPE are dropped; comments and the relative
/// order of all top-level nodes are preserved. Whitespace-only text runs
/// between elements are discarded, text inside elements is kept verbatim.
pub fn parse_document(xml: &str) -> Result<XmlDocument> {
    let mut reader = Reader::from_str(xml);

    // Open elements on the path from the root to the current position.
    let mut stack: Vec<XmlElement> = Vec::new();
    // Finished top-level nodes.
    let mut top: Vec<XmlNode> = Vec::new();
    // Text accumulated since the last markup event; entity references arrive
    // as separate events and are folded back into this run.
    let mut pending_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                flush_text(&mut pending_text, &mut stack, &mut top);
                stack.push(element_from_start(&e)?);
            },
            Ok(Event::Empty(e)) => {
                flush_text(&mut pending_text, &mut stack, &mut top);
                let el = element_from_start(&e)?;
                push_node(XmlNode::Element(Rc::new(el)), &mut stack, &mut top);
            },
            Ok(Event::End(_)) => {
                flush_text(&mut pending_text, &mut stack, &mut top);
                let el = stack
                    .pop()
                    .ok_or_else(|| Error::Xml("unexpected closing tag".to_string()))?;
                push_node(XmlNode::Element(Rc::new(el)), &mut stack, &mut top);
            },
            Ok(Event::Text(e)) => {
                let text = std::str::from_utf8(e.as_ref())
                    .map_err(|err| Error::Xml(err.to_string()))?;
                pending_text.push_str(&unescape_xml(text));
            },
            Ok(Event::CData(e)) => {
                let text = std::str::from_utf8(e.as_ref())
                    .map_err(|err| Error::Xml(err.to_string()))?;
                pending_text.push_str(text);
            },
            Ok(Event::GeneralRef(e)) => {
                let name = std::str::from_utf8(e.as_ref())
                    .map_err(|err| Error::Xml(err.to_string()))?;
                match resolve_entity(name) {
                    Some(ch) => pending_text.push(ch),
                    // Unknown entity: keep the reference verbatim.
                    None => {
                        pending_text.push('&');
                        pending_text.push_str(name);
                        pending_text.push(';');
                    },
                }
            },
            Ok(Event::Comment(e)) => {
                flush_text(&mut pending_text, &mut stack, &mut top);
                let text = std::str::from_utf8(e.as_ref())
                    .map_err(|err| Error::Xml(err.to_string()))?;
                push_node(XmlNode::Comment(text.to_string()), &mut stack, &mut top);
            },
            Ok(Event::Eof) => break,
            // Declaration, DOCTYPE, and processing instructions carry no
            // tree content.
            Ok(_) => {},
            Err(e) => return Err(Error::Xml(e.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(Error::Xml("unclosed element at end of document".to_string()));
    }

    Ok(XmlDocument { children: top })
}

/// Build an element (without children) from a start or empty-element tag.
fn element_from_start(e: &BytesStart<'_>) -> Result<XmlElement> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| Error::Xml(err.to_string()))?
        .to_string();

    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::Xml(err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| Error::Xml(err.to_string()))?;
        let value =
            std::str::from_utf8(&attr.value).map_err(|err| Error::Xml(err.to_string()))?;
        attrs.push(XmlAttr {
            name: key.to_string(),
            value: unescape_xml(value),
        });
    }

    Ok(XmlElement {
        name,
        attrs,
        children: Vec::new(),
    })
}

/// Attach a finished node to the innermost open element, or to the top level.
fn push_node(node: XmlNode, stack: &mut [XmlElement], top: &mut Vec<XmlNode>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top.push(node),
    }
}

/// Emit the accumulated text run as a node, dropping whitespace-only runs
/// (inter-element indentation).
fn flush_text(pending: &mut String, stack: &mut [XmlElement], top: &mut Vec<XmlNode>) {
    if pending.is_empty() {
        return;
    }
    let text = std::mem::take(pending);
    if !text.trim().is_empty() {
        push_node(XmlNode::Text(text), stack, top);
    }
}

/// Resolve a predefined or numeric character reference.
fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))?;
            char::from_u32(code)
        },
    }
}
