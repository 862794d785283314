//! Serialize the document tree back to part text.
use crate::xml::{XmlDocument, XmlElement, XmlNode};

/// Standard declaration written at the head of OOXML parts.
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Serialize a document, optionally prefixed with the standard declaration.
pub fn document_to_string(doc: &XmlDocument, with_decl: bool) -> String {
    let mut out = String::with_capacity(1024);
    if with_decl {
        out.push_str(XML_DECLARATION);
    }
    for node in &doc.children {
        write_node(node, &mut out);
    }
    out
}

/// Serialize a single element and its subtree.
pub fn element_to_string(el: &XmlElement) -> String {
    let mut out = String::with_capacity(256);
    write_element(el, &mut out);
    out
}

fn write_node(node: &XmlNode, out: &mut String) {
    match node {
        XmlNode::Element(el) => write_element(el, out),
        XmlNode::Text(text) => out.push_str(&escape_xml(text)),
        XmlNode::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        },
    }
}

fn write_element(el: &XmlElement, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for attr in &el.attrs {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape_xml(&attr.value));
        out.push('"');
    }

    if el.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &el.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

/// Escape XML special characters.
#[inline]
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Unescape the five standard XML entities.
///
/// Unknown or malformed entities are left unchanged.
pub fn unescape_xml(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    const ENTITIES: [(&str, char); 5] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
    ];

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            },
            None => {
                out.push('&');
                rest = &rest[1..];
            },
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    #[test]
    fn test_escape_round_trip() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(
            escape_xml("<tag>\"hello\"</tag>"),
            "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;"
        );
        assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
        assert_eq!(unescape_xml("&quot;hello&apos;"), "\"hello'");
        // &amp; is consumed before its expansion can be rescanned.
        assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
        assert_eq!(unescape_xml("a & b"), "a & b");
        assert_eq!(unescape_xml("&invalid;"), "&invalid;");
        assert_eq!(unescape_xml("&amp"), "&amp");
    }

    #[test]
    fn test_empty_element_is_self_closed() {
        let el = XmlElement::new("a:gridCol").with_attr("w", "914400");
        assert_eq!(el.to_xml_string(), r#"<a:gridCol w="914400"/>"#);
    }

    #[test]
    fn test_document_declaration() {
        let doc = XmlDocument::from_root(XmlElement::new("dgm:dataModel"));
        let xml = doc.to_xml_string(true);
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(xml.ends_with("<dgm:dataModel/>"));
        assert_eq!(doc.to_xml_string(false), "<dgm:dataModel/>");
    }

    #[test]
    fn test_parse_serialize_round_trip() {
        let source = concat!(
            r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
            r#"<p:cSld><p:spTree><p:sp><p:txBody><a:p><a:r>"#,
            r#"<a:t>Tom &amp; Jerry</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld>"#,
            r#"<p:clrMapOvr/></p:sld>"#,
        );
        let doc = parse_document(source).unwrap();
        assert_eq!(doc.to_xml_string(false), source);
    }

    #[test]
    fn test_comment_round_trip() {
        let source = "<!-- keep --><a:tbl/>";
        let doc = parse_document(source).unwrap();
        assert_eq!(doc.to_xml_string(false), source);
    }
}
