//! XML document tree for slide and diagram parts.
//!
//! Structural patching needs a *tree* rather than an event stream: an edit
//! splices new children into one matched subtree while every unrelated
//! sibling is carried over untouched. Elements are reference-counted so a
//! rebuilt ancestor chain shares unmodified branches with the source tree
//! instead of copying them — callers can verify with [`std::rc::Rc::ptr_eq`]
//! that nodes off the edit path are the same nodes, not equal copies.

// Submodule declarations
pub mod parser;
pub mod writer;

// Re-exports
pub use parser::parse_document;
pub use writer::{escape_xml, unescape_xml};

use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// A single attribute (name/value pair) of an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlAttr {
    pub name: String,
    pub value: String,
}

/// One node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum XmlNode {
    /// An element with a tag name, attributes, and ordered children.
    Element(Rc<XmlElement>),
    /// A text node.
    Text(String),
    /// A comment, preserved for round-trip fidelity.
    Comment(String),
}

impl XmlNode {
    /// Return the contained element, if this node is one.
    #[inline]
    pub fn as_element(&self) -> Option<&Rc<XmlElement>> {
        match self {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Check whether this node is an element with the given tag name.
    #[inline]
    pub fn is_element_named(&self, name: &str) -> bool {
        matches!(self, XmlNode::Element(el) if el.name == name)
    }
}

/// An XML element: qualified tag name, attribute list, ordered children.
///
/// Attribute order is preserved so serialization keeps the source ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XmlElement {
    /// Qualified tag name as written in the source (e.g. `p:sp`).
    pub name: String,
    pub attrs: Vec<XmlAttr>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: append an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(XmlAttr {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child.into_node());
        self
    }

    /// Builder: append a text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Wrap this element in a tree node.
    #[inline]
    pub fn into_node(self) -> XmlNode {
        XmlNode::Element(Rc::new(self))
    }

    /// Set an attribute, replacing an existing one with the same name.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(XmlAttr {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// The tag name with any namespace prefix stripped.
    #[inline]
    pub fn local_name(&self) -> &str {
        match self.name.rfind(':') {
            Some(pos) => &self.name[pos + 1..],
            None => &self.name,
        }
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// The first child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Rc<XmlElement>> {
        self.children
            .iter()
            .find_map(|n| n.as_element().filter(|el| el.name == name))
    }

    /// All child elements with the given tag name, in document order.
    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Rc<XmlElement>> + 'a {
        self.children
            .iter()
            .filter_map(move |n| n.as_element().filter(|el| el.name == name))
    }

    /// All child elements, in document order.
    pub fn element_children(&self) -> impl Iterator<Item = &Rc<XmlElement>> {
        self.children.iter().filter_map(|n| n.as_element())
    }

    /// Concatenated descendant text content.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(el) => el.collect_text(out),
                XmlNode::Comment(_) => {},
            }
        }
    }

    /// Rebuild this element with the same name and attributes but a new
    /// children list.
    pub fn with_children(&self, children: Vec<XmlNode>) -> XmlElement {
        XmlElement {
            name: self.name.clone(),
            attrs: self.attrs.clone(),
            children,
        }
    }

    /// Rebuild this element with one child element substituted.
    ///
    /// The child to replace is identified by pointer, not by content; every
    /// other child is carried over by reference.
    pub fn with_child_replaced(&self, old: &Rc<XmlElement>, new: Rc<XmlElement>) -> XmlElement {
        let children = self
            .children
            .iter()
            .map(|node| match node {
                XmlNode::Element(el) if Rc::ptr_eq(el, old) => XmlNode::Element(Rc::clone(&new)),
                other => other.clone(),
            })
            .collect();
        self.with_children(children)
    }

    /// Serialize this element (and its subtree) to an XML string.
    #[inline]
    pub fn to_xml_string(&self) -> String {
        writer::element_to_string(self)
    }
}

/// A parsed XML document: the ordered forest of top-level nodes.
///
/// Comments before or after the root element are kept in `children` so a
/// rebuilt document preserves them in their original positions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlDocument {
    pub children: Vec<XmlNode>,
}

impl XmlDocument {
    /// Create a document with a single root element.
    pub fn from_root(root: XmlElement) -> Self {
        Self {
            children: vec![root.into_node()],
        }
    }

    /// The root element (first element among the top-level nodes).
    pub fn root(&self) -> Option<&Rc<XmlElement>> {
        self.children.iter().find_map(|n| n.as_element())
    }

    /// The first top-level element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Rc<XmlElement>> {
        self.children
            .iter()
            .find_map(|n| n.as_element().filter(|el| el.name == name))
    }

    /// Rebuild the document with one top-level element substituted, carrying
    /// all other top-level nodes over by reference.
    pub fn with_child_replaced(&self, old: &Rc<XmlElement>, new: Rc<XmlElement>) -> XmlDocument {
        let children = self
            .children
            .iter()
            .map(|node| match node {
                XmlNode::Element(el) if Rc::ptr_eq(el, old) => XmlNode::Element(Rc::clone(&new)),
                other => other.clone(),
            })
            .collect();
        XmlDocument { children }
    }

    /// Serialize the document, optionally prefixed with the standard OOXML
    /// declaration (`version="1.0" encoding="UTF-8" standalone="yes"`).
    #[inline]
    pub fn to_xml_string(&self, with_decl: bool) -> String {
        writer::document_to_string(self, with_decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> XmlElement {
        XmlElement::new("p:spTree")
            .with_child(XmlElement::new("p:sp").with_attr("dummy", "1"))
            .with_child(XmlElement::new("p:pic"))
            .with_child(XmlElement::new("p:sp"))
    }

    #[test]
    fn test_child_lookup() {
        let tree = sample();
        assert_eq!(tree.child("p:pic").map(|el| el.name.as_str()), Some("p:pic"));
        assert!(tree.child("p:grpSp").is_none());
        assert_eq!(tree.children_named("p:sp").count(), 2);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(XmlElement::new("a:tbl").local_name(), "tbl");
        assert_eq!(XmlElement::new("Relationships").local_name(), "Relationships");
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut el = XmlElement::new("a:gridCol").with_attr("w", "100");
        el.set_attr("w", "200");
        assert_eq!(el.attr("w"), Some("200"));
        assert_eq!(el.attrs.len(), 1);
    }

    #[test]
    fn test_with_child_replaced_shares_siblings() {
        let tree = Rc::new(sample());
        let pic = Rc::clone(tree.child("p:pic").unwrap());
        let first_sp = Rc::clone(tree.child("p:sp").unwrap());

        let rebuilt = tree.with_child_replaced(&pic, Rc::new(XmlElement::new("p:pic2")));

        // The untouched siblings are the same nodes, not copies.
        assert!(Rc::ptr_eq(rebuilt.child("p:sp").unwrap(), &first_sp));
        assert!(rebuilt.child("p:pic").is_none());
        assert_eq!(rebuilt.child("p:pic2").map(|el| el.name.as_str()), Some("p:pic2"));
        // Order is preserved.
        assert_eq!(
            rebuilt
                .element_children()
                .map(|el| el.name.as_str())
                .collect::<Vec<_>>(),
            vec!["p:sp", "p:pic2", "p:sp"]
        );
    }

    #[test]
    fn test_text_collects_descendants() {
        let el = XmlElement::new("a:p")
            .with_child(
                XmlElement::new("a:r").with_child(XmlElement::new("a:t").with_text("Hello")),
            )
            .with_child(XmlElement::new("a:r").with_child(XmlElement::new("a:t").with_text(" world")));
        assert_eq!(el.text(), "Hello world");
    }
}
