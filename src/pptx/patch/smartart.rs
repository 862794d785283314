//! SmartArt (diagram) patch application.
//!
//! Diagram data lives in separate parts linked from the slide through
//! relationship ids, so this applier works against the package rather than a
//! single document. Unlike table patching it is fail-fast: a broken
//! relationship or missing constituent part aborts the batch with an error
//! naming the offending resource id. Parts already written before a later
//! failure stay written; there is no rollback.
use crate::error::{Error, Result};
use crate::opc::package::ZipPackage;
use crate::opc::rels::{parse_relationships, part_dir, rels_path_for, resolve_target, Relationship};
use crate::xml::{parse_document, XmlDocument, XmlElement, XmlNode};
use log::debug;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

const REL_TYPE_DIAGRAM_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/diagramLayout";
const REL_TYPE_DIAGRAM_COLORS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/diagramColors";
const REL_TYPE_DIAGRAM_QUICK_STYLE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/diagramQuickStyle";

/// One SmartArt edit specification, targeting a diagram by the relationship
/// id that links it from the slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartArtUpdate {
    pub resource_id: String,
    pub changes: Vec<DiagramChange>,
}

/// A single edit against a diagram's data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DiagramChange {
    /// Replace the text of an existing node.
    #[serde(rename_all = "camelCase")]
    NodeText { node_id: String, text: String },
    /// Insert a new node as a child of an existing one.
    #[serde(rename_all = "camelCase")]
    AddNode {
        parent_id: String,
        node_id: String,
        text: String,
    },
    /// Delete a node and every connection referencing it.
    #[serde(rename_all = "camelCase")]
    RemoveNode { node_id: String },
    /// Record or update a connection edge between two nodes.
    #[serde(rename_all = "camelCase")]
    SetConnection {
        src_id: String,
        dest_id: String,
        connection_type: String,
    },
}

/// Apply a batch of SmartArt edit specifications against the package.
///
/// Each spec resolves its diagram-data part through the slide's relationship
/// file, validates that all four constituent parts (data, layout, colors,
/// quick style) are readable, applies its changes in order, and writes the
/// data part back exactly once. Specs are processed independently and
/// sequentially; two specs naming the same diagram trigger two writes.
///
/// # Errors
///
/// [`Error::DiagramNotFound`] when the relationship file is missing,
/// unparseable, or has no entry for the resource id;
/// [`Error::MissingDiagramFiles`] when any constituent part cannot be read.
pub fn apply_smartart_updates(
    pkg: &mut dyn ZipPackage,
    slide_part_path: &str,
    specs: &[SmartArtUpdate],
) -> Result<()> {
    if specs.is_empty() {
        return Ok(());
    }

    let rels_path = rels_path_for(slide_part_path);
    let base_dir = part_dir(slide_part_path).to_string();
    let relationships: Option<Vec<Relationship>> = pkg
        .read_text(&rels_path)
        .and_then(|content| parse_document(&content).ok())
        .filter(|doc| doc.root().is_some())
        .map(|doc| parse_relationships(&doc));

    for spec in specs {
        let rels = relationships
            .as_deref()
            .ok_or_else(|| Error::DiagramNotFound(spec.resource_id.clone()))?;
        let data_path = resolve_diagram_parts(pkg, rels, &base_dir, &spec.resource_id)?;

        let data_xml = pkg
            .read_text(&data_path)
            .ok_or_else(|| Error::MissingDiagramFiles(spec.resource_id.clone()))?;
        let doc = parse_document(&data_xml)?;
        let patched = apply_changes(&doc, &spec.changes)?;
        debug!(
            "writing diagram data part {} for resource id {}",
            data_path, spec.resource_id
        );
        pkg.write_text(&data_path, &patched.to_xml_string(true));
    }
    Ok(())
}

/// Resolve the diagram-data part for a resource id and verify that all four
/// constituent parts are present. Returns the data part path.
fn resolve_diagram_parts(
    pkg: &dyn ZipPackage,
    rels: &[Relationship],
    base_dir: &str,
    resource_id: &str,
) -> Result<String> {
    let data_rel = rels
        .iter()
        .find(|rel| rel.id == resource_id)
        .ok_or_else(|| Error::DiagramNotFound(resource_id.to_string()))?;
    let data_path = resolve_target(base_dir, &data_rel.target);

    let layout_path = companion_path(rels, base_dir, REL_TYPE_DIAGRAM_LAYOUT, &data_path, "layout");
    let colors_path = companion_path(rels, base_dir, REL_TYPE_DIAGRAM_COLORS, &data_path, "colors");
    let quick_style_path = companion_path(
        rels,
        base_dir,
        REL_TYPE_DIAGRAM_QUICK_STYLE,
        &data_path,
        "quickStyle",
    );

    for path in [&data_path, &layout_path, &colors_path, &quick_style_path] {
        if pkg.read_text(path).is_none() {
            return Err(Error::MissingDiagramFiles(resource_id.to_string()));
        }
    }
    Ok(data_path)
}

/// Companion part path: prefer the type-matched relationship; with a minimal
/// rels file that only declares the data relationship, fall back to
/// substituting the data part's filename stem (`data1.xml` -> `layout1.xml`).
fn companion_path(
    rels: &[Relationship],
    base_dir: &str,
    rel_type: &str,
    data_path: &str,
    stem: &str,
) -> String {
    rels.iter()
        .find(|rel| rel.rel_type == rel_type)
        .map(|rel| resolve_target(base_dir, &rel.target))
        .unwrap_or_else(|| data_path.replace("data", stem))
}

/// Apply the changes, in order, against the data model's point and
/// connection lists, rebuilding only those lists.
fn apply_changes(doc: &XmlDocument, changes: &[DiagramChange]) -> Result<XmlDocument> {
    let root = doc
        .root()
        .ok_or_else(|| Error::Xml("diagram data has no root element".to_string()))?;
    let pt_lst = root
        .child("dgm:ptLst")
        .ok_or_else(|| Error::Xml("diagram data has no dgm:ptLst".to_string()))?;

    let mut points: Vec<XmlNode> = pt_lst.children.clone();
    let cxn_lst = root.child("dgm:cxnLst");
    let mut connections: Vec<XmlNode> = cxn_lst.map(|el| el.children.clone()).unwrap_or_default();

    for change in changes {
        match change {
            DiagramChange::NodeText { node_id, text } => {
                set_node_text(&mut points, node_id, text);
            },
            DiagramChange::AddNode { parent_id, node_id, text } => {
                let model_id = next_model_id(&points, &connections);
                let src_ord = child_count(&connections, parent_id);
                points.push(new_point(node_id, text).into_node());
                connections.push(
                    new_connection(model_id, parent_id, node_id, "parOf", src_ord).into_node(),
                );
            },
            DiagramChange::RemoveNode { node_id } => {
                points.retain(|node| point_model_id(node) != Some(node_id.as_str()));
                connections.retain(|node| !references_node(node, node_id));
            },
            DiagramChange::SetConnection { src_id, dest_id, connection_type } => {
                set_connection(&mut points, &mut connections, src_id, dest_id, connection_type);
            },
        }
    }

    // Rebuild the root around the new lists; every other child is carried
    // over by reference.
    let new_pt_lst = Rc::new(pt_lst.with_children(points));
    let mut new_root = root.with_child_replaced(pt_lst, Rc::clone(&new_pt_lst));
    match cxn_lst {
        Some(old_cxn_lst) => {
            new_root =
                new_root.with_child_replaced(old_cxn_lst, Rc::new(old_cxn_lst.with_children(connections)));
        },
        None if !connections.is_empty() => {
            // The connection list follows the point list in the data model.
            let insert_at = new_root
                .children
                .iter()
                .position(|node| node.as_element().is_some_and(|el| Rc::ptr_eq(el, &new_pt_lst)))
                .map(|pos| pos + 1)
                .unwrap_or(new_root.children.len());
            new_root.children.insert(
                insert_at,
                XmlElement::new("dgm:cxnLst").with_children(connections).into_node(),
            );
        },
        None => {},
    }

    Ok(doc.with_child_replaced(root, Rc::new(new_root)))
}

/// The `modelId` of a `dgm:pt` node.
fn point_model_id(node: &XmlNode) -> Option<&str> {
    node.as_element()
        .filter(|el| el.name == "dgm:pt")
        .and_then(|el| el.attr("modelId"))
}

/// Replace the text run content of the matching node. Unknown ids are left
/// alone.
fn set_node_text(points: &mut [XmlNode], node_id: &str, text: &str) {
    let Some(pos) = points.iter().position(|node| point_model_id(node) == Some(node_id)) else {
        return;
    };
    let Some(point) = points[pos].as_element().map(Rc::clone) else {
        return;
    };

    let mut children = point.children.clone();
    match children.iter().position(|node| node.is_element_named("dgm:t")) {
        Some(text_pos) => children[text_pos] = diagram_text(text).into_node(),
        None => children.push(diagram_text(text).into_node()),
    }
    points[pos] = XmlNode::Element(Rc::new(point.with_children(children)));
}

/// Update the type of an existing edge between the two nodes, or record a
/// new one.
fn set_connection(
    points: &mut [XmlNode],
    connections: &mut Vec<XmlNode>,
    src_id: &str,
    dest_id: &str,
    connection_type: &str,
) {
    let existing = connections.iter().position(|node| {
        node.as_element().is_some_and(|el| {
            el.name == "dgm:cxn"
                && el.attr("srcId") == Some(src_id)
                && el.attr("destId") == Some(dest_id)
        })
    });

    match existing {
        Some(pos) => {
            let Some(cxn) = connections[pos].as_element().map(Rc::clone) else {
                return;
            };
            let mut updated = (*cxn).clone();
            updated.set_attr("type", connection_type);
            connections[pos] = XmlNode::Element(Rc::new(updated));
        },
        None => {
            let model_id = next_model_id(points, connections);
            let src_ord = child_count(connections, src_id);
            connections.push(
                new_connection(model_id, src_id, dest_id, connection_type, src_ord).into_node(),
            );
        },
    }
}

/// A fresh content point with its property set, shape properties, and text.
fn new_point(model_id: &str, text: &str) -> XmlElement {
    XmlElement::new("dgm:pt")
        .with_attr("modelId", model_id)
        .with_child(XmlElement::new("dgm:prSet"))
        .with_child(XmlElement::new("dgm:spPr"))
        .with_child(diagram_text(text))
}

fn new_connection(
    model_id: i64,
    src_id: &str,
    dest_id: &str,
    connection_type: &str,
    src_ord: usize,
) -> XmlElement {
    XmlElement::new("dgm:cxn")
        .with_attr("modelId", model_id.to_string())
        .with_attr("type", connection_type)
        .with_attr("srcId", src_id)
        .with_attr("destId", dest_id)
        .with_attr("srcOrd", src_ord.to_string())
        .with_attr("destOrd", "0")
}

/// Text body of a diagram point: one paragraph with one run.
fn diagram_text(text: &str) -> XmlElement {
    XmlElement::new("dgm:t")
        .with_child(XmlElement::new("a:bodyPr"))
        .with_child(XmlElement::new("a:lstStyle"))
        .with_child(
            XmlElement::new("a:p").with_child(
                XmlElement::new("a:r")
                    .with_child(XmlElement::new("a:rPr").with_attr("lang", "en-US"))
                    .with_child(XmlElement::new("a:t").with_text(text)),
            ),
        )
}

/// Whether a connection names the node as source or destination.
fn references_node(node: &XmlNode, node_id: &str) -> bool {
    node.as_element().is_some_and(|el| {
        el.name == "dgm:cxn"
            && (el.attr("srcId") == Some(node_id) || el.attr("destId") == Some(node_id))
    })
}

/// Number of parent-of children already recorded under the given parent.
fn child_count(connections: &[XmlNode], parent_id: &str) -> usize {
    connections
        .iter()
        .filter_map(|node| node.as_element())
        .filter(|el| el.name == "dgm:cxn")
        .filter(|el| el.attr("type").is_none_or(|t| t == "parOf"))
        .filter(|el| el.attr("srcId") == Some(parent_id))
        .count()
}

/// Next free numeric model id across points and connections.
fn next_model_id(points: &[XmlNode], connections: &[XmlNode]) -> i64 {
    points
        .iter()
        .chain(connections)
        .filter_map(|node| node.as_element())
        .filter_map(|el| el.attr("modelId"))
        .filter_map(|id| id.parse::<i64>().ok())
        .max()
        .unwrap_or(0)
        + 1
}
