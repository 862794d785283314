//! Shape model for PresentationML slides.
//!
//! A slide's content is an ordered tree of shapes. Identified shapes carry a
//! stable id assigned by the document author or builder; that id — never
//! content equality — is what the differ tracks across versions. The
//! open-ended DrawingML payloads (fills, lines, effects, geometry, text
//! bodies) are carried as JSON values produced by host builders and compared
//! structurally, so this crate never needs the full DrawingML schema.

// Submodule declarations
pub mod reader;

// Re-exports
pub use reader::parse_shape_tree;

use crate::xml::XmlElement;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;

/// Shape kind discriminant, matching the PresentationML element names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// A plain shape with optional text (p:sp)
    #[serde(rename = "sp")]
    Shape,
    /// A picture (p:pic)
    #[serde(rename = "pic")]
    Picture,
    /// A group of child shapes (p:grpSp)
    #[serde(rename = "grpSp")]
    Group,
    /// A connector (p:cxnSp)
    #[serde(rename = "cxnSp")]
    Connector,
    /// A graphic frame holding a table, chart, or diagram (p:graphicFrame)
    #[serde(rename = "graphicFrame")]
    GraphicFrame,
    /// An opaque embedded object (p:contentPart)
    #[serde(rename = "contentPart")]
    ContentPart,
}

/// Non-visual drawing properties shared by identified shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonVisualProperties {
    /// Stable identifier, unique within a slide.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Position, size, rotation and flips of a shape.
///
/// Lengths are in EMUs, rotation in 60000ths of a degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    #[serde(default)]
    pub rotation: i32,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
}

/// Group transform: the base transform plus the coordinate mapping applied
/// to the group's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTransform {
    #[serde(flatten)]
    pub base: Transform,
    pub child_offset_x: i64,
    pub child_offset_y: i64,
    pub child_extent_width: i64,
    pub child_extent_height: i64,
}

/// Image reference for picture shapes (relationship id of the blip).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlipFill {
    pub resource_id: String,
}

/// Visual properties of a plain shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,
}

/// Visual properties of a picture.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PictureProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<Value>,
}

/// Visual properties of a group shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<GroupTransform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<Value>,
}

/// Visual properties of a connector.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectorProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Value>,
}

/// A plain shape (p:sp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainShape {
    pub non_visual: NonVisualProperties,
    #[serde(default)]
    pub properties: ShapeProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_body: Option<Value>,
}

/// A picture (p:pic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Picture {
    pub non_visual: NonVisualProperties,
    #[serde(default)]
    pub properties: PictureProperties,
    pub blip_fill: BlipFill,
}

/// A group shape (p:grpSp) with its ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupShape {
    pub non_visual: NonVisualProperties,
    #[serde(default)]
    pub properties: GroupProperties,
    #[serde(default)]
    pub children: Vec<Shape>,
}

/// A connector (p:cxnSp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub non_visual: NonVisualProperties,
    #[serde(default)]
    pub properties: ConnectorProperties,
}

/// Payload of a graphic frame, discriminated by the embedded graphic kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GraphicContent {
    /// A DrawingML table (`a:tbl` subtree).
    Table { tree: Rc<XmlElement> },
    /// A chart, diagram, or other graphic, kept as its declared uri plus a
    /// structural rendering of the graphic data.
    #[serde(rename_all = "camelCase")]
    Other {
        uri: String,
        #[serde(default)]
        data: Value,
    },
}

/// A graphic frame (p:graphicFrame) holding a table, chart, or diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicFrame {
    pub non_visual: NonVisualProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    pub content: GraphicContent,
}

/// An opaque embedded object (p:contentPart).
///
/// Content parts carry no stable identifier; they are excluded from all
/// identity-based indexing and thus invisible to the differ.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

/// A shape on a slide, tagged by its PresentationML element name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    #[serde(rename = "sp")]
    Shape(PlainShape),
    #[serde(rename = "pic")]
    Picture(Picture),
    #[serde(rename = "grpSp")]
    Group(GroupShape),
    #[serde(rename = "cxnSp")]
    Connector(Connector),
    #[serde(rename = "graphicFrame")]
    GraphicFrame(GraphicFrame),
    #[serde(rename = "contentPart")]
    ContentPart(ContentPart),
}

impl Shape {
    /// The stable identifier, if this shape kind carries one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Shape::Shape(sp) => Some(&sp.non_visual.id),
            Shape::Picture(pic) => Some(&pic.non_visual.id),
            Shape::Group(grp) => Some(&grp.non_visual.id),
            Shape::Connector(cxn) => Some(&cxn.non_visual.id),
            Shape::GraphicFrame(frame) => Some(&frame.non_visual.id),
            Shape::ContentPart(_) => None,
        }
    }

    /// The display name, if this shape kind carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Shape::Shape(sp) => Some(&sp.non_visual.name),
            Shape::Picture(pic) => Some(&pic.non_visual.name),
            Shape::Group(grp) => Some(&grp.non_visual.name),
            Shape::Connector(cxn) => Some(&cxn.non_visual.name),
            Shape::GraphicFrame(frame) => Some(&frame.non_visual.name),
            Shape::ContentPart(_) => None,
        }
    }

    /// The kind discriminant.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Shape(_) => ShapeKind::Shape,
            Shape::Picture(_) => ShapeKind::Picture,
            Shape::Group(_) => ShapeKind::Group,
            Shape::Connector(_) => ShapeKind::Connector,
            Shape::GraphicFrame(_) => ShapeKind::GraphicFrame,
            Shape::ContentPart(_) => ShapeKind::ContentPart,
        }
    }
}
