//! Build shape-tree snapshots from slide XML.
//!
//! The differ compares in-memory shape trees; this module produces them from
//! a parsed `p:spTree` element. Open-ended property elements are captured as
//! canonical JSON values so two snapshots of the same markup always compare
//! equal structurally.
use crate::pptx::shapes::{
    BlipFill, Connector, ConnectorProperties, ContentPart, GraphicContent, GraphicFrame,
    GroupProperties, GroupShape, GroupTransform, NonVisualProperties, Picture,
    PictureProperties, PlainShape, Shape, ShapeProperties, Transform,
};
use crate::xml::{XmlElement, XmlNode};
use serde_json::{Map, Value};
use std::rc::Rc;

/// Fill elements that can appear directly under a property block.
const FILL_TAGS: [&str; 6] = [
    "a:noFill",
    "a:solidFill",
    "a:gradFill",
    "a:blipFill",
    "a:pattFill",
    "a:grpFill",
];

/// Parse the shapes of a `p:spTree` (or `p:grpSp`) element into the shape
/// model, in document order.
///
/// Non-shape children (the nonvisual and group-property blocks) are ignored;
/// unknown elements are skipped.
pub fn parse_shape_tree(sp_tree: &XmlElement) -> Vec<Shape> {
    sp_tree
        .element_children()
        .filter_map(|el| parse_shape(el))
        .collect()
}

fn parse_shape(el: &XmlElement) -> Option<Shape> {
    match el.name.as_str() {
        "p:sp" => parse_plain_shape(el),
        "p:pic" => parse_picture(el),
        "p:grpSp" => parse_group(el),
        "p:cxnSp" => parse_connector(el),
        "p:graphicFrame" => parse_graphic_frame(el),
        "p:contentPart" => Some(Shape::ContentPart(ContentPart {
            resource_id: el.attr("r:id").map(str::to_string),
        })),
        _ => None,
    }
}

fn parse_plain_shape(el: &XmlElement) -> Option<Shape> {
    let non_visual = non_visual_of(el, "p:nvSpPr")?;
    let sp_pr = el.child("p:spPr");
    Some(Shape::Shape(PlainShape {
        non_visual,
        properties: ShapeProperties {
            transform: sp_pr.and_then(|p| transform_of(p)),
            fill: sp_pr.and_then(|p| fill_value(p)),
            line: sp_pr.and_then(|p| p.child("a:ln")).map(|el| element_value(el)),
            effects: sp_pr
                .and_then(|p| p.child("a:effectLst"))
                .map(|el| element_value(el)),
            geometry: sp_pr
                .and_then(|p| p.child("a:prstGeom").or_else(|| p.child("a:custGeom")))
                .map(|el| element_value(el)),
        },
        text_body: el.child("p:txBody").map(|el| element_value(el)),
    }))
}

fn parse_picture(el: &XmlElement) -> Option<Shape> {
    let non_visual = non_visual_of(el, "p:nvPicPr")?;
    let sp_pr = el.child("p:spPr");
    let resource_id = el
        .child("p:blipFill")
        .and_then(|bf| bf.child("a:blip"))
        .and_then(|blip| blip.attr("r:embed"))
        .unwrap_or_default()
        .to_string();

    Some(Shape::Picture(Picture {
        non_visual,
        properties: PictureProperties {
            transform: sp_pr.and_then(|p| transform_of(p)),
            effects: sp_pr
                .and_then(|p| p.child("a:effectLst"))
                .map(|el| element_value(el)),
        },
        blip_fill: BlipFill { resource_id },
    }))
}

fn parse_group(el: &XmlElement) -> Option<Shape> {
    let non_visual = non_visual_of(el, "p:nvGrpSpPr")?;
    let grp_pr = el.child("p:grpSpPr");
    Some(Shape::Group(GroupShape {
        non_visual,
        properties: GroupProperties {
            transform: grp_pr
                .and_then(|p| p.child("a:xfrm"))
                .map(|x| group_transform_of(x)),
            fill: grp_pr.and_then(|p| fill_value(p)),
            effects: grp_pr
                .and_then(|p| p.child("a:effectLst"))
                .map(|el| element_value(el)),
        },
        children: parse_shape_tree(el),
    }))
}

fn parse_connector(el: &XmlElement) -> Option<Shape> {
    let non_visual = non_visual_of(el, "p:nvCxnSpPr")?;
    let sp_pr = el.child("p:spPr");
    Some(Shape::Connector(Connector {
        non_visual,
        properties: ConnectorProperties {
            transform: sp_pr.and_then(|p| transform_of(p)),
            fill: sp_pr.and_then(|p| fill_value(p)),
            line: sp_pr.and_then(|p| p.child("a:ln")).map(|el| element_value(el)),
        },
    }))
}

fn parse_graphic_frame(el: &XmlElement) -> Option<Shape> {
    let non_visual = non_visual_of(el, "p:nvGraphicFramePr")?;
    let transform = el.child("p:xfrm").map(|x| base_transform_of(x));
    let graphic_data = el
        .child("a:graphic")
        .and_then(|g| g.child("a:graphicData"));

    let content = match graphic_data {
        Some(data) => match data.child("a:tbl") {
            Some(tbl) => GraphicContent::Table { tree: Rc::clone(tbl) },
            None => GraphicContent::Other {
                uri: data.attr("uri").unwrap_or_default().to_string(),
                data: element_value(data),
            },
        },
        None => GraphicContent::Other {
            uri: String::new(),
            data: Value::Null,
        },
    };

    Some(Shape::GraphicFrame(GraphicFrame {
        non_visual,
        transform,
        content,
    }))
}

/// Read id and name from a shape's nonvisual property block.
///
/// A shape whose id is missing cannot be tracked and is dropped from the
/// snapshot.
fn non_visual_of(el: &XmlElement, nv_name: &str) -> Option<NonVisualProperties> {
    let c_nv_pr = el.child(nv_name)?.child("p:cNvPr")?;
    Some(NonVisualProperties {
        id: c_nv_pr.attr("id")?.to_string(),
        name: c_nv_pr.attr("name").unwrap_or_default().to_string(),
    })
}

fn transform_of(props: &XmlElement) -> Option<Transform> {
    props.child("a:xfrm").map(|x| base_transform_of(x))
}

fn base_transform_of(xfrm: &XmlElement) -> Transform {
    let (x, y) = xfrm
        .child("a:off")
        .map(|off| (attr_i64(off, "x"), attr_i64(off, "y")))
        .unwrap_or((0, 0));
    let (width, height) = xfrm
        .child("a:ext")
        .map(|ext| (attr_i64(ext, "cx"), attr_i64(ext, "cy")))
        .unwrap_or((0, 0));

    Transform {
        x,
        y,
        width,
        height,
        rotation: xfrm.attr("rot").and_then(|v| v.parse().ok()).unwrap_or(0),
        flip_h: flag_attr(xfrm, "flipH"),
        flip_v: flag_attr(xfrm, "flipV"),
    }
}

fn group_transform_of(xfrm: &XmlElement) -> GroupTransform {
    let (child_offset_x, child_offset_y) = xfrm
        .child("a:chOff")
        .map(|off| (attr_i64(off, "x"), attr_i64(off, "y")))
        .unwrap_or((0, 0));
    let (child_extent_width, child_extent_height) = xfrm
        .child("a:chExt")
        .map(|ext| (attr_i64(ext, "cx"), attr_i64(ext, "cy")))
        .unwrap_or((0, 0));

    GroupTransform {
        base: base_transform_of(xfrm),
        child_offset_x,
        child_offset_y,
        child_extent_width,
        child_extent_height,
    }
}

fn fill_value(props: &XmlElement) -> Option<Value> {
    props
        .element_children()
        .find(|el| FILL_TAGS.contains(&el.name.as_str()))
        .map(|el| element_value(el))
}

fn attr_i64(el: &XmlElement, name: &str) -> i64 {
    el.attr(name).and_then(|v| v.parse().ok()).unwrap_or(0)
}

fn flag_attr(el: &XmlElement, name: &str) -> bool {
    el.attr(name).is_some_and(|v| v == "1" || v == "true")
}

/// Canonical JSON rendering of an XML element.
///
/// The tag name doubles as the type discriminator, so structurally different
/// payloads (a solid fill vs. a no-fill) never compare equal.
fn element_value(el: &XmlElement) -> Value {
    let mut obj = Map::new();
    obj.insert("tag".to_string(), Value::String(el.name.clone()));

    if !el.attrs.is_empty() {
        let attrs: Map<String, Value> = el
            .attrs
            .iter()
            .map(|a| (a.name.clone(), Value::String(a.value.clone())))
            .collect();
        obj.insert("attrs".to_string(), Value::Object(attrs));
    }

    let children: Vec<Value> = el
        .children
        .iter()
        .filter_map(|node| match node {
            XmlNode::Element(child) => Some(element_value(child)),
            XmlNode::Text(text) => Some(Value::String(text.clone())),
            XmlNode::Comment(_) => None,
        })
        .collect();
    if !children.is_empty() {
        obj.insert("children".to_string(), Value::Array(children));
    }

    Value::Object(obj)
}
