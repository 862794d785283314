//! Per-shape property change detection.
use crate::pptx::diff::equality::{
    is_effects_equal, is_fill_equal, is_geometry_equal, is_group_transform_equal, is_line_equal,
    is_text_body_equal, is_transform_equal,
};
use crate::pptx::shapes::Shape;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A shape property tracked by the differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyName {
    Transform,
    Fill,
    Line,
    Effects,
    Geometry,
    TextBody,
    BlipFill,
}

/// One changed property with its before/after values.
///
/// Values are JSON renderings; an absent property appears as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyChange {
    pub property: PropertyName,
    pub old_value: Value,
    pub new_value: Value,
}

/// Detect per-property changes between two versions of one shape.
///
/// Returns an empty list when the two references are identical, and when the
/// shape kinds differ — a kind change is represented at the tree level as a
/// remove plus an add, never as a property diff. Each shape kind contributes
/// exactly the property set it declares, evaluated in declaration order;
/// every failing predicate yields one independent entry.
pub fn detect_shape_property_changes(original: &Shape, modified: &Shape) -> Vec<PropertyChange> {
    if std::ptr::eq(original, modified) {
        return Vec::new();
    }

    let mut changes = Vec::new();
    match (original, modified) {
        (Shape::Shape(a), Shape::Shape(b)) => {
            if !is_transform_equal(a.properties.transform.as_ref(), b.properties.transform.as_ref())
            {
                changes.push(typed_change(
                    PropertyName::Transform,
                    a.properties.transform.as_ref(),
                    b.properties.transform.as_ref(),
                ));
            }
            push_value_change(
                &mut changes,
                PropertyName::Fill,
                is_fill_equal,
                a.properties.fill.as_ref(),
                b.properties.fill.as_ref(),
            );
            push_value_change(
                &mut changes,
                PropertyName::Line,
                is_line_equal,
                a.properties.line.as_ref(),
                b.properties.line.as_ref(),
            );
            push_value_change(
                &mut changes,
                PropertyName::Effects,
                is_effects_equal,
                a.properties.effects.as_ref(),
                b.properties.effects.as_ref(),
            );
            push_value_change(
                &mut changes,
                PropertyName::Geometry,
                is_geometry_equal,
                a.properties.geometry.as_ref(),
                b.properties.geometry.as_ref(),
            );
            push_value_change(
                &mut changes,
                PropertyName::TextBody,
                is_text_body_equal,
                a.text_body.as_ref(),
                b.text_body.as_ref(),
            );
        },
        (Shape::Picture(a), Shape::Picture(b)) => {
            if !is_transform_equal(a.properties.transform.as_ref(), b.properties.transform.as_ref())
            {
                changes.push(typed_change(
                    PropertyName::Transform,
                    a.properties.transform.as_ref(),
                    b.properties.transform.as_ref(),
                ));
            }
            push_value_change(
                &mut changes,
                PropertyName::Effects,
                is_effects_equal,
                a.properties.effects.as_ref(),
                b.properties.effects.as_ref(),
            );
            if a.blip_fill != b.blip_fill {
                changes.push(typed_change(
                    PropertyName::BlipFill,
                    Some(&a.blip_fill),
                    Some(&b.blip_fill),
                ));
            }
        },
        (Shape::Group(a), Shape::Group(b)) => {
            if !is_group_transform_equal(
                a.properties.transform.as_ref(),
                b.properties.transform.as_ref(),
            ) {
                changes.push(typed_change(
                    PropertyName::Transform,
                    a.properties.transform.as_ref(),
                    b.properties.transform.as_ref(),
                ));
            }
            push_value_change(
                &mut changes,
                PropertyName::Fill,
                is_fill_equal,
                a.properties.fill.as_ref(),
                b.properties.fill.as_ref(),
            );
            push_value_change(
                &mut changes,
                PropertyName::Effects,
                is_effects_equal,
                a.properties.effects.as_ref(),
                b.properties.effects.as_ref(),
            );
        },
        (Shape::Connector(a), Shape::Connector(b)) => {
            if !is_transform_equal(a.properties.transform.as_ref(), b.properties.transform.as_ref())
            {
                changes.push(typed_change(
                    PropertyName::Transform,
                    a.properties.transform.as_ref(),
                    b.properties.transform.as_ref(),
                ));
            }
            push_value_change(
                &mut changes,
                PropertyName::Fill,
                is_fill_equal,
                a.properties.fill.as_ref(),
                b.properties.fill.as_ref(),
            );
            push_value_change(
                &mut changes,
                PropertyName::Line,
                is_line_equal,
                a.properties.line.as_ref(),
                b.properties.line.as_ref(),
            );
        },
        (Shape::GraphicFrame(a), Shape::GraphicFrame(b)) => {
            if !is_transform_equal(a.transform.as_ref(), b.transform.as_ref()) {
                changes.push(typed_change(
                    PropertyName::Transform,
                    a.transform.as_ref(),
                    b.transform.as_ref(),
                ));
            }
        },
        // Content parts have no tracked properties.
        (Shape::ContentPart(_), Shape::ContentPart(_)) => {},
        // Kind changed at the same id: nothing to report here.
        _ => {},
    }
    changes
}

fn push_value_change(
    changes: &mut Vec<PropertyChange>,
    property: PropertyName,
    is_equal: fn(Option<&Value>, Option<&Value>) -> bool,
    old: Option<&Value>,
    new: Option<&Value>,
) {
    if !is_equal(old, new) {
        changes.push(PropertyChange {
            property,
            old_value: old.cloned().unwrap_or(Value::Null),
            new_value: new.cloned().unwrap_or(Value::Null),
        });
    }
}

fn typed_change<T: Serialize>(
    property: PropertyName,
    old: Option<&T>,
    new: Option<&T>,
) -> PropertyChange {
    PropertyChange {
        property,
        old_value: json_of(old),
        new_value: json_of(new),
    }
}

fn json_of<T: Serialize>(value: Option<&T>) -> Value {
    value
        .and_then(|v| serde_json::to_value(v).ok())
        .unwrap_or(Value::Null)
}
