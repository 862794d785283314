//! Recursive shape-tree diffing.
use crate::pptx::diff::detector::{detect_shape_property_changes, PropertyChange};
use crate::pptx::shapes::{Shape, ShapeKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single structural change between two versions of a slide's shape tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShapeChange {
    /// A shape present only in the new tree.
    #[serde(rename_all = "camelCase")]
    Added {
        shape: Shape,
        /// Id of the enclosing group; absent for top-level shapes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<String>,
        /// Id of the immediately preceding identified sibling in the new
        /// tree; absent when the shape leads its level. Consecutively added
        /// siblings chain through each other in insertion order.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        after_id: Option<String>,
    },
    /// A shape present only in the original tree.
    #[serde(rename_all = "camelCase")]
    Removed {
        shape_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<String>,
    },
    /// A shape present in both trees whose properties differ.
    Modified(ShapeModified),
}

/// The per-property diff of one modified shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeModified {
    pub shape_id: String,
    pub shape_type: ShapeKind,
    pub changes: Vec<PropertyChange>,
}

/// Compare two versions of a slide's shape tree.
///
/// Shapes are matched by their stable id at each container level; id-less
/// shapes (content parts) are invisible on both sides. Group shapes present
/// as groups in both versions are descended into regardless of whether their
/// own properties changed, with `parent_id` set to the group's id for every
/// change emitted at that level.
///
/// A shape whose kind discriminant changed at a matching id produces no
/// change record: the property detector short-circuits on the kind mismatch
/// and no synthetic remove/add pair is emitted.
pub fn detect_slide_changes(original: &[Shape], modified: &[Shape]) -> Vec<ShapeChange> {
    let mut changes = Vec::new();
    diff_level(original, modified, None, &mut changes);
    changes
}

fn diff_level(
    original: &[Shape],
    modified: &[Shape],
    parent_id: Option<&str>,
    out: &mut Vec<ShapeChange>,
) {
    let original_by_id = index_by_id(original);
    let modified_by_id = index_by_id(modified);

    // Removed: ids that vanished from this level, in original order.
    for shape in original {
        let Some(id) = shape.id() else { continue };
        if !modified_by_id.contains_key(id) {
            out.push(ShapeChange::Removed {
                shape_id: id.to_string(),
                parent_id: parent_id.map(str::to_string),
            });
        }
    }

    // Added and modified, walking the new list in order so that insertion
    // chains thread through shapes added in this same pass.
    let mut previous_id: Option<&str> = None;
    for shape in modified {
        let Some(id) = shape.id() else { continue };
        match original_by_id.get(id) {
            None => {
                out.push(ShapeChange::Added {
                    shape: shape.clone(),
                    parent_id: parent_id.map(str::to_string),
                    after_id: previous_id.map(str::to_string),
                });
            },
            Some(old) => {
                let property_changes = detect_shape_property_changes(old, shape);
                if !property_changes.is_empty() {
                    out.push(ShapeChange::Modified(ShapeModified {
                        shape_id: id.to_string(),
                        shape_type: shape.kind(),
                        changes: property_changes,
                    }));
                }
                if let (Shape::Group(old_group), Shape::Group(new_group)) = (*old, shape) {
                    diff_level(&old_group.children, &new_group.children, Some(id), out);
                }
            },
        }
        previous_id = Some(id);
    }
}

fn index_by_id(shapes: &[Shape]) -> HashMap<&str, &Shape> {
    shapes
        .iter()
        .filter_map(|shape| shape.id().map(|id| (id, shape)))
        .collect()
}
