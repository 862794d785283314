//! Shape-tree diffing: equality primitives, property detection, tree walk.
//!
//! The differ is total over well-formed shape trees: no input raises an
//! error, and a shape without an identifier is handled by omission.

// Submodule declarations
pub mod detector;
pub mod equality;
pub mod slide;

// Re-exports
pub use detector::{detect_shape_property_changes, PropertyChange, PropertyName};
pub use equality::{
    deep_equal, is_effects_equal, is_fill_equal, is_geometry_equal, is_group_transform_equal,
    is_line_equal, is_text_body_equal, is_transform_equal,
};
pub use slide::{detect_slide_changes, ShapeChange, ShapeModified};
