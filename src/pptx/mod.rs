//! PresentationML (.pptx) slide content: shape model, diffing, patching.

// Submodule declarations
pub mod diff;
pub mod patch;
pub mod shapes;

// Re-exports
pub use diff::{
    detect_shape_property_changes, detect_slide_changes, PropertyChange, PropertyName,
    ShapeChange, ShapeModified,
};
pub use patch::{
    apply_smartart_updates, apply_table_updates, CellContent, DiagramChange, SmartArtUpdate,
    TablePatchResult, TableUpdate,
};
pub use shapes::{parse_shape_tree, Shape, ShapeKind, Transform};
