//! Structural patch application for slide content.
//!
//! Two appliers with deliberately different failure policies:
//!
//! - [`apply_table_updates`] is best-effort — a spec whose target shape
//!   cannot be resolved is skipped quietly, and the caller observes only a
//!   lower `updated` count. Editors rely on stale shape ids no-opping.
//! - [`apply_smartart_updates`] is fail-fast — a broken relationship or a
//!   missing diagram part aborts the batch with an error naming the
//!   offending resource id. Broken diagram links must surface loudly.

// Submodule declarations
pub mod smartart;
pub mod table;
pub mod text;

// Re-exports
pub use smartart::{apply_smartart_updates, DiagramChange, SmartArtUpdate};
pub use table::{
    apply_table_updates, CellUpdate, ColumnInsert, RowInsert, TablePatchResult, TableUpdate,
};
pub use text::{build_text_body, empty_text_body, CellContent, ParagraphSpec};
