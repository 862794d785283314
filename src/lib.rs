//! Rambutan - shape diffing and structural patching for PowerPoint presentations
//!
//! This library compares two versions of a slide's shape tree and applies
//! externally supplied patch specifications (table edits, SmartArt diagram
//! edits) onto parsed slide parts in the Office Open XML (OOXML) format.
//!
//! # Features
//!
//! - **Shape Tree Differ**: match shapes by stable id across two snapshots,
//!   recurse into groups, and report added/removed/modified shapes with
//!   per-property diffs
//! - **Table Patch Applier**: best-effort cell/row/column/style edits against
//!   `a:tbl` subtrees, preserving all unrelated nodes by reference
//! - **SmartArt Patch Applier**: fail-fast node edits against diagram data
//!   parts resolved through the slide's relationship file
//! - **Structure-preserving rebuilds**: patched documents share every node
//!   off the edit path with the input tree
//!
//! # Example - Diffing two slide snapshots
//!
//! ```no_run
//! use rambutan::pptx::{detect_slide_changes, parse_shape_tree};
//! use rambutan::xml::parse_document;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let before = parse_document(std::fs::read_to_string("before.xml")?.as_str())?;
//! let after = parse_document(std::fs::read_to_string("after.xml")?.as_str())?;
//!
//! let original = parse_shape_tree(before.root().ok_or("empty slide")?);
//! let modified = parse_shape_tree(after.root().ok_or("empty slide")?);
//!
//! for change in detect_slide_changes(&original, &modified) {
//!     println!("{}", serde_json::to_string(&change)?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Patching a table
//!
//! ```no_run
//! use rambutan::pptx::patch::{apply_table_updates, CellUpdate, TableUpdate};
//! use rambutan::xml::parse_document;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = parse_document(std::fs::read_to_string("slide1.xml")?.as_str())?;
//! let updates = vec![TableUpdate {
//!     shape_id: "42".into(),
//!     update_cells: vec![CellUpdate { row: 0, col: 1, content: "Q3".into() }],
//!     ..Default::default()
//! }];
//!
//! let result = apply_table_updates(&doc, &updates);
//! println!("updated {} table(s)", result.updated);
//! std::fs::write("slide1.xml", result.doc.to_xml_string(true))?;
//! # Ok(())
//! # }
//! ```

/// Unified error types
pub mod error;
/// Package access and relationship resolution
pub mod opc;
/// Shape model, diffing, and patching for PresentationML slides
pub mod pptx;
/// XML document tree, parser, and writer
pub mod xml;

pub use error::{Error, Result};
