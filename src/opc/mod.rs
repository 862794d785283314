//! Open Packaging Conventions seam: package access and relationships.
//!
//! The patching layer treats an Office package as a key-value store of text
//! parts plus the `.rels` files that link them. Archive handling itself is
//! the host's concern and stays behind the [`ZipPackage`] trait.

// Submodule declarations
pub mod package;
pub mod rels;

// Re-exports
pub use package::{MemPackage, ZipPackage};
pub use rels::{parse_relationships, part_dir, rels_path_for, resolve_target, Relationship};
