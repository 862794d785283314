//! Package access abstraction.
//!
//! Part paths are ZIP member names without a leading slash, e.g.
//! `ppt/slides/slide1.xml`.
use std::collections::HashMap;

/// Read/write access to the text parts of an Office package.
///
/// Implementations are synchronous and are not re-entered concurrently by
/// this crate.
pub trait ZipPackage {
    /// Read a part's text content, or `None` if the part does not exist.
    fn read_text(&self, path: &str) -> Option<String>;

    /// Write (or overwrite) a part's text content.
    fn write_text(&mut self, path: &str, content: &str);

    /// List all part paths in the package.
    fn list_files(&self) -> Vec<String>;
}

/// In-memory package backed by a string map.
///
/// Used by tests and by embedders that already hold part text (e.g. an editor
/// that extracted the parts it is working on).
#[derive(Debug, Clone, Default)]
pub struct MemPackage {
    parts: HashMap<String, String>,
}

impl MemPackage {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a part, replacing any existing content at the same path.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.parts.insert(path.into(), content.into());
    }

    /// Check whether a part exists.
    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.parts.contains_key(path)
    }

    /// Number of parts in the package.
    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if the package is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl ZipPackage for MemPackage {
    fn read_text(&self, path: &str) -> Option<String> {
        self.parts.get(path).cloned()
    }

    fn write_text(&mut self, path: &str, content: &str) {
        self.parts.insert(path.to_string(), content.to_string());
    }

    fn list_files(&self) -> Vec<String> {
        let mut files: Vec<String> = self.parts.keys().cloned().collect();
        files.sort_unstable();
        files
    }
}
