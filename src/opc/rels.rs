//! Relationship (`.rels`) parsing and target resolution.
//!
//! Every part may carry a companion relationships file at
//! `<dir>/_rels/<file>.rels` whose `Relationship` entries link the part to
//! others by id. Targets are relative references (possibly with `..`
//! segments) or absolute package paths starting with `/`.
use crate::xml::XmlDocument;

/// Namespace of the OOXML package relationships vocabulary.
pub const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g. "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target reference, relative to the source part's directory unless it
    /// starts with `/`
    pub target: String,
}

/// Parse the `Relationship` entries of a `.rels` document.
///
/// Entries missing any of `Id`/`Type`/`Target` are skipped. Matching is by
/// local name so prefixed relationship vocabularies parse the same way.
pub fn parse_relationships(doc: &XmlDocument) -> Vec<Relationship> {
    let Some(root) = doc.root() else {
        return Vec::new();
    };
    if root.local_name() != "Relationships" {
        return Vec::new();
    }

    root.element_children()
        .filter(|el| el.local_name() == "Relationship")
        .filter_map(|el| {
            Some(Relationship {
                id: el.attr("Id")?.to_string(),
                rel_type: el.attr("Type")?.to_string(),
                target: el.attr("Target")?.to_string(),
            })
        })
        .collect()
}

/// Compute the `.rels` path for a part.
///
/// `ppt/slides/slide1.xml` maps to `ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_path_for(part_path: &str) -> String {
    match part_path.rfind('/') {
        Some(pos) => format!(
            "{}/_rels/{}.rels",
            &part_path[..pos],
            &part_path[pos + 1..]
        ),
        None => format!("_rels/{}.rels", part_path),
    }
}

/// The directory portion of a part path, without a trailing slash.
///
/// Returns an empty string for parts at the package root.
pub fn part_dir(part_path: &str) -> &str {
    match part_path.rfind('/') {
        Some(pos) => &part_path[..pos],
        None => "",
    }
}

/// Resolve a relationship target against a base directory.
///
/// Targets starting with `/` are absolute package paths; relative targets may
/// contain `.` and `..` segments, which are collapsed POSIX-style.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            other => segments.push(other),
        }
    }
    segments.join("/")
}
