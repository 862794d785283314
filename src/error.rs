//! Unified error types for the Rambutan library.
//!
//! All fallible operations in this crate return [`Result`]. The diagram
//! patching errors carry the exact message text that host editors match on,
//! so their formats are part of the public contract.
use thiserror::Error;

/// Main error type for Rambutan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Package part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// No diagram relationship resolves for the requested resource id
    #[error("could not find diagram for resourceId \"{0}\"")]
    DiagramNotFound(String),

    /// One or more of the diagram's constituent parts cannot be read
    #[error("missing diagram files for resourceId \"{0}\"")]
    MissingDiagramFiles(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for Rambutan operations.
pub type Result<T> = std::result::Result<T, Error>;
