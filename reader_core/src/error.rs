//! Error types for the reader runtime.

use book_structure::StructureError;
use thiserror::Error;

/// Errors from fetching a document out of a content source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("content not found: {path}")]
    NotFound { path: String },

    #[error("request for {path} failed with status {status}")]
    Status { path: String, status: u16 },

    #[error("invalid content path: {0}")]
    InvalidPath(String),

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced to callers of the reader.
///
/// Fetch failures for node content never show up here; the loader turns them
/// into placeholder nodes. Only navigation exhaustion and setup problems do.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("no current node")]
    NoCurrentNode,

    #[error("no next node defined after {node_id}")]
    NoNextNode { node_id: String },

    #[error("no previous node defined before {node_id}")]
    NoPreviousNode { node_id: String },

    #[error("book structure defines no start node")]
    NoStartNode,

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("could not read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ReaderError {
    /// Check whether this error means navigation ran out of nodes.
    pub fn is_navigation_exhausted(&self) -> bool {
        matches!(
            self,
            ReaderError::NoNextNode { .. } | ReaderError::NoPreviousNode { .. }
        )
    }
}

pub type ReaderResult<T> = Result<T, ReaderError>;
