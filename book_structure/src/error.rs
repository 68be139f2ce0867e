//! Errors raised while reading book data.

use thiserror::Error;

/// Errors from parsing a book structure or node content document.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StructureResult<T> = Result<T, StructureError>;
