//! Content sources - where structure and node documents come from.

mod directory;
mod http;
mod memory;

pub use directory::*;
pub use http::*;
pub use memory::*;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ReaderConfig;
use crate::error::{FetchError, ReaderResult};

/// A read-only store of documents addressed by relative path.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the raw text of a document.
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Build the source a configuration points at.
pub fn source_from_config(config: &ReaderConfig) -> ReaderResult<Arc<dyn ContentSource>> {
    if config.is_remote() {
        let source = HttpSource::new(&config.content_root, config.request_timeout())?;
        Ok(Arc::new(source))
    } else {
        Ok(Arc::new(DirectorySource::new(&config.content_root)))
    }
}
