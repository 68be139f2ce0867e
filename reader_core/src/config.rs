//! Reader configuration, loaded from TOML.
//!
//! ```toml
//! content_root = "https://example.org/book/content"
//! structure_path = "book-structure.json"
//! default_pov = "Omniscient"
//! request_timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use book_structure::GLOBAL_DEFAULT_POV;

use crate::error::ReaderResult;

pub const DEFAULT_CONTENT_ROOT: &str = "content";
pub const DEFAULT_STRUCTURE_PATH: &str = "book-structure.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings for a reader instance. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Directory or `http(s)://` base URL holding the book content.
    pub content_root: String,

    /// Structure document, relative to the content root.
    pub structure_path: String,

    /// POV used when neither the node nor the book declares one.
    pub default_pov: String,

    /// Timeout for a single HTTP fetch.
    pub request_timeout_secs: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            content_root: DEFAULT_CONTENT_ROOT.to_string(),
            structure_path: DEFAULT_STRUCTURE_PATH.to_string(),
            default_pov: GLOBAL_DEFAULT_POV.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ReaderConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> ReaderResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> ReaderResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn with_content_root(mut self, root: impl Into<String>) -> Self {
        self.content_root = root.into();
        self
    }

    pub fn with_default_pov(mut self, pov: impl Into<String>) -> Self {
        self.default_pov = pov.into();
        self
    }

    /// Check whether content is served over HTTP rather than read from disk.
    pub fn is_remote(&self) -> bool {
        self.content_root.starts_with("http://") || self.content_root.starts_with("https://")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
