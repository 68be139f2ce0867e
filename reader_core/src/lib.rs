//! # Reader Core
//!
//! The runtime of the interactive book reader. This crate reads the static
//! model from `book_structure`, fetches node content, and keeps track of where
//! the reader is.
//!
//! ## Core Components
//!
//! - **resolver**: Maps a node id and optional POV to a target node and candidate paths
//! - **source**: Where content comes from (HTTP, a directory, or memory)
//! - **loader**: Fetches and caches nodes, synthesizing placeholders on failure
//! - **navigation**: Next/previous/branch navigation and the reading history
//! - **events**: Typed reader events and commands
//! - **reader**: A reading session that opens the book and dispatches commands
//!
//! ## Design Philosophy
//!
//! - **Never Stuck**: A missing file yields a placeholder node, never an error
//! - **Explicit Instances**: A loader is constructed and passed around, there is no global
//! - **Surface-Agnostic**: Nothing here knows how a node is rendered

pub mod config;
pub mod error;
pub mod events;
pub mod loader;
pub mod navigation;
pub mod reader;
pub mod resolver;
pub mod source;

pub use config::*;
pub use error::*;
pub use events::*;
pub use loader::*;
pub use navigation::*;
pub use reader::*;
pub use resolver::*;
pub use source::*;
