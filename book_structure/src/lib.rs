//! # Book Structure
//!
//! The static model of an interactive book. This crate is the single source of
//! truth for what the book contains and does not perform any IO.
//!
//! ## Core Components
//!
//! - **structure**: The book tree - critical path, chapters, character POV
//!   variants, tracks, related content - and lookups over it
//! - **content**: The shape of a node content file (scene or concept article)
//! - **naming**: Node id conventions (titles, inferred paths, POV ids)
//!
//! ## Design Philosophy
//!
//! - **Read-Only**: A structure is loaded once and shared; nothing here mutates it after load
//! - **Forgiving**: Every JSON field defaults, so partial or hand-written files still parse
//! - **Graceful**: Missing references degrade to inferred definitions instead of errors

pub mod content;
pub mod error;
pub mod naming;
pub mod structure;

pub use content::*;
pub use error::*;
pub use naming::*;
pub use structure::*;
