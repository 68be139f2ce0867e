//! Book structure - the static tree a reader navigates.
//!
//! The structure consists of:
//! - **Critical path**: The canonical linear sequence of nodes
//! - **Chapters**: Groups of node ids with a start node
//! - **Character POVs**: Per-node alternative versions told by a character
//! - **Tracks**: Named alternative sequences (e.g. the non-fiction track)
//! - **Related content**: Links from a node to related articles

mod definition;
mod validation;

pub use definition::*;
pub use validation::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::StructureResult;

/// Kinds of content a node can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Fiction,
    Nonfiction,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Fiction => "fiction",
            NodeType::Nonfiction => "nonfiction",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An entry on the critical path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// POV used when the reader does not ask for one.
    #[serde(rename = "defaultPOV", default, skip_serializing_if = "Option::is_none")]
    pub default_pov: Option<String>,

    /// Chapter id this node belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,

    #[serde(rename = "type", default)]
    pub node_type: NodeType,

    /// Content path relative to the content root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl NodeDescriptor {
    /// Create a fiction descriptor with the given id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            default_pov: None,
            chapter: None,
            node_type: NodeType::Fiction,
            file_path: None,
        }
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    pub fn with_default_pov(mut self, pov: impl Into<String>) -> Self {
        self.default_pov = Some(pov.into());
        self
    }

    pub fn with_chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter = Some(chapter.into());
        self
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

/// A chapter grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_node: Option<String>,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One character's version of a base node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PovVariant {
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl PovVariant {
    pub fn new(character: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            node_id: node_id.into(),
            file_path: None,
        }
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Check whether both the character and the node id are set.
    pub fn is_complete(&self) -> bool {
        !self.character.is_empty() && !self.node_id.is_empty()
    }
}

/// A named alternative reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_node: Option<String>,
    #[serde(default)]
    pub node_sequence: Vec<String>,
}

/// A character listed in the book structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    #[serde(default)]
    pub name: String,

    // Free-form fields (role, description, ...) kept as-is
    #[serde(flatten)]
    pub details: HashMap<String, serde_json::Value>,
}

/// The complete structure of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookStructure {
    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_start_node: Option<String>,

    #[serde(rename = "defaultPOV", default, skip_serializing_if = "Option::is_none")]
    pub default_pov: Option<String>,

    /// Canonical linear node order.
    #[serde(default)]
    pub critical_path: Vec<NodeDescriptor>,

    #[serde(default)]
    pub chapters: Vec<Chapter>,

    /// Base node id -> character versions of that node.
    #[serde(rename = "characterPOVs", default)]
    pub character_povs: BTreeMap<String, Vec<PovVariant>>,

    /// Track id -> track.
    #[serde(default)]
    pub tracks: BTreeMap<String, Track>,

    /// Node id -> related node ids.
    #[serde(default)]
    pub related_content: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub characters: Vec<CharacterProfile>,
}

impl BookStructure {
    /// Create an empty structure with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// The structure substituted when loading fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a structure from its JSON document.
    pub fn from_json(json: &str) -> StructureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check whether the structure has no nodes or chapters at all.
    pub fn is_empty(&self) -> bool {
        self.critical_path.is_empty() && self.chapters.is_empty()
    }

    /// Append a node to the critical path.
    pub fn with_node(mut self, node: NodeDescriptor) -> Self {
        self.critical_path.push(node);
        self
    }

    pub fn with_chapter(mut self, chapter: Chapter) -> Self {
        self.chapters.push(chapter);
        self
    }

    pub fn with_pov_variant(mut self, base_node_id: impl Into<String>, variant: PovVariant) -> Self {
        self.character_povs
            .entry(base_node_id.into())
            .or_default()
            .push(variant);
        self
    }

    pub fn with_track(mut self, track_id: impl Into<String>, track: Track) -> Self {
        self.tracks.insert(track_id.into(), track);
        self
    }

    pub fn with_related(
        mut self,
        node_id: impl Into<String>,
        related: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.related_content
            .entry(node_id.into())
            .or_default()
            .extend(related.into_iter().map(Into::into));
        self
    }

    pub fn with_start_node(mut self, node_id: impl Into<String>) -> Self {
        self.default_start_node = Some(node_id.into());
        self
    }

    pub fn with_default_pov(mut self, pov: impl Into<String>) -> Self {
        self.default_pov = Some(pov.into());
        self
    }

    /// Get the critical-path entry for a node.
    pub fn critical_path_node(&self, node_id: &str) -> Option<&NodeDescriptor> {
        self.critical_path.iter().find(|node| node.id == node_id)
    }

    /// Get the position of a node on the critical path.
    pub fn critical_path_index(&self, node_id: &str) -> Option<usize> {
        self.critical_path.iter().position(|node| node.id == node_id)
    }

    /// Get the id following a node on the critical path.
    pub fn next_in_critical_path(&self, node_id: &str) -> Option<&str> {
        let index = self.critical_path_index(node_id)?;
        self.critical_path.get(index + 1).map(|node| node.id.as_str())
    }

    /// Get the id preceding a node on the critical path.
    pub fn previous_in_critical_path(&self, node_id: &str) -> Option<&str> {
        let index = self.critical_path_index(node_id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.critical_path.get(i))
            .map(|node| node.id.as_str())
    }

    /// Get all character versions of a base node.
    pub fn pov_variants(&self, base_node_id: &str) -> &[PovVariant] {
        self.character_povs
            .get(base_node_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get a specific character's version of a base node. Incomplete entries are skipped.
    pub fn pov_variant(&self, base_node_id: &str, character: &str) -> Option<&PovVariant> {
        self.pov_variants(base_node_id)
            .iter()
            .find(|variant| variant.is_complete() && variant.character == character)
    }

    /// Find the base node id and entry for a POV variant id.
    pub fn variant_by_node_id(&self, variant_node_id: &str) -> Option<(&str, &PovVariant)> {
        self.character_povs.iter().find_map(|(base, variants)| {
            variants
                .iter()
                .find(|variant| variant.is_complete() && variant.node_id == variant_node_id)
                .map(|variant| (base.as_str(), variant))
        })
    }

    /// Get the characters a node can be read as.
    pub fn available_povs(&self, node_id: &str) -> Vec<&str> {
        self.pov_variants(node_id)
            .iter()
            .filter(|variant| variant.is_complete())
            .map(|variant| variant.character.as_str())
            .collect()
    }

    pub fn chapter(&self, chapter_id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|chapter| chapter.id == chapter_id)
    }

    /// Get the node ids listed in a chapter.
    pub fn nodes_in_chapter(&self, chapter_id: &str) -> &[String] {
        self.chapter(chapter_id)
            .map(|chapter| chapter.nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Get the related non-fiction ids for a node.
    pub fn related_nonfiction(&self, node_id: &str) -> &[String] {
        self.related_content
            .get(node_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.tracks.get(track_id)
    }

    /// Get the ordered node ids of a track.
    pub fn nodes_in_track(&self, track_id: &str) -> &[String] {
        self.track(track_id)
            .map(|track| track.node_sequence.as_slice())
            .unwrap_or(&[])
    }
}
