//! Node content - the payload of a single scene or concept article.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::StructureResult;
use crate::naming::infer_node_type;
use crate::structure::NodeType;

/// A resolved content unit.
///
/// The node kind is written as `type`. Files from the structure editor use
/// `nodeType` instead; when neither is present the kind follows the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NodeDocument")]
pub struct Node {
    pub id: String,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    pub data: NodeData,

    pub metadata: NodeMetadata,

    pub navigation: NodeNavigation,
}

/// On-disk shape of a node, accepting both spellings of the kind.
#[derive(Deserialize)]
struct NodeDocument {
    id: String,

    #[serde(rename = "type", default)]
    node_type: Option<NodeType>,

    #[serde(rename = "nodeType", default)]
    editor_node_type: Option<NodeType>,

    #[serde(default)]
    data: NodeData,

    #[serde(default)]
    metadata: NodeMetadata,

    #[serde(default)]
    navigation: NodeNavigation,
}

impl From<NodeDocument> for Node {
    fn from(doc: NodeDocument) -> Self {
        let node_type = doc
            .node_type
            .or(doc.editor_node_type)
            .unwrap_or_else(|| infer_node_type(&doc.id));

        Self {
            id: doc.id,
            node_type,
            data: doc.data,
            metadata: doc.metadata,
            navigation: doc.navigation,
        }
    }
}

/// Displayable content of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub label: String,

    /// Rich text, already HTML-safe.
    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Branch choices as shown in the text.
    #[serde(default)]
    pub branch_points: Vec<BranchPoint>,
}

/// A branch choice embedded in the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchPoint {
    #[serde(default)]
    pub text: String,
    pub target_node_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pov_character: Option<String>,

    /// Set on placeholders synthesized when the content could not be fetched.
    #[serde(default)]
    pub simulated: bool,
}

/// Outgoing links of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeNavigation {
    #[serde(default)]
    pub previous: Option<String>,

    #[serde(default)]
    pub next: Option<String>,

    #[serde(default)]
    pub branch_points: Vec<BranchLink>,

    #[serde(default)]
    pub related_non_fiction: Vec<String>,

    #[serde(default)]
    pub alternate_versions: Vec<AlternateVersion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchLink {
    pub target_node_id: String,
}

/// Another character's telling of the same scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternateVersion {
    pub pov_character: String,
    pub node_id: String,
}

impl Node {
    /// Create an empty node.
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            data: NodeData::default(),
            metadata: NodeMetadata::default(),
            navigation: NodeNavigation::default(),
        }
    }

    /// Parse a node content document.
    pub fn from_json(json: &str) -> StructureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = label.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.data.content = content.into();
        self
    }

    pub fn with_pov_character(mut self, pov: impl Into<String>) -> Self {
        self.metadata.pov_character = Some(pov.into());
        self
    }

    pub fn with_next(mut self, node_id: impl Into<String>) -> Self {
        self.navigation.next = Some(node_id.into());
        self
    }

    pub fn with_previous(mut self, node_id: impl Into<String>) -> Self {
        self.navigation.previous = Some(node_id.into());
        self
    }

    /// Add a branch both to the text and to the navigation links.
    pub fn with_branch(mut self, text: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        self.data.branch_points.push(BranchPoint {
            text: text.into(),
            target_node_id: target.clone(),
        });
        self.navigation.branch_points.push(BranchLink {
            target_node_id: target,
        });
        self
    }

    pub fn with_related_nonfiction(mut self, node_id: impl Into<String>) -> Self {
        self.navigation.related_non_fiction.push(node_id.into());
        self
    }

    /// Check whether this node is a synthesized placeholder.
    pub fn is_simulated(&self) -> bool {
        self.metadata.simulated
    }

    /// Get the navigation target of a branch.
    pub fn branch_target(&self, index: usize) -> Option<&str> {
        self.navigation
            .branch_points
            .get(index)
            .map(|branch| branch.target_node_id.as_str())
    }
}
