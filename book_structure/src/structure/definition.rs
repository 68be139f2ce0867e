//! Node definitions - what the structure knows about a single node id.

use serde::{Deserialize, Serialize};

use super::{BookStructure, NodeType};
use crate::naming::{humanize_title, infer_file_path};

/// Where a definition was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefinitionSource {
    /// An explicit critical-path entry.
    CriticalPath,
    /// A character version of a base node.
    CharacterPov { base_node_id: String },
    /// Listed in a track sequence only; most fields are inferred.
    Track { track_id: String },
}

/// Everything the structure declares (or implies) about a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: String,
    pub title: String,
    pub node_type: NodeType,
    pub chapter: Option<String>,
    pub default_pov: Option<String>,
    pub file_path: Option<String>,
    pub source: DefinitionSource,
}

impl BookStructure {
    /// Look a node up in the structure.
    ///
    /// Search order is critical path, then character POV variants, then
    /// tracks. Variants inherit their chapter from the base node and default
    /// to their own character; track-only nodes get an inferred title and
    /// path.
    pub fn node_definition(&self, node_id: &str) -> Option<NodeDefinition> {
        if let Some(node) = self.critical_path_node(node_id) {
            return Some(NodeDefinition {
                id: node.id.clone(),
                title: node.title.clone(),
                node_type: node.node_type,
                chapter: node.chapter.clone(),
                default_pov: node.default_pov.clone(),
                file_path: node.file_path.clone(),
                source: DefinitionSource::CriticalPath,
            });
        }

        if let Some((base_node_id, variant)) = self.variant_by_node_id(node_id) {
            let base = self.critical_path_node(base_node_id);
            let base_title = base
                .map(|b| b.title.as_str())
                .filter(|t| !t.is_empty())
                .unwrap_or(base_node_id);

            return Some(NodeDefinition {
                id: node_id.to_string(),
                title: format!("{} ({} POV)", base_title, variant.character),
                node_type: NodeType::Fiction,
                chapter: base.and_then(|b| b.chapter.clone()),
                default_pov: Some(variant.character.clone()),
                file_path: variant.file_path.clone(),
                source: DefinitionSource::CharacterPov {
                    base_node_id: base_node_id.to_string(),
                },
            });
        }

        for (track_id, track) in &self.tracks {
            if track.node_sequence.iter().any(|id| id == node_id) {
                let node_type = if track_id == "nonfiction" {
                    NodeType::Nonfiction
                } else {
                    NodeType::Fiction
                };

                return Some(NodeDefinition {
                    id: node_id.to_string(),
                    title: humanize_title(node_id),
                    node_type,
                    chapter: None,
                    default_pov: self.default_pov.clone(),
                    file_path: Some(infer_file_path(node_id, node_type)),
                    source: DefinitionSource::Track {
                        track_id: track_id.clone(),
                    },
                });
            }
        }

        None
    }

    /// Get the title for a node, humanizing the id when undefined.
    pub fn node_title(&self, node_id: &str) -> String {
        self.node_definition(node_id)
            .map(|def| def.title)
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| humanize_title(node_id))
    }

    /// Get the critical-path position of a node, using the base node for POV variants.
    pub fn reading_position(&self, node_id: &str) -> Option<usize> {
        self.critical_path_index(node_id).or_else(|| {
            self.variant_by_node_id(node_id)
                .and_then(|(base, _)| self.critical_path_index(base))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::tests::sample_structure;

    #[test]
    fn test_critical_path_definition() {
        let structure = sample_structure();
        let def = structure.node_definition("ch1-scene1-restaurant").unwrap();

        assert_eq!(def.source, DefinitionSource::CriticalPath);
        assert_eq!(def.default_pov.as_deref(), Some("Zach"));
        assert_eq!(
            def.file_path.as_deref(),
            Some("fiction/ch1-scene1-restaurant.json")
        );
    }

    #[test]
    fn test_pov_variant_definition() {
        let structure = sample_structure();
        let def = structure
            .node_definition("ch1-scene1-restaurant-nicole-pov")
            .unwrap();

        assert_eq!(def.title, "Restaurant Scene (Nicole POV)");
        assert_eq!(def.node_type, NodeType::Fiction);
        assert_eq!(def.chapter.as_deref(), Some("chapter1"));
        assert_eq!(def.default_pov.as_deref(), Some("Nicole"));
        assert!(matches!(
            def.source,
            DefinitionSource::CharacterPov { ref base_node_id } if base_node_id == "ch1-scene1-restaurant"
        ));
    }

    #[test]
    fn test_track_definition_is_inferred() {
        let structure = sample_structure();
        let def = structure.node_definition("nf-ai-governance").unwrap();

        assert_eq!(def.title, "Ai Governance");
        assert_eq!(def.node_type, NodeType::Nonfiction);
        assert_eq!(def.file_path.as_deref(), Some("nonfiction/nf-ai-governance.json"));
        assert_eq!(def.default_pov.as_deref(), Some("Omniscient"));
    }

    #[test]
    fn test_unknown_node_has_no_definition() {
        let structure = sample_structure();
        assert!(structure.node_definition("ch9-lost-scene").is_none());
        assert_eq!(structure.node_title("ch9-lost-scene"), "Lost Scene");
    }

    #[test]
    fn test_reading_position_of_variant() {
        let structure = sample_structure();
        assert_eq!(structure.reading_position("nf-what-is-ai"), Some(1));
        assert_eq!(
            structure.reading_position("ch1-scene1-restaurant-nicole-pov"),
            Some(0)
        );
        assert_eq!(structure.reading_position("nowhere"), None);
    }
}
