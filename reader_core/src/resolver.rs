//! Node resolution.
//!
//! Turns a requested node id and optional POV into the node that should
//! actually be shown and the content paths worth trying for it.
//!
//! # Resolution Order
//!
//! ```text
//! 1. POV given and a matching character variant exists -> the variant
//! 2. POV given, no matching variant                     -> the base node
//! 3. No POV                                             -> the node itself
//! ```
//!
//! The effective POV is the requested one in case 1, otherwise the node's
//! declared default POV, otherwise the book-wide default.
//!
//! Candidate paths are tried in this order, without duplicates:
//! explicit path from the caller, path from the structure, inferred path.

use serde::{Deserialize, Serialize};
use tracing::debug;

use book_structure::{infer_file_path, infer_node_type, BookStructure, NodeDefinition};

/// The outcome of resolving a node request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub requested_node_id: String,
    pub target_node_id: String,
    pub effective_pov: String,
    /// Path declared for the target, if any.
    pub file_path: Option<String>,
    /// Paths to fetch, most specific first. Never empty.
    pub candidate_paths: Vec<String>,
    /// What the structure knows about the target.
    pub definition: Option<NodeDefinition>,
}

impl Resolution {
    /// Check whether a character variant replaced the requested node.
    pub fn is_variant(&self) -> bool {
        self.requested_node_id != self.target_node_id
    }
}

/// Resolves node requests against a book structure. Never fails.
#[derive(Debug, Clone, Copy)]
pub struct NodeResolver<'a> {
    structure: &'a BookStructure,
    default_pov: &'a str,
}

impl<'a> NodeResolver<'a> {
    pub fn new(structure: &'a BookStructure, default_pov: &'a str) -> Self {
        Self {
            structure,
            default_pov,
        }
    }

    pub fn resolve(&self, node_id: &str, pov: Option<&str>) -> Resolution {
        self.resolve_with_path(node_id, pov, None)
    }

    /// Resolve a request, preferring an explicit content path.
    pub fn resolve_with_path(
        &self,
        node_id: &str,
        pov: Option<&str>,
        explicit_path: Option<&str>,
    ) -> Resolution {
        let variant = pov.and_then(|pov| self.structure.pov_variant(node_id, pov));

        let (target_node_id, effective_pov) = match (variant, pov) {
            (Some(variant), Some(pov)) => (variant.node_id.clone(), pov.to_string()),
            _ => (node_id.to_string(), self.declared_pov(node_id)),
        };

        let definition = self.structure.node_definition(&target_node_id);
        let file_path = variant
            .and_then(|v| v.file_path.clone())
            .or_else(|| definition.as_ref().and_then(|def| def.file_path.clone()));

        let candidate_paths = self.candidate_paths(
            &target_node_id,
            explicit_path,
            file_path.as_deref(),
            definition.as_ref(),
        );

        debug!(
            requested = node_id,
            target = %target_node_id,
            pov = %effective_pov,
            candidates = candidate_paths.len(),
            "Resolved node"
        );

        Resolution {
            requested_node_id: node_id.to_string(),
            target_node_id,
            effective_pov,
            file_path,
            candidate_paths,
            definition,
        }
    }

    /// The POV a node is read in when none is requested.
    pub fn declared_pov(&self, node_id: &str) -> String {
        self.structure
            .node_definition(node_id)
            .and_then(|def| def.default_pov)
            .unwrap_or_else(|| self.default_pov.to_string())
    }

    fn candidate_paths(
        &self,
        node_id: &str,
        explicit_path: Option<&str>,
        declared_path: Option<&str>,
        definition: Option<&NodeDefinition>,
    ) -> Vec<String> {
        let node_type = definition
            .map(|def| def.node_type)
            .unwrap_or_else(|| infer_node_type(node_id));
        let inferred = infer_file_path(node_id, node_type);

        let mut paths: Vec<String> = Vec::new();
        for path in [explicit_path, declared_path, Some(inferred.as_str())]
            .into_iter()
            .flatten()
        {
            if !path.is_empty() && !paths.iter().any(|p| p == path) {
                paths.push(path.to_string());
            }
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use book_structure::{NodeDescriptor, NodeType, PovVariant};

    fn structure() -> BookStructure {
        BookStructure::new("Test Book")
            .with_start_node("ch1-scene1-restaurant")
            .with_node(
                NodeDescriptor::new("ch1-scene1-restaurant", "Restaurant Scene")
                    .with_default_pov("Zach")
                    .with_chapter("chapter1")
                    .with_file_path("fiction/restaurant.json"),
            )
            .with_node(
                NodeDescriptor::new("nf-what-is-ai", "What is AI?")
                    .with_type(NodeType::Nonfiction),
            )
            .with_node(NodeDescriptor::new("ch1-scene2-park", "The Park"))
            .with_pov_variant(
                "ch1-scene1-restaurant",
                PovVariant::new("Nicole", "ch1-scene1-restaurant-nicole-pov")
                    .with_file_path("fiction/character_povs/restaurant-nicole.json"),
            )
    }

    #[test]
    fn test_critical_path_nodes_resolve_to_declared_path() {
        let structure = structure();
        let resolver = NodeResolver::new(&structure, "Omniscient");

        for descriptor in &structure.critical_path {
            let resolution = resolver.resolve(&descriptor.id, None);
            assert_eq!(resolution.target_node_id, descriptor.id);
            if let Some(path) = &descriptor.file_path {
                assert_eq!(resolution.file_path.as_ref(), Some(path));
                assert_eq!(&resolution.candidate_paths[0], path);
            }
            let expected_pov = descriptor.default_pov.as_deref().unwrap_or("Omniscient");
            assert_eq!(resolution.effective_pov, expected_pov);
        }
    }

    #[test]
    fn test_matching_variant_replaces_base() {
        let structure = structure();
        let resolver = NodeResolver::new(&structure, "Omniscient");

        let resolution = resolver.resolve("ch1-scene1-restaurant", Some("Nicole"));
        assert!(resolution.is_variant());
        assert_eq!(resolution.target_node_id, "ch1-scene1-restaurant-nicole-pov");
        assert_eq!(resolution.effective_pov, "Nicole");
        assert_eq!(
            resolution.candidate_paths,
            vec![
                "fiction/character_povs/restaurant-nicole.json",
                "fiction/character_povs/ch1-scene1-restaurant-nicole-pov.json",
            ]
        );
    }

    #[test]
    fn test_unmatched_pov_falls_back_to_base() {
        let structure = structure();
        let resolver = NodeResolver::new(&structure, "Omniscient");

        let resolution = resolver.resolve("ch1-scene1-restaurant", Some("Alec"));
        assert!(!resolution.is_variant());
        assert_eq!(resolution.target_node_id, "ch1-scene1-restaurant");
        assert_eq!(resolution.effective_pov, "Zach");

        let resolution = resolver.resolve("ch1-scene2-park", Some("Alec"));
        assert_eq!(resolution.effective_pov, "Omniscient");
    }

    #[test]
    fn test_candidate_order_and_dedup() {
        let structure = structure();
        let resolver = NodeResolver::new(&structure, "Omniscient");

        let resolution = resolver.resolve_with_path(
            "ch1-scene1-restaurant",
            None,
            Some("fiction/restaurant.json"),
        );
        assert_eq!(
            resolution.candidate_paths,
            vec!["fiction/restaurant.json", "fiction/ch1-scene1-restaurant.json"]
        );

        let resolution =
            resolver.resolve_with_path("ch1-scene2-park", None, Some("custom/park.json"));
        assert_eq!(
            resolution.candidate_paths,
            vec!["custom/park.json", "fiction/ch1-scene2-park.json"]
        );
    }

    #[test]
    fn test_unknown_node_gets_inferred_path() {
        let structure = structure();
        let resolver = NodeResolver::new(&structure, "Omniscient");

        let resolution = resolver.resolve("nf-ai-ethics", None);
        assert!(resolution.definition.is_none());
        assert!(resolution.file_path.is_none());
        assert_eq!(resolution.candidate_paths, vec!["nonfiction/nf-ai-ethics.json"]);
        assert_eq!(resolution.effective_pov, "Omniscient");

        let resolution = resolver.resolve("ch3-scene1-alec-pov", None);
        assert_eq!(
            resolution.candidate_paths,
            vec!["fiction/character_povs/ch3-scene1-alec-pov.json"]
        );
    }

    #[test]
    fn test_nonfiction_definition_infers_nonfiction_path() {
        let structure = structure();
        let resolver = NodeResolver::new(&structure, "Omniscient");

        let resolution = resolver.resolve("nf-what-is-ai", None);
        assert_eq!(resolution.candidate_paths, vec!["nonfiction/nf-what-is-ai.json"]);
    }

    #[test]
    fn test_variant_id_requested_directly() {
        let structure = structure();
        let resolver = NodeResolver::new(&structure, "Omniscient");

        let resolution = resolver.resolve("ch1-scene1-restaurant-nicole-pov", None);
        assert_eq!(resolution.effective_pov, "Nicole");
        assert_eq!(
            resolution.file_path.as_deref(),
            Some("fiction/character_povs/restaurant-nicole.json")
        );
    }
}
