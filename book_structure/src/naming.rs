//! Node id conventions.
//!
//! Node ids follow loose patterns such as `ch1-scene2-alec-bedroom`,
//! `nf-what-is-ai` and `ch1-scene1-restaurant-zach-pov`. When the book
//! structure says nothing about a node, these patterns are all we have to
//! derive a title or a content path from.

use crate::structure::NodeType;

/// Point of view used when neither the node nor the book declares one.
pub const GLOBAL_DEFAULT_POV: &str = "Omniscient";

/// Prefix marking non-fiction node ids.
pub const NONFICTION_PREFIX: &str = "nf-";

/// Turn a node id into a readable title.
///
/// Strips a leading chapter (`ch3-`) or non-fiction (`nf-`) prefix and a
/// trailing `-pov`, then title-cases the hyphen-separated words.
pub fn humanize_title(node_id: &str) -> String {
    let trimmed = strip_known_prefix(node_id);
    let trimmed = trimmed.strip_suffix("-pov").unwrap_or(trimmed);

    trimmed
        .split('-')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_known_prefix(node_id: &str) -> &str {
    if let Some(rest) = node_id.strip_prefix(NONFICTION_PREFIX) {
        return rest;
    }

    if let Some(rest) = node_id.strip_prefix("ch") {
        if let Some((digits, tail)) = rest.split_once('-') {
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return tail;
            }
        }
    }

    node_id
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Guess the node type from the id alone.
pub fn infer_node_type(node_id: &str) -> NodeType {
    if node_id.starts_with(NONFICTION_PREFIX) {
        NodeType::Nonfiction
    } else {
        NodeType::Fiction
    }
}

/// Infer a content path (relative to the content root) for a node.
pub fn infer_file_path(node_id: &str, node_type: NodeType) -> String {
    if node_type == NodeType::Nonfiction || node_id.starts_with(NONFICTION_PREFIX) {
        format!("nonfiction/{}.json", node_id)
    } else if node_id.contains("-pov") {
        format!("fiction/character_povs/{}.json", node_id)
    } else {
        format!("fiction/{}.json", node_id)
    }
}

/// Check whether an id looks like a character POV variant.
pub fn is_pov_node_id(node_id: &str) -> bool {
    node_id.ends_with("-pov") || node_id.contains("-pov-")
}

/// Extract the character name from a POV variant id (`...-alec-pov` -> `Alec`).
pub fn character_from_pov_id(node_id: &str) -> Option<String> {
    let parts: Vec<&str> = node_id.split('-').collect();
    if parts.len() >= 3 && parts[parts.len() - 1] == "pov" {
        let name = parts[parts.len() - 2];
        if !name.is_empty() {
            return Some(capitalize(name));
        }
    }
    None
}

/// Derive the base node id a POV variant id branches from.
pub fn base_node_from_pov_id(node_id: &str) -> Option<String> {
    let parts: Vec<&str> = node_id.split('-').collect();
    if parts.len() >= 4 && parts[parts.len() - 1] == "pov" {
        Some(parts[..parts.len() - 2].join("-"))
    } else {
        None
    }
}

/// Build the conventional POV variant id for a base node and character.
pub fn pov_node_id(base_node_id: &str, character: &str) -> String {
    format!("{}-{}-pov", base_node_id, character.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_title() {
        assert_eq!(humanize_title("ch1-scene2-alec-bedroom"), "Scene2 Alec Bedroom");
        assert_eq!(humanize_title("nf-what-is-ai"), "What Is Ai");
        assert_eq!(humanize_title("ch12-family-talk-zach-pov"), "Family Talk Zach");
        assert_eq!(humanize_title("epilogue"), "Epilogue");
    }

    #[test]
    fn test_humanize_keeps_non_chapter_prefix() {
        // "chapter-" is not a chNN prefix
        assert_eq!(humanize_title("chapter-one"), "Chapter One");
        assert_eq!(humanize_title("ch-one"), "Ch One");
    }

    #[test]
    fn test_infer_file_path() {
        assert_eq!(
            infer_file_path("nf-what-is-ai", NodeType::Fiction),
            "nonfiction/nf-what-is-ai.json"
        );
        assert_eq!(
            infer_file_path("governance", NodeType::Nonfiction),
            "nonfiction/governance.json"
        );
        assert_eq!(
            infer_file_path("ch1-scene1-zach-pov", NodeType::Fiction),
            "fiction/character_povs/ch1-scene1-zach-pov.json"
        );
        assert_eq!(
            infer_file_path("ch1-scene1-restaurant", NodeType::Fiction),
            "fiction/ch1-scene1-restaurant.json"
        );
    }

    #[test]
    fn test_infer_node_type() {
        assert_eq!(infer_node_type("nf-ai-governance"), NodeType::Nonfiction);
        assert_eq!(infer_node_type("ch2-scene1-nicole-work"), NodeType::Fiction);
    }

    #[test]
    fn test_pov_id_helpers() {
        let id = pov_node_id("ch1-scene1-restaurant", "Zach");
        assert_eq!(id, "ch1-scene1-restaurant-zach-pov");
        assert!(is_pov_node_id(&id));
        assert_eq!(character_from_pov_id(&id).as_deref(), Some("Zach"));
        assert_eq!(base_node_from_pov_id(&id).as_deref(), Some("ch1-scene1-restaurant"));
    }

    #[test]
    fn test_non_pov_ids() {
        assert!(!is_pov_node_id("ch1-scene1-restaurant"));
        assert!(character_from_pov_id("ch1-scene1").is_none());
        assert!(base_node_from_pov_id("zach-pov").is_none());
    }
}
