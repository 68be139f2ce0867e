//! Placeholder nodes for content that could not be fetched.

use book_structure::{
    humanize_title, infer_node_type, AlternateVersion, BookStructure, Node, NodeData,
    NodeMetadata, NodeNavigation,
};

const UNKNOWN_CHAPTER: &str = "Unknown Chapter";
const SIMULATED_LOCATION: &str = "Simulated Location";
const UNKNOWN_TIMELINE: &str = "Unknown";

/// Build a stand-in node from whatever the structure knows about `node_id`.
pub fn simulated_node(
    structure: &BookStructure,
    node_id: &str,
    default_pov: &str,
    attempted: &[String],
) -> Node {
    let definition = structure.node_definition(node_id);

    let title = definition
        .as_ref()
        .map(|def| def.title.clone())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| humanize_title(node_id));
    let node_type = definition
        .as_ref()
        .map(|def| def.node_type)
        .unwrap_or_else(|| infer_node_type(node_id));
    let chapter_title = definition
        .as_ref()
        .and_then(|def| def.chapter.as_deref())
        .and_then(|chapter_id| structure.chapter(chapter_id))
        .map(|chapter| chapter.title.clone())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNKNOWN_CHAPTER.to_string());
    let pov = definition
        .as_ref()
        .and_then(|def| def.default_pov.clone())
        .unwrap_or_else(|| default_pov.to_string());

    let attempted = if attempted.is_empty() {
        "N/A".to_string()
    } else {
        attempted
            .iter()
            .map(|path| escape_html(path))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let content = format!(
        "<p><b>Simulated Content</b></p><p>Content for node \"<b>{}</b>\" could not be loaded.</p><p>Path(s) attempted: {}</p>",
        escape_html(node_id),
        attempted
    );

    let alternate_versions = structure
        .pov_variants(node_id)
        .iter()
        .filter(|variant| variant.is_complete())
        .map(|variant| AlternateVersion {
            pov_character: variant.character.clone(),
            node_id: variant.node_id.clone(),
        })
        .collect();

    Node {
        id: node_id.to_string(),
        node_type,
        data: NodeData {
            label: title,
            content,
            chapter_title: Some(chapter_title),
            subtitle: Some(format!("({})", node_type)),
            location: Some(SIMULATED_LOCATION.to_string()),
            timeline: Some(UNKNOWN_TIMELINE.to_string()),
            tags: ["simulated", "error"].iter().map(|t| t.to_string()).collect(),
            branch_points: Vec::new(),
        },
        metadata: NodeMetadata {
            pov_character: Some(pov),
            simulated: true,
        },
        navigation: NodeNavigation {
            previous: structure.previous_in_critical_path(node_id).map(String::from),
            next: structure.next_in_critical_path(node_id).map(String::from),
            branch_points: Vec::new(),
            related_non_fiction: structure.related_nonfiction(node_id).to_vec(),
            alternate_versions,
        },
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use book_structure::{Chapter, NodeDescriptor, NodeType, PovVariant};

    fn structure() -> BookStructure {
        BookStructure::new("Test Book")
            .with_node(NodeDescriptor::new("a", "Alpha").with_chapter("chapter1"))
            .with_node(
                NodeDescriptor::new("b", "Beta")
                    .with_default_pov("Zach")
                    .with_chapter("chapter9"),
            )
            .with_node(NodeDescriptor::new("c", "Gamma"))
            .with_chapter(Chapter {
                id: "chapter1".to_string(),
                title: "Beginnings".to_string(),
                start_node: Some("a".to_string()),
                nodes: vec!["a".to_string()],
                description: None,
            })
            .with_pov_variant("b", PovVariant::new("Nicole", "b-nicole-pov"))
            .with_related("b", ["nf-x"])
    }

    #[test]
    fn test_placeholder_from_definition() {
        let structure = structure();
        let node = simulated_node(&structure, "b", "Omniscient", &["fiction/b.json".to_string()]);

        assert!(node.is_simulated());
        assert_eq!(node.id, "b");
        assert_eq!(node.data.label, "Beta");
        assert_eq!(node.data.chapter_title.as_deref(), Some("Unknown Chapter"));
        assert_eq!(node.data.subtitle.as_deref(), Some("(fiction)"));
        assert_eq!(node.metadata.pov_character.as_deref(), Some("Zach"));
        assert_eq!(node.navigation.previous.as_deref(), Some("a"));
        assert_eq!(node.navigation.next.as_deref(), Some("c"));
        assert_eq!(node.navigation.related_non_fiction, vec!["nf-x"]);
        assert_eq!(node.navigation.alternate_versions.len(), 1);
        assert_eq!(node.navigation.alternate_versions[0].pov_character, "Nicole");
        assert!(node.data.tags.contains("simulated"));
        assert!(node.data.tags.contains("error"));
        assert!(node.data.content.contains("fiction/b.json"));
    }

    #[test]
    fn test_placeholder_chapter_title() {
        let structure = structure();
        let node = simulated_node(&structure, "a", "Omniscient", &[]);

        assert_eq!(node.data.chapter_title.as_deref(), Some("Beginnings"));
        assert!(node.navigation.previous.is_none());
        assert_eq!(node.metadata.pov_character.as_deref(), Some("Omniscient"));
        assert!(node.data.content.contains("Path(s) attempted: N/A"));
    }

    #[test]
    fn test_placeholder_for_unknown_node() {
        let structure = structure();
        let node = simulated_node(&structure, "nf-robot-rights", "Omniscient", &[]);

        assert_eq!(node.data.label, "Robot Rights");
        assert_eq!(node.node_type, NodeType::Nonfiction);
        assert!(node.navigation.previous.is_none());
        assert!(node.navigation.next.is_none());
    }

    #[test]
    fn test_content_is_escaped() {
        let structure = structure();
        let node = simulated_node(&structure, "<script>", "Omniscient", &[]);
        assert!(!node.data.content.contains("<script>"));
        assert!(node.data.content.contains("&lt;script&gt;"));
    }
}
