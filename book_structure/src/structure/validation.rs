//! Structural checks over a loaded book.
//!
//! Nothing here is fatal: a reader still opens a book with issues, but the
//! issues explain why some nodes will come back as placeholders.

use std::collections::HashSet;
use thiserror::Error;

use super::BookStructure;

/// A problem found in a book structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("missing top-level property: title")]
    MissingTitle,

    #[error("missing top-level property: defaultStartNode")]
    MissingStartNode,

    #[error("missing top-level property: defaultPOV")]
    MissingDefaultPov,

    #[error("node in criticalPath at index {index} is missing id")]
    MissingNodeId { index: usize },

    #[error("duplicate node id in criticalPath: {0}")]
    DuplicateNodeId(String),

    #[error("node {0} in criticalPath is missing filePath")]
    MissingFilePath(String),

    #[error("default start node {0} is not on the critical path")]
    StartNodeNotInCriticalPath(String),

    #[error("node {node_id} references unknown chapter {chapter}")]
    UnknownChapter { node_id: String, chapter: String },

    #[error("chapter {chapter} lists undefined node {node_id}")]
    DanglingChapterNode { chapter: String, node_id: String },

    #[error("related content of {node_id} points at undefined node {target}")]
    DanglingRelatedContent { node_id: String, target: String },

    #[error("character POV {index} of {base_node_id} is missing character or nodeId")]
    IncompletePovVariant { base_node_id: String, index: usize },

    #[error("character POVs reference undefined base node {0}")]
    UnknownPovBaseNode(String),

    #[error("track {track_id} starts at {node_id}, which is not in its node sequence")]
    TrackStartNotInSequence { track_id: String, node_id: String },
}

impl ValidationIssue {
    /// Errors break the structure's contract; everything else degrades to placeholders.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            ValidationIssue::MissingTitle
                | ValidationIssue::MissingStartNode
                | ValidationIssue::MissingDefaultPov
                | ValidationIssue::MissingNodeId { .. }
                | ValidationIssue::DuplicateNodeId(_)
                | ValidationIssue::MissingFilePath(_)
        )
    }
}

/// Result of validating a structure.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Check if no error-level issues were found.
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(ValidationIssue::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| !issue.is_error())
    }
}

impl BookStructure {
    /// Validate the structure's format and cross references.
    pub fn validate(&self) -> ValidationReport {
        let mut issues = Vec::new();

        if self.title.trim().is_empty() {
            issues.push(ValidationIssue::MissingTitle);
        }
        if self.default_start_node.is_none() {
            issues.push(ValidationIssue::MissingStartNode);
        }
        if self.default_pov.is_none() {
            issues.push(ValidationIssue::MissingDefaultPov);
        }

        let mut seen = HashSet::new();
        for (index, node) in self.critical_path.iter().enumerate() {
            if node.id.is_empty() {
                issues.push(ValidationIssue::MissingNodeId { index });
                continue;
            }
            if !seen.insert(node.id.as_str()) {
                issues.push(ValidationIssue::DuplicateNodeId(node.id.clone()));
            }
            if node.file_path.is_none() {
                issues.push(ValidationIssue::MissingFilePath(node.id.clone()));
            }
            if let Some(chapter) = &node.chapter {
                if !self.chapters.is_empty() && self.chapter(chapter).is_none() {
                    issues.push(ValidationIssue::UnknownChapter {
                        node_id: node.id.clone(),
                        chapter: chapter.clone(),
                    });
                }
            }
        }

        if let Some(start) = &self.default_start_node {
            if !self.critical_path.is_empty() && self.critical_path_index(start).is_none() {
                issues.push(ValidationIssue::StartNodeNotInCriticalPath(start.clone()));
            }
        }

        for chapter in &self.chapters {
            for node_id in &chapter.nodes {
                if self.node_definition(node_id).is_none() {
                    issues.push(ValidationIssue::DanglingChapterNode {
                        chapter: chapter.id.clone(),
                        node_id: node_id.clone(),
                    });
                }
            }
        }

        for (node_id, targets) in &self.related_content {
            for target in targets {
                if self.node_definition(target).is_none() {
                    issues.push(ValidationIssue::DanglingRelatedContent {
                        node_id: node_id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        for (base_node_id, variants) in &self.character_povs {
            if self.critical_path_node(base_node_id).is_none() {
                issues.push(ValidationIssue::UnknownPovBaseNode(base_node_id.clone()));
            }
            for (index, variant) in variants.iter().enumerate() {
                if !variant.is_complete() {
                    issues.push(ValidationIssue::IncompletePovVariant {
                        base_node_id: base_node_id.clone(),
                        index,
                    });
                }
            }
        }

        for (track_id, track) in &self.tracks {
            if let Some(start) = &track.start_node {
                if !track.node_sequence.contains(start) {
                    issues.push(ValidationIssue::TrackStartNotInSequence {
                        track_id: track_id.clone(),
                        node_id: start.clone(),
                    });
                }
            }
        }

        ValidationReport { issues }
    }
}
