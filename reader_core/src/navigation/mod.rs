//! Moving through the book: next, previous, branches and related articles.

mod history;

pub use history::*;

use std::sync::Arc;
use tracing::{debug, info, warn};

use book_structure::Node;

use crate::error::{ReaderError, ReaderResult};
use crate::loader::NodeLoader;

impl NodeLoader {
    /// Advance to the next node.
    ///
    /// Follows the current node's own `next` link first, then the critical
    /// path. A POV variant continues from its base node's position.
    pub async fn next(&self) -> ReaderResult<Arc<Node>> {
        let current = self.current().ok_or(ReaderError::NoCurrentNode)?;

        if let Some(next_id) = non_empty(current.node.navigation.next.as_deref()) {
            let pov = current
                .node
                .metadata
                .pov_character
                .clone()
                .unwrap_or_else(|| current.pov.clone());
            info!(node_id = next_id, "Navigating next (local link)");
            return Ok(self.load(next_id, Some(&pov), true).await);
        }

        if let Some(next_id) = self.next_in_reading_order(&current.node_id) {
            info!(node_id = %next_id, "Navigating next (critical path)");
            return Ok(self.load(&next_id, None, true).await);
        }

        warn!(node_id = %current.node_id, "No next node defined");
        Err(ReaderError::NoNextNode {
            node_id: current.node_id,
        })
    }

    /// Go back.
    ///
    /// With more than one history entry this pops the current one and
    /// reloads the entry below it. Otherwise it jumps to the node's own
    /// `previous` link or its critical-path predecessor, recording the jump.
    pub async fn previous(&self) -> ReaderResult<Arc<Node>> {
        let stepped = self.state.lock().history.step_back();
        if let Some(entry) = stepped {
            info!(node_id = %entry.node_id, pov = %entry.pov, "Navigating previous (history)");
            return Ok(self.load(&entry.node_id, Some(&entry.pov), false).await);
        }

        let current = self.current().ok_or(ReaderError::NoCurrentNode)?;

        if let Some(previous_id) = non_empty(current.node.navigation.previous.as_deref()) {
            let pov = current
                .node
                .metadata
                .pov_character
                .clone()
                .unwrap_or_else(|| current.pov.clone());
            info!(node_id = previous_id, "Navigating previous (local link)");
            return Ok(self.load(previous_id, Some(&pov), true).await);
        }

        if let Some(previous_id) = self.previous_in_reading_order(&current.node_id) {
            info!(node_id = %previous_id, "Navigating previous (critical path)");
            return Ok(self.load(&previous_id, None, true).await);
        }

        warn!(node_id = %current.node_id, "No previous node defined");
        Err(ReaderError::NoPreviousNode {
            node_id: current.node_id,
        })
    }

    /// Follow a branch choice of `node`. Returns `None` for an unknown index.
    pub async fn follow_branch(&self, node: &Node, index: usize) -> Option<Arc<Node>> {
        let Some(target) = node.branch_target(index) else {
            warn!(
                node_id = %node.id,
                index,
                branches = node.navigation.branch_points.len(),
                "Invalid branch index"
            );
            return None;
        };

        let pov = node
            .metadata
            .pov_character
            .clone()
            .or_else(|| self.current_pov());
        debug!(node_id = %node.id, branch_target = target, index, "Following branch");
        Some(self.load(target, pov.as_deref(), true).await)
    }

    /// Open the current node's related non-fiction entry at `index`.
    pub async fn load_related_nonfiction(&self, index: usize) -> Option<Arc<Node>> {
        let related = self
            .current_node()
            .and_then(|node| node.navigation.related_non_fiction.get(index).cloned());

        let Some(related_id) = related else {
            warn!(index, "No related non-fiction content at index");
            return None;
        };

        let pov = self.default_pov().to_string();
        Some(self.load(&related_id, Some(&pov), true).await)
    }

    /// The critical-path node after `node_id`'s reading position.
    pub fn next_in_reading_order(&self, node_id: &str) -> Option<String> {
        let structure = self.structure();
        let position = structure.reading_position(node_id)?;
        structure
            .critical_path
            .get(position + 1)
            .map(|node| node.id.clone())
    }

    /// The critical-path node before `node_id`'s reading position.
    pub fn previous_in_reading_order(&self, node_id: &str) -> Option<String> {
        let structure = self.structure();
        let position = structure.reading_position(node_id)?;
        position
            .checked_sub(1)
            .and_then(|i| structure.critical_path.get(i))
            .map(|node| node.id.clone())
    }
}

fn non_empty(id: Option<&str>) -> Option<&str> {
    id.filter(|id| !id.is_empty())
}
