//! A reading session.
//!
//! [`Reader`] is the entry point for a presentation layer: it opens the book
//! at its start node and turns [`ReaderCommand`]s into loader calls.

use std::sync::Arc;
use tracing::{info, warn};

use book_structure::Node;

use crate::config::ReaderConfig;
use crate::error::{ReaderError, ReaderResult};
use crate::events::{EventBus, ReaderCommand, RelatedTarget};
use crate::loader::NodeLoader;
use crate::source::source_from_config;

/// One reader working through one book.
#[derive(Debug, Clone)]
pub struct Reader {
    loader: Arc<NodeLoader>,
}

impl Reader {
    pub fn new(loader: Arc<NodeLoader>) -> Self {
        Self { loader }
    }

    /// Build the content source for `config`, load the structure and start a session.
    pub async fn from_config(config: &ReaderConfig, events: EventBus) -> ReaderResult<Self> {
        let source = source_from_config(config)?;
        let loader = NodeLoader::bootstrap(source, config, events).await;
        Ok(Self::new(Arc::new(loader)))
    }

    pub fn loader(&self) -> &Arc<NodeLoader> {
        &self.loader
    }

    /// Effective POV of the last completed load.
    pub fn current_pov(&self) -> Option<String> {
        self.loader.current_pov()
    }

    pub fn current_node(&self) -> Option<Arc<Node>> {
        self.loader.current_node()
    }

    /// Load the book's start node, or the first critical-path node.
    pub async fn open(&self) -> ReaderResult<Arc<Node>> {
        let structure = self.loader.structure();
        let start = structure
            .default_start_node
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| structure.critical_path.first().map(|node| node.id.clone()))
            .ok_or(ReaderError::NoStartNode)?;

        info!(node_id = %start, "Opening book");
        Ok(self.loader.load(&start, None, true).await)
    }

    /// Apply a command. Returns the node that was loaded, if any.
    pub async fn dispatch(&self, command: ReaderCommand) -> ReaderResult<Option<Arc<Node>>> {
        match command {
            ReaderCommand::NavigateToNode { node_id, pov } => {
                let pov = pov.or_else(|| self.current_pov());
                Ok(Some(self.loader.load(&node_id, pov.as_deref(), true).await))
            }
            ReaderCommand::ChangePov { node_id, pov } => {
                let node_id = match node_id {
                    Some(node_id) => node_id,
                    None => self
                        .loader
                        .current()
                        .map(|current| current.node_id)
                        .ok_or(ReaderError::NoCurrentNode)?,
                };
                // Variants are looked up from their base node.
                let base_id = self
                    .loader
                    .structure()
                    .variant_by_node_id(&node_id)
                    .map(|(base, _)| base.to_string())
                    .unwrap_or(node_id);

                Ok(Some(self.loader.load(&base_id, Some(&pov), true).await))
            }
            ReaderCommand::LoadRelatedNonFiction(target) => {
                let related_id = match target {
                    RelatedTarget::NodeId(node_id) => Some(node_id),
                    RelatedTarget::Index(index) => self.current_node().and_then(|node| {
                        node.navigation.related_non_fiction.get(index).cloned()
                    }),
                };

                let Some(related_id) = related_id else {
                    warn!("Could not find related non-fiction content");
                    return Ok(None);
                };

                let pov = self.current_pov();
                Ok(Some(self.loader.load(&related_id, pov.as_deref(), true).await))
            }
            ReaderCommand::Next => self.loader.next().await.map(Some),
            ReaderCommand::Previous => self.loader.previous().await.map(Some),
            ReaderCommand::FollowBranch { index } => {
                let node = self.current_node().ok_or(ReaderError::NoCurrentNode)?;
                Ok(self.loader.follow_branch(&node, index).await)
            }
        }
    }
}
