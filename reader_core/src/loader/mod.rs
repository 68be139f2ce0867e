//! Node loading and caching.
//!
//! The [`NodeLoader`] owns the content cache, the current node and the
//! reading history. It is shared as `Arc<NodeLoader>`; all state sits behind
//! one mutex that is never held across a fetch.
//!
//! # Load Sequence
//!
//! ```text
//! LoadingStarted -> resolve -> cache hit? ----------------------> LoadingFinished
//!                                  \-> fetch candidates -> parse -/
//!                                           \-> all failed -> placeholder
//! ```
//!
//! # Stale Loads
//!
//! Every load takes a generation number. When a load finishes after a newer
//! one has started, its node is still cached and returned to the caller, but
//! the current node and the history are left alone.

mod placeholder;

pub use placeholder::*;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use book_structure::{BookStructure, Node};

use crate::config::ReaderConfig;
use crate::error::{FetchError, ReaderError};
use crate::events::{EventBus, ListenerId, ReaderEvent};
use crate::navigation::{HistoryEntry, NavigationHistory};
use crate::resolver::{NodeResolver, Resolution};
use crate::source::ContentSource;

/// The node the reader is looking at.
#[derive(Debug, Clone)]
pub struct CurrentNode {
    pub node: Arc<Node>,
    /// Resolved id; differs from the requested id for POV variants.
    pub node_id: String,
    pub pov: String,
}

#[derive(Debug, Default)]
pub(crate) struct LoaderState {
    cache: HashMap<String, Arc<Node>>,
    current: Option<CurrentNode>,
    pub(crate) history: NavigationHistory,
    generation: u64,
}

/// Fetches, caches and tracks nodes of one book.
pub struct NodeLoader {
    source: Arc<dyn ContentSource>,
    structure: Arc<BookStructure>,
    default_pov: String,
    events: EventBus,
    pub(crate) state: Mutex<LoaderState>,
}

impl NodeLoader {
    /// Create a loader over an already loaded structure.
    ///
    /// The book-wide default POV comes from the structure, falling back to
    /// the configured one.
    pub fn new(
        structure: BookStructure,
        source: Arc<dyn ContentSource>,
        config: &ReaderConfig,
        events: EventBus,
    ) -> Self {
        let default_pov = structure
            .default_pov
            .clone()
            .filter(|pov| !pov.is_empty())
            .unwrap_or_else(|| config.default_pov.clone());

        Self {
            source,
            structure: Arc::new(structure),
            default_pov,
            events,
            state: Mutex::new(LoaderState::default()),
        }
    }

    /// Create a loader with default configuration and a private event bus.
    pub fn with_structure(structure: BookStructure, source: Arc<dyn ContentSource>) -> Self {
        Self::new(structure, source, &ReaderConfig::default(), EventBus::new())
    }

    /// Fetch the book structure through `source` and build a loader on it.
    ///
    /// A missing or malformed structure is not fatal: the loader starts with
    /// an empty structure and `StructureLoadFailed` is emitted.
    pub async fn bootstrap(
        source: Arc<dyn ContentSource>,
        config: &ReaderConfig,
        events: EventBus,
    ) -> Self {
        info!(
            source = %source.describe(),
            path = %config.structure_path,
            "Loading book structure"
        );

        let structure = match source.fetch(&config.structure_path).await {
            Ok(text) => BookStructure::from_json(&text).map_err(ReaderError::from),
            Err(e) => Err(ReaderError::from(e)),
        };

        match structure {
            Ok(structure) => {
                let report = structure.validate();
                for issue in &report.issues {
                    warn!(%issue, "Book structure problem");
                }

                let loader = Self::new(structure, source, config, events);
                info!(
                    title = %loader.structure.title,
                    nodes = loader.structure.critical_path.len(),
                    "Book structure loaded"
                );
                loader.events.emit(&ReaderEvent::StructureLoaded {
                    title: loader.structure.title.clone(),
                    default_start_node: loader.structure.default_start_node.clone(),
                    default_pov: loader.default_pov.clone(),
                });
                loader
            }
            Err(e) => {
                warn!(error = %e, "Failed to load book structure, using an empty one");
                let loader = Self::new(BookStructure::empty(), source, config, events);
                loader.events.emit(&ReaderEvent::StructureLoadFailed {
                    error: e.to_string(),
                });
                loader
            }
        }
    }

    /// Load a node, falling back to a placeholder when no content is found.
    pub async fn load(&self, node_id: &str, pov: Option<&str>, add_to_history: bool) -> Arc<Node> {
        self.load_with_path(node_id, pov, None, add_to_history).await
    }

    /// Load a node, trying `file_path` before any path the structure implies.
    pub async fn load_with_path(
        &self,
        node_id: &str,
        pov: Option<&str>,
        file_path: Option<&str>,
        add_to_history: bool,
    ) -> Arc<Node> {
        self.events.emit(&ReaderEvent::LoadingStarted {
            node_id: node_id.to_string(),
        });

        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.generation
        };

        let resolution = self.resolver().resolve_with_path(node_id, pov, file_path);

        let cached = self.cached(&resolution.target_node_id);
        let node = match cached {
            Some(node) => {
                debug!(node_id = %resolution.target_node_id, "Using cached node");
                node
            }
            None => {
                let node = self.fetch_node(&resolution).await;
                self.state
                    .lock()
                    .cache
                    .insert(resolution.target_node_id.clone(), Arc::clone(&node));
                node
            }
        };

        self.finish_load(generation, &resolution, &node, add_to_history);

        self.events.emit(&ReaderEvent::LoadingFinished {
            node_id: resolution.target_node_id.clone(),
            simulated: node.is_simulated(),
        });

        node
    }

    async fn fetch_node(&self, resolution: &Resolution) -> Arc<Node> {
        let mut attempted = Vec::with_capacity(resolution.candidate_paths.len());

        for path in &resolution.candidate_paths {
            attempted.push(path.clone());
            debug!(node_id = %resolution.target_node_id, path = %path, "Trying content path");

            match self.source.fetch(path).await {
                Ok(text) => match Node::from_json(&text) {
                    Ok(node) => {
                        info!(node_id = %resolution.target_node_id, path = %path, "Loaded node");
                        return Arc::new(node);
                    }
                    Err(e) => warn!(path = %path, error = %e, "Content file is not a valid node"),
                },
                Err(FetchError::NotFound { .. }) => {
                    debug!(path = %path, "No content at path");
                }
                Err(e) => warn!(path = %path, error = %e, "Failed to fetch content"),
            }
        }

        warn!(
            node_id = %resolution.target_node_id,
            attempted = %attempted.join(", "),
            "Creating simulated node"
        );
        Arc::new(simulated_node(
            &self.structure,
            &resolution.target_node_id,
            &self.default_pov,
            &attempted,
        ))
    }

    fn finish_load(
        &self,
        generation: u64,
        resolution: &Resolution,
        node: &Arc<Node>,
        add_to_history: bool,
    ) {
        let mut state = self.state.lock();
        if state.generation != generation {
            debug!(
                node_id = %resolution.target_node_id,
                "Newer load in progress, leaving current node unchanged"
            );
            return;
        }

        if add_to_history
            && state
                .history
                .record(&resolution.target_node_id, &resolution.effective_pov)
        {
            debug!(length = state.history.len(), "History updated");
        }

        state.current = Some(CurrentNode {
            node: Arc::clone(node),
            node_id: resolution.target_node_id.clone(),
            pov: resolution.effective_pov.clone(),
        });
    }

    pub fn resolver(&self) -> NodeResolver<'_> {
        NodeResolver::new(&self.structure, &self.default_pov)
    }

    /// Resolve a request without loading anything.
    pub fn resolve(&self, node_id: &str, pov: Option<&str>) -> Resolution {
        self.resolver().resolve(node_id, pov)
    }

    pub fn cached(&self, node_id: &str) -> Option<Arc<Node>> {
        self.state.lock().cache.get(node_id).cloned()
    }

    pub fn cache_len(&self) -> usize {
        self.state.lock().cache.len()
    }

    pub fn clear_cache(&self) {
        self.state.lock().cache.clear();
        debug!("Node cache cleared");
    }

    pub fn current(&self) -> Option<CurrentNode> {
        self.state.lock().current.clone()
    }

    pub fn current_node(&self) -> Option<Arc<Node>> {
        self.state
            .lock()
            .current
            .as_ref()
            .map(|current| Arc::clone(&current.node))
    }

    /// Effective POV of the current node.
    pub fn current_pov(&self) -> Option<String> {
        self.state
            .lock()
            .current
            .as_ref()
            .map(|current| current.pov.clone())
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.lock().history.entries().to_vec()
    }

    pub fn structure(&self) -> &BookStructure {
        &self.structure
    }

    pub fn default_pov(&self) -> &str {
        &self.default_pov
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Register callbacks for the start and end of every load.
    pub fn on_loading<S, E>(&self, on_start: S, on_end: E) -> ListenerId
    where
        S: Fn(&str) + Send + Sync + 'static,
        E: Fn(&str) + Send + Sync + 'static,
    {
        self.events.subscribe(move |event| match event {
            ReaderEvent::LoadingStarted { node_id } => on_start(node_id),
            ReaderEvent::LoadingFinished { node_id, .. } => on_end(node_id),
            _ => {}
        })
    }
}

impl std::fmt::Debug for NodeLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeLoader")
            .field("source", &self.source.describe())
            .field("title", &self.structure.title)
            .field("default_pov", &self.default_pov)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use async_trait::async_trait;
    use book_structure::{NodeDescriptor, NodeType};
    use tokio::sync::Notify;

    const NODE_A: &str = r#"{"id": "a", "type": "fiction", "data": {"label": "Alpha", "content": "<p>A</p>"}}"#;
    const NODE_B: &str = r#"{"id": "b", "type": "fiction", "data": {"label": "Beta", "content": "<p>B</p>"}}"#;

    fn structure() -> BookStructure {
        BookStructure::new("Test Book")
            .with_start_node("a")
            .with_default_pov("Omniscient")
            .with_node(NodeDescriptor::new("a", "Alpha").with_file_path("fiction/a.json"))
            .with_node(NodeDescriptor::new("b", "Beta").with_default_pov("Zach"))
            .with_node(NodeDescriptor::new("nf-c", "Gamma").with_type(NodeType::Nonfiction))
    }

    fn loader(source: MemorySource) -> (NodeLoader, Arc<MemorySource>) {
        let source = Arc::new(source);
        let loader = NodeLoader::with_structure(structure(), source.clone());
        (loader, source)
    }

    #[tokio::test]
    async fn test_load_is_cached() {
        let (loader, source) = loader(MemorySource::new().with_document("fiction/a.json", NODE_A));

        let first = loader.load("a", None, true).await;
        let second = loader.load("a", None, true).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(first.data.label, "Alpha");
        assert_eq!(loader.history().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_content_gives_cached_placeholder() {
        let (loader, source) = loader(MemorySource::new());

        let node = loader.load("b", None, true).await;
        assert!(node.is_simulated());
        assert_eq!(node.navigation.previous.as_deref(), Some("a"));
        assert_eq!(node.navigation.next.as_deref(), Some("nf-c"));
        assert_eq!(node.metadata.pov_character.as_deref(), Some("Zach"));
        assert_eq!(source.requests(), vec!["fiction/b.json"]);

        let again = loader.load("b", None, true).await;
        assert!(Arc::ptr_eq(&node, &again));
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_candidate_is_skipped() {
        let (loader, source) = loader(
            MemorySource::new()
                .with_document("custom/a.json", "not json")
                .with_document("fiction/a.json", NODE_A),
        );

        let node = loader
            .load_with_path("a", None, Some("custom/a.json"), true)
            .await;
        assert!(!node.is_simulated());
        assert_eq!(source.requests(), vec!["custom/a.json", "fiction/a.json"]);
    }

    #[tokio::test]
    async fn test_failed_status_moves_to_next_candidate() {
        let (loader, source) = loader(
            MemorySource::new()
                .with_failure("custom/a.json", 500)
                .with_document("fiction/a.json", NODE_A),
        );

        let node = loader
            .load_with_path("a", None, Some("custom/a.json"), true)
            .await;
        assert!(!node.is_simulated());
        assert_eq!(node.data.label, "Alpha");
        assert_eq!(source.requests(), vec!["custom/a.json", "fiction/a.json"]);
    }

    #[tokio::test]
    async fn test_all_candidates_failing_gives_placeholder() {
        let (loader, source) = loader(
            MemorySource::new()
                .with_failure("custom/a.json", 503)
                .with_failure("fiction/a.json", 500),
        );

        let node = loader
            .load_with_path("a", None, Some("custom/a.json"), true)
            .await;
        assert!(node.is_simulated());
        assert!(node.data.content.contains("custom/a.json, fiction/a.json"));
        assert_eq!(source.requests(), vec!["custom/a.json", "fiction/a.json"]);
        assert!(Arc::ptr_eq(&node, &loader.cached("a").unwrap()));
    }

    #[tokio::test]
    async fn test_editor_written_node_keeps_its_kind() {
        let (loader, _) = loader(MemorySource::new().with_document(
            "nonfiction/nf-c.json",
            r#"{"id": "nf-c", "nodeId": "nf-c", "nodeType": "nonfiction",
                "data": {"label": "Gamma", "content": "<p>Content for Gamma</p>"},
                "metadata": {"author": "Author", "povCharacter": "Omniscient"}}"#,
        ));

        let node = loader.load("nf-c", None, true).await;
        assert!(!node.is_simulated());
        assert_eq!(node.node_type, NodeType::Nonfiction);
    }

    #[tokio::test]
    async fn test_current_node_and_pov() {
        let (loader, _) = loader(
            MemorySource::new()
                .with_document("fiction/a.json", NODE_A)
                .with_document("fiction/b.json", NODE_B),
        );
        assert!(loader.current().is_none());

        loader.load("b", None, true).await;
        assert_eq!(loader.current_pov().as_deref(), Some("Zach"));
        assert_eq!(loader.current().unwrap().node_id, "b");

        loader.load("a", None, false).await;
        assert_eq!(loader.current_pov().as_deref(), Some("Omniscient"));
        assert_eq!(loader.history().len(), 1);
    }

    #[tokio::test]
    async fn test_loading_events_wrap_each_load() {
        let (loader, _) = loader(MemorySource::new().with_document("fiction/a.json", NODE_A));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let start = Arc::clone(&seen);
        let end = Arc::clone(&seen);
        loader.on_loading(
            move |id| start.lock().push(format!("start:{id}")),
            move |id| end.lock().push(format!("end:{id}")),
        );

        loader.load("a", None, true).await;
        loader.load("a", None, true).await;
        loader.load("nf-missing", None, true).await;

        assert_eq!(
            *seen.lock(),
            vec![
                "start:a",
                "end:a",
                "start:a",
                "end:a",
                "start:nf-missing",
                "end:nf-missing"
            ]
        );
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let (loader, source) = loader(MemorySource::new().with_document("fiction/a.json", NODE_A));

        loader.load("a", None, true).await;
        assert_eq!(loader.cache_len(), 1);
        loader.clear_cache();
        assert!(loader.cached("a").is_none());

        loader.load("a", None, true).await;
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_bootstrap_success() {
        let document = r#"{
            "title": "Life in 2045",
            "defaultStartNode": "a",
            "defaultPOV": "Nicole",
            "criticalPath": [{"id": "a", "title": "Alpha", "filePath": "fiction/a.json"}]
        }"#;
        let source = Arc::new(MemorySource::new().with_document("book-structure.json", document));
        let events = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        events.subscribe(move |event| sink.lock().push(event.clone()));

        let loader = NodeLoader::bootstrap(source, &ReaderConfig::default(), events).await;

        assert_eq!(loader.structure().title, "Life in 2045");
        assert_eq!(loader.default_pov(), "Nicole");
        assert_eq!(
            *seen.lock(),
            vec![ReaderEvent::StructureLoaded {
                title: "Life in 2045".to_string(),
                default_start_node: Some("a".to_string()),
                default_pov: "Nicole".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_bootstrap_failure_uses_empty_structure() {
        let source = Arc::new(MemorySource::new().with_document("book-structure.json", "{oops"));
        let events = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        events.subscribe(move |event| sink.lock().push(event.clone()));

        let loader = NodeLoader::bootstrap(source, &ReaderConfig::default(), events).await;

        assert!(loader.structure().is_empty());
        assert_eq!(loader.default_pov(), "Omniscient");
        assert!(matches!(
            seen.lock().as_slice(),
            [ReaderEvent::StructureLoadFailed { .. }]
        ));

        let node = loader.load("ch1-anything", None, true).await;
        assert!(node.is_simulated());
    }

    struct GatedSource {
        inner: MemorySource,
        gated_path: &'static str,
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl ContentSource for GatedSource {
        async fn fetch(&self, path: &str) -> Result<String, FetchError> {
            if path == self.gated_path {
                self.gate.notified().await;
            }
            self.inner.fetch(path).await
        }

        fn describe(&self) -> String {
            "gated".to_string()
        }
    }

    #[tokio::test]
    async fn test_stale_load_does_not_move_current() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(GatedSource {
            inner: MemorySource::new()
                .with_document("fiction/a.json", NODE_A)
                .with_document("fiction/b.json", NODE_B),
            gated_path: "fiction/a.json",
            gate: Arc::clone(&gate),
        });
        let loader = Arc::new(NodeLoader::with_structure(structure(), source));

        let slow = {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load("a", None, true).await })
        };
        tokio::task::yield_now().await;

        loader.load("b", None, true).await;
        gate.notify_one();
        let stale = slow.await.unwrap();

        assert_eq!(stale.data.label, "Alpha");
        assert!(loader.cached("a").is_some());
        assert_eq!(loader.current().unwrap().node_id, "b");
        let history: Vec<String> = loader.history().into_iter().map(|e| e.node_id).collect();
        assert_eq!(history, vec!["b"]);
    }
}
