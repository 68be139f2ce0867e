//! Typed reader events and commands.
//!
//! Events flow out of the loader to whatever presentation layer is listening;
//! commands flow in to a [`crate::Reader`].

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Something observable happened inside the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReaderEvent {
    #[serde(rename_all = "camelCase")]
    StructureLoaded {
        title: String,
        default_start_node: Option<String>,
        default_pov: String,
    },
    StructureLoadFailed {
        error: String,
    },
    #[serde(rename_all = "camelCase")]
    LoadingStarted {
        node_id: String,
    },
    #[serde(rename_all = "camelCase")]
    LoadingFinished {
        node_id: String,
        simulated: bool,
    },
}

/// Which related non-fiction node to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelatedTarget {
    /// Position in the current node's related list.
    Index(usize),
    /// An explicit node id.
    NodeId(String),
}

/// A request from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReaderCommand {
    #[serde(rename_all = "camelCase")]
    NavigateToNode {
        node_id: String,
        pov: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ChangePov {
        node_id: Option<String>,
        pov: String,
    },
    LoadRelatedNonFiction(RelatedTarget),
    Next,
    Previous,
    FollowBranch {
        index: usize,
    },
}

type Listener = Arc<dyn Fn(&ReaderEvent) + Send + Sync>;

/// Fan-out of reader events to registered listeners.
///
/// Cloning the bus shares the listener list.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<RwLock<Vec<(ListenerId, Listener)>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for every event.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ReaderEvent) + Send + Sync + 'static,
    {
        let id = ListenerId::new();
        self.listeners.write().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Deliver an event to all listeners in registration order.
    pub fn emit(&self, event: &ReaderEvent) {
        // Listeners may subscribe from inside a callback.
        let snapshot: Vec<Listener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
