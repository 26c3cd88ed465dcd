//! Listener Registry - Event handlers keyed by node and event type
//!
//! Handlers are stored as `Rc` so dispatch can snapshot the handlers of a node
//! and release the registry before running them. A handler is therefore free
//! to add or remove listeners, or to mutate the document, while it runs.

use std::collections::HashMap;
use std::rc::Rc;

use indextree::NodeId;

use super::Document;
use super::event::{Event, EventKind};

/// Event handler. Receives the document it was registered on.
pub type Handler = Rc<dyn Fn(&Document, &mut Event)>;

/// Identifies a registered listener for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

struct Entry {
    id: ListenerId,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    by_node: HashMap<NodeId, Vec<Entry>>,
    owner: HashMap<ListenerId, NodeId>,
    next_id: usize,
}

impl ListenerRegistry {
    fn next_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn add(&mut self, node: NodeId, kind: EventKind, handler: Handler) -> ListenerId {
        let id = self.next_id();
        self.by_node
            .entry(node)
            .or_default()
            .push(Entry { id, kind, handler });
        self.owner.insert(id, node);
        id
    }

    /// Remove one listener. Returns false if it was already gone.
    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let Some(node) = self.owner.remove(&id) else {
            return false;
        };
        if let Some(list) = self.by_node.get_mut(&node) {
            list.retain(|entry| entry.id != id);
            if list.is_empty() {
                self.by_node.remove(&node);
            }
        }
        true
    }

    /// Drop every listener attached to a node.
    pub(crate) fn remove_node(&mut self, node: NodeId) {
        if let Some(list) = self.by_node.remove(&node) {
            for entry in list {
                self.owner.remove(&entry.id);
            }
        }
    }

    /// Handlers for a node and event type, in registration order.
    pub(crate) fn handlers(&self, node: NodeId, kind: EventKind) -> Vec<Handler> {
        self.by_node
            .get(&node)
            .map(|list| {
                list.iter()
                    .filter(|entry| entry.kind == kind)
                    .map(|entry| entry.handler.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, node: NodeId) -> usize {
        self.by_node.get(&node).map_or(0, Vec::len)
    }

    pub(crate) fn clear(&mut self) {
        self.by_node.clear();
        self.owner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indextree::Arena;

    fn noop() -> Handler {
        Rc::new(|_, _| {})
    }

    #[test]
    fn test_add_and_remove() {
        let mut arena = Arena::new();
        let node = arena.new_node(());
        let mut registry = ListenerRegistry::default();

        let click = registry.add(node, EventKind::Click, noop());
        registry.add(node, EventKind::Blur, noop());

        assert_eq!(registry.handlers(node, EventKind::Click).len(), 1);
        assert_eq!(registry.count(node), 2);

        assert!(registry.remove(click));
        assert!(!registry.remove(click));
        assert!(registry.handlers(node, EventKind::Click).is_empty());
        assert_eq!(registry.count(node), 1);
    }

    #[test]
    fn test_remove_node_drops_everything() {
        let mut arena = Arena::new();
        let node = arena.new_node(());
        let mut registry = ListenerRegistry::default();

        let id = registry.add(node, EventKind::Click, noop());
        registry.remove_node(node);

        assert_eq!(registry.count(node), 0);
        assert!(!registry.remove(id));
    }
}
