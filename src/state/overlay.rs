//! Overlay Stack - Open dialogs, body scroll lock and Escape routing
//!
//! One stack per document, shared by every dialog built from the same
//! component context:
//!
//! - The body scroll lock is reference counted: the first open dialog locks
//!   it, the last one to close restores the previous `overflow` value
//! - A single document-level keydown listener routes Escape to the topmost
//!   open dialog that accepts it
//!
//! # Example
//!
//! ```ignore
//! let overlays = OverlayStack::new(doc.clone());
//! overlays.push(dialog_root, true, dismiss_target.clone());
//! assert!(overlays.is_scroll_locked());
//! overlays.release(dialog_root);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::dom::{Document, EventKind, KeyboardEvent, ListenerId, NodeId};

/// Something the stack can close in response to Escape.
pub trait Dismiss {
    fn dismiss(&self);
}

struct Entry {
    root: NodeId,
    closes_on_escape: bool,
    target: Rc<dyn Dismiss>,
}

struct OverlayInner {
    document: Document,
    entries: RefCell<Vec<Entry>>,
    escape_listener: Cell<Option<ListenerId>>,
    saved_overflow: RefCell<Option<String>>,
    locked: Signal<bool>,
}

/// Shared handle to a document's overlay stack
#[derive(Clone)]
pub struct OverlayStack {
    inner: Rc<OverlayInner>,
}

impl OverlayStack {
    pub fn new(document: Document) -> Self {
        Self {
            inner: Rc::new(OverlayInner {
                document,
                entries: RefCell::new(Vec::new()),
                escape_listener: Cell::new(None),
                saved_overflow: RefCell::new(None),
                locked: signal(false),
            }),
        }
    }

    /// Install the Escape listener. Only the first call registers it.
    pub fn watch_escape(&self) {
        if self.inner.escape_listener.get().is_some() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let id = self
            .inner
            .document
            .add_document_listener(EventKind::KeyDown, move |_doc, event| {
                if !event.keyboard().is_some_and(KeyboardEvent::is_escape) {
                    return;
                }
                if let Some(inner) = weak.upgrade() {
                    OverlayStack { inner }.dismiss_top();
                }
            });
        self.inner.escape_listener.set(Some(id));
    }

    /// Register an open overlay. Pushing a root that is already open is a no-op.
    ///
    /// The stack holds `target` until the root is released.
    pub fn push(&self, root: NodeId, closes_on_escape: bool, target: Rc<dyn Dismiss>) {
        let count = {
            let mut entries = self.inner.entries.borrow_mut();
            if entries.iter().any(|entry| entry.root == root) {
                return;
            }
            entries.push(Entry {
                root,
                closes_on_escape,
                target,
            });
            entries.len()
        };
        if count == 1 {
            self.lock_scroll();
        }
        tracing::debug!(root = ?root, open = count, "overlay opened");
    }

    /// Unregister an overlay. Releasing a root that is not open is a no-op.
    pub fn release(&self, root: NodeId) {
        let remaining = {
            let mut entries = self.inner.entries.borrow_mut();
            let before = entries.len();
            entries.retain(|entry| entry.root != root);
            if entries.len() == before {
                return;
            }
            entries.len()
        };
        if remaining == 0 {
            self.unlock_scroll();
        }
        tracing::debug!(root = ?root, open = remaining, "overlay released");
    }

    /// Close the topmost overlay that accepts Escape.
    /// Returns false if there was none.
    pub fn dismiss_top(&self) -> bool {
        let target = self
            .inner
            .entries
            .borrow()
            .iter()
            .rev()
            .find(|entry| entry.closes_on_escape)
            .map(|entry| entry.target.clone());
        match target {
            Some(target) => {
                target.dismiss();
                true
            }
            None => false,
        }
    }

    pub fn is_open(&self, root: NodeId) -> bool {
        self.inner
            .entries
            .borrow()
            .iter()
            .any(|entry| entry.root == root)
    }

    pub fn open_count(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    /// Most recently opened overlay.
    pub fn top(&self) -> Option<NodeId> {
        self.inner.entries.borrow().last().map(|entry| entry.root)
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.inner.locked.get()
    }

    /// Reactive view of the scroll lock.
    pub fn scroll_locked_signal(&self) -> Signal<bool> {
        self.inner.locked.clone()
    }

    fn lock_scroll(&self) {
        let doc = &self.inner.document;
        let body = doc.body();
        *self.inner.saved_overflow.borrow_mut() = doc.style(body, "overflow");
        doc.set_style(body, "overflow", "hidden");
        self.inner.locked.set(true);
    }

    fn unlock_scroll(&self) {
        let doc = &self.inner.document;
        let body = doc.body();
        match self.inner.saved_overflow.borrow_mut().take() {
            Some(previous) => doc.set_style(body, "overflow", &previous),
            None => doc.remove_style(body, "overflow"),
        }
        self.inner.locked.set(false);
    }
}

// =============================================================================
// TESTS
// =============================================================================
