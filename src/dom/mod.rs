//! Host Document - In-memory element tree, events, focus and timers.
//!
//! Components are written against [`Document`], a single-threaded stand-in
//! for the browser DOM:
//!
//! - **Tree** - elements and text nodes in an `indextree` arena
//! - **Events** - bubbling dispatch with `prevent_default`/`stop_propagation`
//! - **Focus** - one focused element, blur fired on the element losing focus
//! - **Timers** - cancellable callbacks on a virtual clock
//! - **Lifecycle** - destroy callbacks run when a node is removed
//!
//! `detach` takes a node out of the tree but keeps it alive with its
//! listeners (a closed dialog). `remove` destroys the node and its subtree.
//!
//! # Example
//!
//! ```ignore
//! use spark_components::dom::{Document, EventKind};
//!
//! let doc = Document::new();
//! let button = doc.append_element(doc.body(), "button")?;
//! doc.set_text_content(button, "Send");
//! doc.add_listener(button, EventKind::Click, |_doc, event| {
//!     event.prevent_default();
//! });
//! doc.click(button, Point::new(4.0, 4.0));
//! ```

mod event;
mod listeners;
mod node;
pub mod selector;
mod timers;

pub use event::{DispatchOutcome, Event, EventFlags, EventKind, KeyboardEvent};
pub use indextree::NodeId;
pub use listeners::{Handler, ListenerId};
pub use node::{Element, NodeData};
pub use selector::{Compound, SelectorList};
pub use timers::{TimerCallback, TimerId};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use indextree::Arena;
use snafu::ResultExt;
use spark_signals::{signal, Signal};

use crate::error::{NodeNotFoundSnafu, Result, TreeSnafu};
use crate::types::{Point, Rect};
use listeners::ListenerRegistry;
use timers::TimerQueue;

type DestroyCallback = Box<dyn FnOnce(&Document)>;

struct DocumentInner {
    tree: RefCell<Arena<NodeData>>,
    root: NodeId,
    body: NodeId,
    listeners: RefCell<ListenerRegistry>,
    timers: RefCell<TimerQueue>,
    destroy_callbacks: RefCell<HashMap<NodeId, Vec<DestroyCallback>>>,
    focused: Signal<Option<NodeId>>,
    submitted: RefCell<Vec<NodeId>>,
}

/// Shared handle to a document. Cloning is cheap and yields the same document.
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.inner.root)
            .field("body", &self.inner.body)
            .field("nodes", &self.inner.tree.borrow().len())
            .finish()
    }
}

fn live(tree: &Arena<NodeData>, node: NodeId) -> Option<&NodeData> {
    let entry = tree.get(node)?;
    if node.is_removed(tree) {
        return None;
    }
    Some(entry.get())
}

fn live_mut(tree: &mut Arena<NodeData>, node: NodeId) -> Option<&mut NodeData> {
    if tree.get(node).is_none() || node.is_removed(tree) {
        return None;
    }
    tree.get_mut(node).map(|entry| entry.get_mut())
}

impl Document {
    /// Create an empty document containing only `<body>`.
    pub fn new() -> Self {
        let mut tree = Arena::new();
        let root = tree.new_node(NodeData::Document);
        let body = tree.new_node(NodeData::Element(Element::new("body")));
        root.append(body, &mut tree);

        Self {
            inner: Rc::new(DocumentInner {
                tree: RefCell::new(tree),
                root,
                body,
                listeners: RefCell::new(ListenerRegistry::default()),
                timers: RefCell::new(TimerQueue::default()),
                destroy_callbacks: RefCell::new(HashMap::new()),
                focused: signal(None),
                submitted: RefCell::new(Vec::new()),
            }),
        }
    }

    /// The document node. Document-level listeners attach here.
    pub fn root(&self) -> NodeId {
        self.inner.root
    }

    pub fn body(&self) -> NodeId {
        self.inner.body
    }

    // =========================================================================
    // TREE
    // =========================================================================

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.inner
            .tree
            .borrow_mut()
            .new_node(NodeData::Element(Element::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&self, text: &str) -> NodeId {
        self.inner
            .tree
            .borrow_mut()
            .new_node(NodeData::Text(text.to_string()))
    }

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already in the tree.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut tree = self.inner.tree.borrow_mut();
        for node in [parent, child] {
            if live(&tree, node).is_none() {
                return NodeNotFoundSnafu {
                    node: format!("{node:?}"),
                }
                .fail();
            }
        }
        parent.checked_append(child, &mut tree).context(TreeSnafu)
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&self, parent: NodeId, tag: &str) -> Result<NodeId> {
        let element = self.create_element(tag);
        self.append_child(parent, element)?;
        Ok(element)
    }

    /// Take a node (and its subtree) out of the tree. The node stays alive:
    /// attributes and listeners are kept and it can be appended again.
    pub fn detach(&self, node: NodeId) {
        if node == self.inner.root {
            return;
        }
        let mut tree = self.inner.tree.borrow_mut();
        if live(&tree, node).is_some() {
            node.detach(&mut tree);
        }
    }

    /// Destroy a node and its subtree: listeners are dropped, destroy
    /// callbacks run, and the nodes are freed. Removing the document node is
    /// a no-op; use [`unload`](Self::unload).
    pub fn remove(&self, node: NodeId) {
        if node == self.inner.root {
            return;
        }
        let doomed: Vec<NodeId> = {
            let tree = self.inner.tree.borrow();
            if live(&tree, node).is_none() {
                return;
            }
            node.descendants(&tree).collect()
        };

        if self.focused().is_some_and(|focused| doomed.contains(&focused)) {
            self.inner.focused.set(None);
        }

        {
            let mut listeners = self.inner.listeners.borrow_mut();
            for node in &doomed {
                listeners.remove_node(*node);
            }
        }

        let callbacks: Vec<DestroyCallback> = {
            let mut registry = self.inner.destroy_callbacks.borrow_mut();
            doomed
                .iter()
                .filter_map(|node| registry.remove(node))
                .flatten()
                .collect()
        };
        for callback in callbacks {
            callback(self);
        }

        let mut tree = self.inner.tree.borrow_mut();
        if live(&tree, node).is_some() {
            node.remove_subtree(&mut tree);
        }
        tracing::trace!(node = ?node, count = doomed.len(), "removed subtree");
    }

    /// Check whether a node exists (created and not removed).
    pub fn contains_node(&self, node: NodeId) -> bool {
        live(&self.inner.tree.borrow(), node).is_some()
    }

    /// Check whether a node is attached to the document.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let tree = self.inner.tree.borrow();
        live(&tree, node).is_some() && node.ancestors(&tree).any(|a| a == self.inner.root)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        let tree = self.inner.tree.borrow();
        live(&tree, node)?;
        tree.get(node)?.parent()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        let tree = self.inner.tree.borrow();
        if live(&tree, node).is_none() {
            return Vec::new();
        }
        node.children(&tree).collect()
    }

    /// Check whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let tree = self.inner.tree.borrow();
        live(&tree, node).is_some() && node.ancestors(&tree).any(|a| a == ancestor)
    }

    // =========================================================================
    // ELEMENTS
    // =========================================================================

    /// Read an element. Returns None for text nodes and removed nodes.
    pub fn with_element<R>(&self, node: NodeId, f: impl FnOnce(&Element) -> R) -> Option<R> {
        let tree = self.inner.tree.borrow();
        live(&tree, node)?.as_element().map(f)
    }

    /// Mutate an element. Returns None for text nodes and removed nodes.
    pub fn with_element_mut<R>(
        &self,
        node: NodeId,
        f: impl FnOnce(&mut Element) -> R,
    ) -> Option<R> {
        let mut tree = self.inner.tree.borrow_mut();
        live_mut(&mut tree, node)?.as_element_mut().map(f)
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.with_element(node, |e| e.tag().to_string())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_element(node, |e| e.attribute(name).map(str::to_string))
            .flatten()
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.with_element(node, |e| e.has_attribute(name))
            .unwrap_or(false)
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.with_element_mut(node, |e| e.set_attribute(name, value));
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        self.with_element_mut(node, |e| e.remove_attribute(name));
    }

    /// Read `data-{key}`.
    pub fn dataset(&self, node: NodeId, key: &str) -> Option<String> {
        self.attribute(node, &format!("data-{key}"))
    }

    /// Write `data-{key}`.
    pub fn set_dataset(&self, node: NodeId, key: &str, value: &str) {
        self.set_attribute(node, &format!("data-{key}"), value);
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.with_element(node, |e| e.has_class(class))
            .unwrap_or(false)
    }

    pub fn add_class(&self, node: NodeId, class: &str) {
        self.with_element_mut(node, |e| e.add_class(class));
    }

    pub fn remove_class(&self, node: NodeId, class: &str) {
        self.with_element_mut(node, |e| e.remove_class(class));
    }

    pub fn toggle_class(&self, node: NodeId, class: &str, on: bool) {
        self.with_element_mut(node, |e| e.toggle_class(class, on));
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.with_element(node, |e| e.style(property).map(str::to_string))
            .flatten()
    }

    pub fn set_style(&self, node: NodeId, property: &str, value: &str) {
        self.with_element_mut(node, |e| e.set_style(property, value));
    }

    pub fn remove_style(&self, node: NodeId, property: &str) {
        self.with_element_mut(node, |e| e.remove_style(property));
    }

    /// Concatenated text of the node and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let tree = self.inner.tree.borrow();
        if live(&tree, node).is_none() {
            return String::new();
        }
        node.descendants(&tree)
            .filter_map(|n| match tree.get(n).map(|entry| entry.get()) {
                Some(NodeData::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all children with a single text node (none for empty text).
    pub fn set_text_content(&self, node: NodeId, text: &str) {
        let is_text = {
            let mut tree = self.inner.tree.borrow_mut();
            match live_mut(&mut tree, node) {
                Some(NodeData::Text(existing)) => {
                    *existing = text.to_string();
                    true
                }
                Some(_) => false,
                None => return,
            }
        };
        if is_text {
            return;
        }
        for child in self.children(node) {
            self.remove(child);
        }
        if !text.is_empty() {
            let text_node = self.create_text(text);
            let mut tree = self.inner.tree.borrow_mut();
            node.append(text_node, &mut tree);
        }
    }

    /// Current value of a form control.
    pub fn value(&self, node: NodeId) -> String {
        self.with_element(node, |e| e.value().to_string())
            .unwrap_or_default()
    }

    pub fn set_value(&self, node: NodeId, value: &str) {
        self.with_element_mut(node, |e| e.set_value(value));
    }

    /// Lowercased `type` of a form control (`text` when absent).
    pub fn input_type(&self, node: NodeId) -> String {
        self.with_element(node, Element::input_type)
            .unwrap_or_default()
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.with_element(node, Element::is_disabled)
            .unwrap_or(false)
    }

    pub fn set_disabled(&self, node: NodeId, disabled: bool) {
        if disabled {
            self.set_attribute(node, "disabled", "");
        } else {
            self.remove_attribute(node, "disabled");
        }
    }

    pub fn bounding_rect(&self, node: NodeId) -> Rect {
        self.with_element(node, Element::rect).unwrap_or_default()
    }

    pub fn set_bounding_rect(&self, node: NodeId, rect: Rect) {
        self.with_element_mut(node, |e| e.set_rect(rect));
    }

    // =========================================================================
    // SELECTORS
    // =========================================================================

    /// Descendants of `scope` (excluding `scope`) matching `selector`, in
    /// document order.
    pub fn query_selector_all(&self, scope: NodeId, selector: &SelectorList) -> Vec<NodeId> {
        let tree = self.inner.tree.borrow();
        if live(&tree, scope).is_none() {
            return Vec::new();
        }
        scope
            .descendants(&tree)
            .skip(1)
            .filter(|node| {
                live(&tree, *node)
                    .and_then(NodeData::as_element)
                    .is_some_and(|e| selector.matches(e))
            })
            .collect()
    }

    /// First descendant of `scope` matching `selector`.
    pub fn query_selector(&self, scope: NodeId, selector: &SelectorList) -> Option<NodeId> {
        self.query_selector_all(scope, selector).into_iter().next()
    }

    /// Parse `selector` and run [`query_selector_all`](Self::query_selector_all).
    pub fn select(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        Ok(self.query_selector_all(scope, &selector))
    }

    /// Nearest of `node` and its ancestors matching `selector`.
    pub fn closest(&self, node: NodeId, selector: &SelectorList) -> Option<NodeId> {
        let tree = self.inner.tree.borrow();
        live(&tree, node)?;
        node.ancestors(&tree).find(|n| {
            live(&tree, *n)
                .and_then(NodeData::as_element)
                .is_some_and(|e| selector.matches(e))
        })
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Register a listener on a node.
    pub fn add_listener(
        &self,
        node: NodeId,
        kind: EventKind,
        handler: impl Fn(&Document, &mut Event) + 'static,
    ) -> ListenerId {
        self.inner
            .listeners
            .borrow_mut()
            .add(node, kind, Rc::new(handler))
    }

    /// Register a listener on the document node. Bubbling events from any
    /// connected element reach it last.
    pub fn add_document_listener(
        &self,
        kind: EventKind,
        handler: impl Fn(&Document, &mut Event) + 'static,
    ) -> ListenerId {
        self.add_listener(self.inner.root, kind, handler)
    }

    /// Returns false if the listener was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.borrow_mut().remove(id)
    }

    /// Number of listeners attached to a node.
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.inner.listeners.borrow().count(node)
    }

    /// Dispatch an event along its path: the target, then (for bubbling
    /// events) each ancestor up to the top of the target's tree.
    pub fn dispatch(&self, event: &mut Event) -> DispatchOutcome {
        let path: Vec<NodeId> = {
            let tree = self.inner.tree.borrow();
            if live(&tree, event.target()).is_none() {
                return DispatchOutcome::Suppressed;
            }
            if event.bubbles() {
                event.target().ancestors(&tree).collect()
            } else {
                vec![event.target()]
            }
        };

        for node in path {
            let handlers = self.inner.listeners.borrow().handlers(node, event.kind());
            event.set_current_target(node);
            for handler in handlers {
                handler(self, event);
            }
            if event.propagation_stopped() {
                break;
            }
        }

        if event.default_prevented() {
            DispatchOutcome::Prevented
        } else {
            DispatchOutcome::Completed
        }
    }

    /// Click an element at a client position.
    ///
    /// Disabled form controls receive no click. Unless a handler prevents
    /// it, the default action runs: a submit button submits its form.
    pub fn click(&self, target: NodeId, point: Point) -> DispatchOutcome {
        if self.is_disabled(target) {
            return DispatchOutcome::Suppressed;
        }
        let mut event = Event::click(target, point);
        let outcome = self.dispatch(&mut event);
        if outcome.default_allowed() {
            self.activate(target);
        }
        outcome
    }

    /// Click an element at the center of its bounding rect.
    pub fn click_center(&self, target: NodeId) -> DispatchOutcome {
        self.click(target, self.bounding_rect(target).center())
    }

    fn activate(&self, target: NodeId) {
        let submitter = SelectorList::from(Compound::tag("button"))
            .or(Compound::tag("input").with_attribute_value("type", "submit"));
        let Some(button) = self.closest(target, &submitter) else {
            return;
        };
        if self.input_type(button) != "submit" {
            return;
        }
        if let Some(form) = self.closest(button, &Compound::tag("form").into()) {
            self.submit(form);
        }
    }

    /// Submit a form. If no handler prevents the default, the submission is
    /// recorded (see [`submitted_forms`](Self::submitted_forms)).
    pub fn submit(&self, form: NodeId) -> DispatchOutcome {
        let mut event = Event::new(EventKind::Submit, form);
        let outcome = self.dispatch(&mut event);
        if outcome.default_allowed() {
            tracing::debug!(form = ?form, "native form submission");
            self.inner.submitted.borrow_mut().push(form);
        }
        outcome
    }

    /// Forms whose default submission was not prevented, oldest first.
    pub fn submitted_forms(&self) -> Vec<NodeId> {
        self.inner.submitted.borrow().clone()
    }

    /// Press a key. The keydown targets the focused element, or the body.
    pub fn key_down(&self, key: &str) -> DispatchOutcome {
        self.key_down_with(KeyboardEvent::new(key))
    }

    pub fn key_down_with(&self, keyboard: KeyboardEvent) -> DispatchOutcome {
        let target = self
            .focused()
            .filter(|node| self.is_connected(*node))
            .unwrap_or(self.inner.body);
        let mut event = Event::key_down(target, keyboard);
        self.dispatch(&mut event)
    }

    // =========================================================================
    // FOCUS
    // =========================================================================

    /// Currently focused element.
    pub fn focused(&self) -> Option<NodeId> {
        self.inner.focused.get()
    }

    /// Move focus to `node`, firing blur on the element losing focus.
    /// Returns false if the node does not exist.
    pub fn focus(&self, node: NodeId) -> bool {
        if !self.contains_node(node) {
            return false;
        }
        if self.focused() == Some(node) {
            return true;
        }
        self.blur();
        self.inner.focused.set(Some(node));
        self.dispatch(&mut Event::new(EventKind::Focus, node));
        true
    }

    /// Clear focus, firing blur on the focused element.
    pub fn blur(&self) {
        if let Some(previous) = self.focused() {
            self.inner.focused.set(None);
            self.dispatch(&mut Event::new(EventKind::Blur, previous));
        }
    }

    // =========================================================================
    // TIMERS
    // =========================================================================

    /// Schedule `callback` to run once `delay` has elapsed on the clock.
    pub fn set_timeout(
        &self,
        delay: Duration,
        callback: impl FnOnce(&Document) + 'static,
    ) -> TimerId {
        self.inner
            .timers
            .borrow_mut()
            .schedule(delay, Box::new(callback))
    }

    /// Cancel a timer. Returns false if it already ran or was cancelled.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.inner.timers.borrow_mut().cancel(id)
    }

    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.inner.timers.borrow().is_pending(id)
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().pending()
    }

    /// Current reading of the virtual clock.
    pub fn now(&self) -> Duration {
        self.inner.timers.borrow().now()
    }

    /// Move the clock forward, running every timer that falls due.
    pub fn advance(&self, by: Duration) {
        let until = self.now() + by;
        loop {
            let next = self.inner.timers.borrow_mut().pop_due(until);
            let Some(callback) = next else {
                break;
            };
            callback(self);
        }
        self.inner.timers.borrow_mut().set_now(until);
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Register a callback to run when `node` is removed.
    pub fn on_destroy(&self, node: NodeId, callback: impl FnOnce(&Document) + 'static) {
        self.inner
            .destroy_callbacks
            .borrow_mut()
            .entry(node)
            .or_default()
            .push(Box::new(callback));
    }

    /// Page unload: every destroy callback runs, then all listeners and
    /// timers are dropped.
    pub fn unload(&self) {
        let callbacks: Vec<DestroyCallback> = self
            .inner
            .destroy_callbacks
            .borrow_mut()
            .drain()
            .flat_map(|(_, callbacks)| callbacks)
            .collect();
        for callback in callbacks {
            callback(self);
        }
        self.inner.listeners.borrow_mut().clear();
        self.inner.timers.borrow_mut().clear();
        self.inner.focused.set(None);
        tracing::debug!("document unloaded");
    }
}

// =============================================================================
// TESTS
// =============================================================================
