//! Dialog Primitive - Modal overlay with a backdrop.
//!
//! Registered as `"modal"`.
//!
//! A dialog is closed until [`Dialog::open`] attaches its backdrop and root to
//! the body. Every dialog built from one [`ComponentContext`] shares that
//! context's [`OverlayStack`]: the body stays scroll-locked while any of them
//! is open, and Escape closes the topmost one that accepts it.
//!
//! # Ways to close
//!
//! - A click on the first `[data-modal-close]` descendant
//! - A click on the backdrop (`closeOnBackdrop`, default true)
//! - Escape (`closeOnEscape`, default true)
//! - [`Dialog::close`]

use std::any::Any;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::dom::{Compound, Document, EventKind, NodeId};
use crate::engine::{Component, ComponentContext, Declarative};
use crate::error::Result;
use crate::state::{Dismiss, OverlayStack};

/// Options accepted by [`Dialog`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct DialogOptions {
    pub close_on_backdrop: bool,
    pub close_on_escape: bool,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            close_on_backdrop: true,
            close_on_escape: true,
        }
    }
}

struct DialogInner {
    document: Document,
    overlays: OverlayStack,
    root: NodeId,
    backdrop: NodeId,
    open_class: String,
    options: DialogOptions,
}

impl DialogInner {
    fn open(&self) -> Result<()> {
        let doc = &self.document;
        let body = doc.body();
        doc.append_child(body, self.backdrop)?;
        doc.append_child(body, self.root)?;
        doc.add_class(self.root, &self.open_class);
        tracing::debug!(root = ?self.root, "dialog opened");
        Ok(())
    }

    fn close(&self) {
        let doc = &self.document;
        doc.remove_class(self.root, &self.open_class);
        doc.detach(self.backdrop);
        doc.detach(self.root);
        self.overlays.release(self.root);
        tracing::debug!(root = ?self.root, "dialog closed");
    }
}

impl Dismiss for DialogInner {
    fn dismiss(&self) {
        self.close();
    }
}

/// A modal dialog bound to one root element
#[derive(Clone)]
pub struct Dialog {
    inner: Rc<DialogInner>,
}

impl Dialog {
    /// Bind a dialog to `root`, creating its backdrop and wiring close triggers.
    pub fn new(ctx: &ComponentContext, root: NodeId, options: DialogOptions) -> Self {
        let config = ctx.config();
        let doc = ctx.document().clone();

        let backdrop = doc.create_element("div");
        doc.add_class(backdrop, &config.backdrop_class);

        let inner = Rc::new(DialogInner {
            document: doc.clone(),
            overlays: ctx.overlays().clone(),
            root,
            backdrop,
            open_class: config.open_class.clone(),
            options,
        });

        let trigger = Compound::any().with_attribute(&config.close_trigger_attribute);
        if let Some(close) = doc.query_selector(root, &trigger.into()) {
            let owner = inner.clone();
            doc.add_listener(close, EventKind::Click, move |_doc, _event| owner.close());
        }

        if options.close_on_backdrop {
            let owner = inner.clone();
            doc.add_listener(backdrop, EventKind::Click, move |_doc, _event| owner.close());
        }

        if options.close_on_escape {
            ctx.overlays().watch_escape();
        }

        // The backdrop lives outside the root's subtree; it goes with the root.
        let overlays = ctx.overlays().clone();
        doc.on_destroy(root, move |doc| {
            overlays.release(root);
            doc.remove(backdrop);
        });

        Self { inner }
    }

    /// Show the dialog: backdrop then root are attached to the body, and the
    /// body is scroll-locked.
    pub fn open(&self) -> Result<()> {
        let inner = &self.inner;
        inner.open()?;
        let target: Rc<dyn Dismiss> = inner.clone();
        inner
            .overlays
            .push(inner.root, inner.options.close_on_escape, target);
        Ok(())
    }

    /// Hide the dialog. Closing a closed dialog changes nothing visible.
    pub fn close(&self) {
        self.inner.close();
    }

    /// True while the root carries the open class.
    pub fn is_open(&self) -> bool {
        self.inner
            .document
            .has_class(self.inner.root, &self.inner.open_class)
    }

    pub fn backdrop(&self) -> NodeId {
        self.inner.backdrop
    }

    pub fn options(&self) -> DialogOptions {
        self.inner.options
    }
}

impl Component for Dialog {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn root(&self) -> NodeId {
        self.inner.root
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Declarative for Dialog {
    const NAME: &'static str = "modal";
    type Options = DialogOptions;

    fn construct(ctx: &ComponentContext, root: NodeId, options: DialogOptions) -> Result<Self> {
        Ok(Self::new(ctx, root, options))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn setup() -> (Document, ComponentContext, NodeId, NodeId) {
        let doc = Document::new();
        let ctx = ComponentContext::new(doc.clone(), Config::default());
        let root = doc.create_element("div");
        doc.add_class(root, "modal");
        let close = doc.append_element(root, "button").unwrap();
        doc.set_attribute(close, "data-modal-close", "");
        (doc, ctx, root, close)
    }

    #[test]
    fn test_starts_closed() {
        let (doc, ctx, root, _) = setup();
        let dialog = Dialog::new(&ctx, root, DialogOptions::default());
        assert!(!dialog.is_open());
        assert!(!doc.is_connected(dialog.backdrop()));
        assert!(doc.has_class(dialog.backdrop(), "modal-backdrop"));
    }

    #[test]
    fn test_open_attaches_backdrop_before_root() {
        let (doc, ctx, root, _) = setup();
        let dialog = Dialog::new(&ctx, root, DialogOptions::default());

        dialog.open().unwrap();
        assert!(dialog.is_open());
        assert_eq!(doc.children(doc.body()), vec![dialog.backdrop(), root]);
        assert_eq!(doc.style(doc.body(), "overflow").as_deref(), Some("hidden"));

        dialog.close();
        assert!(!dialog.is_open());
        assert!(doc.children(doc.body()).is_empty());
        assert_eq!(doc.style(doc.body(), "overflow"), None);
    }

    #[test]
    fn test_close_when_closed_is_harmless() {
        let (doc, ctx, root, _) = setup();
        let dialog = Dialog::new(&ctx, root, DialogOptions::default());
        dialog.close();
        dialog.close();
        assert!(!dialog.is_open());
        assert!(!ctx.overlays().is_scroll_locked());
        assert!(doc.children(doc.body()).is_empty());
    }

    #[test]
    fn test_close_trigger_and_backdrop() {
        let (doc, ctx, root, close) = setup();
        let dialog = Dialog::new(&ctx, root, DialogOptions::default());

        dialog.open().unwrap();
        doc.click_center(close);
        assert!(!dialog.is_open());

        dialog.open().unwrap();
        doc.click_center(dialog.backdrop());
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_backdrop_click_ignored_when_disabled() {
        let (doc, ctx, root, _) = setup();
        let options = DialogOptions {
            close_on_backdrop: false,
            ..DialogOptions::default()
        };
        let dialog = Dialog::new(&ctx, root, options);

        dialog.open().unwrap();
        doc.click_center(dialog.backdrop());
        assert!(dialog.is_open());
    }

    #[test]
    fn test_escape_closes_open_dialog() {
        let (doc, ctx, root, _) = setup();
        let dialog = Dialog::new(&ctx, root, DialogOptions::default());

        doc.key_down("Escape");
        assert!(!dialog.is_open());

        dialog.open().unwrap();
        doc.key_down("a");
        assert!(dialog.is_open());
        doc.key_down("Escape");
        assert!(!dialog.is_open());
        assert!(!ctx.overlays().is_scroll_locked());
    }

    #[test]
    fn test_escape_ignored_when_disabled() {
        let (doc, ctx, root, _) = setup();
        let options = DialogOptions {
            close_on_escape: false,
            ..DialogOptions::default()
        };
        let dialog = Dialog::new(&ctx, root, options);

        dialog.open().unwrap();
        doc.key_down("Escape");
        assert!(dialog.is_open());
    }

    #[test]
    fn test_removing_root_drops_backdrop_and_lock() {
        let (doc, ctx, root, _) = setup();
        let dialog = Dialog::new(&ctx, root, DialogOptions::default());
        dialog.open().unwrap();
        let backdrop = dialog.backdrop();

        doc.remove(root);
        assert!(!doc.contains_node(backdrop));
        assert!(!ctx.overlays().is_scroll_locked());
    }
}
