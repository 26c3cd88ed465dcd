//! Control Primitive - Clickable control with ripple feedback and a busy state.
//!
//! Registered as `"button"`.
//!
//! # Features
//!
//! - Ripple: every click spawns a `span.ripple` centered on the click point,
//!   sized to the control's larger side, removed after the ripple duration
//! - Busy state: `set_loading(true)` swaps the label for the loading text and
//!   disables the control; `set_loading(false)` restores the exact label
//! - While busy, clicks do not trigger the default action
//!
//! # Options
//!
//! | key           | default        |
//! |---------------|----------------|
//! | `ripple`      | `true`         |
//! | `loadingText` | `"Loading..."` |
//!
//! # Example
//!
//! ```ignore
//! let control = Control::new(&ctx, button, ControlOptions::default());
//! control.set_loading(true);
//! assert_eq!(doc.attribute(button, "data-loading").as_deref(), Some("true"));
//! control.set_loading(false);
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use spark_signals::{signal, Signal};

use crate::dom::{Document, Event, EventKind, NodeId, TimerId};
use crate::engine::{Component, ComponentContext, Declarative};
use crate::error::Result;
use crate::types::px;

/// Attribute persisting the busy flag on the root
pub const LOADING_ATTRIBUTE: &str = "data-loading";

/// Options accepted by [`Control`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ControlOptions {
    pub ripple: bool,
    pub loading_text: String,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            ripple: true,
            loading_text: "Loading...".to_string(),
        }
    }
}

struct ControlInner {
    document: Document,
    root: NodeId,
    options: ControlOptions,
    ripple_duration: Duration,
    ripple_class: String,
    /// Label captured on entering busy, taken back on leaving it
    original_label: RefCell<Option<String>>,
    /// Shared with the removal timers and the destroy callback
    pending_ripples: Rc<RefCell<Vec<(NodeId, TimerId)>>>,
    loading: Signal<bool>,
}

impl ControlInner {
    fn is_loading(&self) -> bool {
        self.document
            .attribute(self.root, LOADING_ATTRIBUTE)
            .is_some_and(|value| value == "true")
    }
}

/// A clickable control bound to one root element
#[derive(Clone)]
pub struct Control {
    inner: Rc<ControlInner>,
}

impl Control {
    /// Bind a control to `root` and wire its click handlers.
    pub fn new(ctx: &ComponentContext, root: NodeId, options: ControlOptions) -> Self {
        let config = ctx.config();
        let inner = Rc::new(ControlInner {
            document: ctx.document().clone(),
            root,
            options,
            ripple_duration: config.ripple_duration(),
            ripple_class: config.ripple_class.clone(),
            original_label: RefCell::new(None),
            pending_ripples: Rc::new(RefCell::new(Vec::new())),
            loading: signal(false),
        });
        let doc = &inner.document;

        // Listeners keep the control alive for as long as its root exists.
        if inner.options.ripple {
            let owner = inner.clone();
            doc.add_listener(root, EventKind::Click, move |doc, event| {
                spawn_ripple(&owner, doc, event);
            });
        }

        // The busy attribute is authoritative; markup may set it directly.
        let guard = inner.clone();
        doc.add_listener(root, EventKind::Click, move |_doc, event| {
            if guard.is_loading() {
                event.prevent_default();
            }
        });

        let pending = inner.pending_ripples.clone();
        doc.on_destroy(root, move |doc| {
            let cancelled = std::mem::take(&mut *pending.borrow_mut());
            for (_ripple, timer) in &cancelled {
                doc.clear_timeout(*timer);
            }
            tracing::trace!(root = ?root, cancelled = cancelled.len(), "control destroyed");
        });

        Self { inner }
    }

    /// Enter or leave the busy state.
    ///
    /// The label is captured once per busy session, so repeated
    /// `set_loading(true)` calls never overwrite it.
    pub fn set_loading(&self, loading: bool) {
        let inner = &self.inner;
        let doc = &inner.document;
        if loading {
            {
                let mut label = inner.original_label.borrow_mut();
                if label.is_none() {
                    *label = Some(doc.text_content(inner.root));
                }
            }
            doc.set_text_content(inner.root, &inner.options.loading_text);
            doc.set_attribute(inner.root, LOADING_ATTRIBUTE, "true");
            doc.set_disabled(inner.root, true);
        } else {
            let label = inner.original_label.borrow_mut().take();
            if let Some(label) = label {
                doc.set_text_content(inner.root, &label);
            }
            doc.set_attribute(inner.root, LOADING_ATTRIBUTE, "false");
            doc.set_disabled(inner.root, false);
        }
        inner.loading.set(loading);
        tracing::debug!(root = ?inner.root, loading, "control busy state changed");
    }

    /// Read from the root's busy attribute.
    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    /// Reactive mirror of the busy flag as set by [`set_loading`](Self::set_loading).
    pub fn loading(&self) -> Signal<bool> {
        self.inner.loading.clone()
    }

    pub fn options(&self) -> &ControlOptions {
        &self.inner.options
    }

    /// Ripples still waiting for their removal timer.
    pub fn pending_ripples(&self) -> usize {
        self.inner.pending_ripples.borrow().len()
    }
}

fn spawn_ripple(inner: &ControlInner, doc: &Document, event: &Event) {
    let root = inner.root;
    let rect = doc.bounding_rect(root);
    let size = rect.max_side();
    let point = event.pointer().unwrap_or_else(|| rect.center());

    let ripple = doc.create_element("span");
    doc.set_style(ripple, "width", &px(size));
    doc.set_style(ripple, "height", &px(size));
    doc.set_style(ripple, "left", &px(point.x - rect.x - size / 2.0));
    doc.set_style(ripple, "top", &px(point.y - rect.y - size / 2.0));
    doc.add_class(ripple, &inner.ripple_class);
    if let Err(error) = doc.append_child(root, ripple) {
        tracing::warn!(root = ?root, %error, "could not attach ripple");
        doc.remove(ripple);
        return;
    }

    let pending = inner.pending_ripples.clone();
    let timer = doc.set_timeout(inner.ripple_duration, move |doc| {
        doc.remove(ripple);
        pending.borrow_mut().retain(|(node, _)| *node != ripple);
    });
    inner.pending_ripples.borrow_mut().push((ripple, timer));
}

impl Component for Control {
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

impl Declarative for Control {
    const NAME: &'static str = "button";
    type Options = ControlOptions;

    fn construct(ctx: &ComponentContext, root: NodeId, options: ControlOptions) -> Result<Self> {
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
    use crate::dom::DispatchOutcome;
    use crate::types::{Point, Rect};

    fn setup() -> (Document, ComponentContext, NodeId) {
        let doc = Document::new();
        let ctx = ComponentContext::new(doc.clone(), Config::default());
        let button = doc.append_element(doc.body(), "button").unwrap();
        doc.set_attribute(button, "type", "button");
        doc.set_text_content(button, "Get Started");
        doc.set_bounding_rect(button, Rect::new(10.0, 20.0, 120.0, 40.0));
        (doc, ctx, button)
    }

    fn ripples(doc: &Document, button: NodeId) -> Vec<NodeId> {
        doc.children(button)
            .into_iter()
            .filter(|child| doc.has_class(*child, "ripple"))
            .collect()
    }

    #[test]
    fn test_ripple_geometry() {
        let (doc, ctx, button) = setup();
        let _control = Control::new(&ctx, button, ControlOptions::default());

        doc.click(button, Point::new(40.0, 30.0));
        let spawned = ripples(&doc, button);
        assert_eq!(spawned.len(), 1);
        let ripple = spawned[0];
        assert_eq!(doc.style(ripple, "width").as_deref(), Some("120px"));
        assert_eq!(doc.style(ripple, "height").as_deref(), Some("120px"));
        assert_eq!(doc.style(ripple, "left").as_deref(), Some("-30px"));
        assert_eq!(doc.style(ripple, "top").as_deref(), Some("-50px"));
    }

    #[test]
    fn test_ripple_removed_after_duration() {
        let (doc, ctx, button) = setup();
        let control = Control::new(&ctx, button, ControlOptions::default());

        doc.click(button, Point::new(20.0, 30.0));
        doc.click(button, Point::new(30.0, 30.0));
        assert_eq!(control.pending_ripples(), 2);

        doc.advance(Duration::from_millis(599));
        assert_eq!(ripples(&doc, button).len(), 2);

        doc.advance(Duration::from_millis(1));
        assert!(ripples(&doc, button).is_empty());
        assert_eq!(control.pending_ripples(), 0);
        assert_eq!(doc.text_content(button), "Get Started");
    }

    #[test]
    fn test_ripple_disabled_by_option() {
        let (doc, ctx, button) = setup();
        let options = ControlOptions {
            ripple: false,
            ..ControlOptions::default()
        };
        let _control = Control::new(&ctx, button, options);

        doc.click(button, Point::new(20.0, 30.0));
        assert!(ripples(&doc, button).is_empty());
        assert_eq!(doc.pending_timers(), 0);
    }

    #[test]
    fn test_destroy_cancels_ripples() {
        let (doc, ctx, button) = setup();
        let control = Control::new(&ctx, button, ControlOptions::default());
        doc.click(button, Point::new(20.0, 30.0));
        assert_eq!(doc.pending_timers(), 1);

        let timer = control.inner.pending_ripples.borrow()[0].1;
        assert!(doc.is_timer_pending(timer));

        doc.remove(button);
        assert!(!doc.is_timer_pending(timer));
        assert_eq!(doc.pending_timers(), 0);
        assert_eq!(control.pending_ripples(), 0);
    }

    #[test]
    fn test_loading_round_trip_restores_label() {
        let (doc, ctx, button) = setup();
        let control = Control::new(&ctx, button, ControlOptions::default());

        control.set_loading(true);
        assert_eq!(doc.text_content(button), "Loading...");
        assert!(doc.is_disabled(button));
        assert!(control.is_loading());
        assert!(control.loading().get());

        control.set_loading(false);
        assert_eq!(doc.text_content(button), "Get Started");
        assert!(!doc.is_disabled(button));
        assert_eq!(doc.attribute(button, "data-loading").as_deref(), Some("false"));
        assert!(!control.loading().get());
    }

    #[test]
    fn test_repeated_loading_keeps_first_label() {
        let (doc, ctx, button) = setup();
        let control = Control::new(&ctx, button, ControlOptions::default());

        control.set_loading(true);
        control.set_loading(true);
        control.set_loading(false);
        assert_eq!(doc.text_content(button), "Get Started");
    }

    #[test]
    fn test_empty_label_restored() {
        let (doc, ctx, button) = setup();
        doc.set_text_content(button, "");
        let control = Control::new(&ctx, button, ControlOptions::default());

        control.set_loading(true);
        control.set_loading(false);
        assert_eq!(doc.text_content(button), "");
    }

    #[test]
    fn test_busy_control_blocks_submit() {
        let (doc, ctx, _) = setup();
        let form = doc.append_element(doc.body(), "form").unwrap();
        let submit = doc.append_element(form, "button").unwrap();
        let control = Control::new(&ctx, submit, ControlOptions::default());

        control.set_loading(true);
        // A disabled control gets no click at all; re-enable to exercise the guard.
        doc.set_disabled(submit, false);
        assert_eq!(doc.click_center(submit), DispatchOutcome::Prevented);
        assert!(doc.submitted_forms().is_empty());

        control.set_loading(false);
        assert_eq!(doc.click_center(submit), DispatchOutcome::Completed);
        assert_eq!(doc.submitted_forms(), vec![form]);
    }

    #[test]
    fn test_busy_attribute_from_markup_blocks_submit() {
        let (doc, ctx, _) = setup();
        let form = doc.append_element(doc.body(), "form").unwrap();
        let submit = doc.append_element(form, "button").unwrap();
        doc.set_attribute(submit, LOADING_ATTRIBUTE, "true");
        let options = ControlOptions {
            ripple: false,
            ..ControlOptions::default()
        };
        let control = Control::new(&ctx, submit, options);

        assert!(control.is_loading());
        assert!(!control.loading().get());
        assert_eq!(doc.click_center(submit), DispatchOutcome::Prevented);
        assert!(doc.submitted_forms().is_empty());

        doc.set_attribute(submit, LOADING_ATTRIBUTE, "false");
        assert_eq!(doc.click_center(submit), DispatchOutcome::Completed);
        assert_eq!(doc.submitted_forms(), vec![form]);
    }
}
