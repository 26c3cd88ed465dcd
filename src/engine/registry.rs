//! Component Registry - Name to constructor mapping.
//!
//! The registry is the framework's extension point: anything that can build a
//! [`Component`] from an element and an options bag can be registered under a
//! name, and markup can then request it by that name.
//!
//! - Registration is unconditional: the last registration for a name wins
//! - Lookup of an unknown name is `None`, never an error
//!
//! Typed components register through [`constructor_for`], which validates the
//! options bag against the component's schema before constructing it.

use std::collections::HashMap;
use std::rc::Rc;

use super::component::{parse_options, Declarative, Instance, OptionsBag};
use super::context::ComponentContext;
use crate::dom::NodeId;
use crate::error::Result;

/// Builds a component bound to `element`.
pub type Constructor = Rc<dyn Fn(&ComponentContext, NodeId, &OptionsBag) -> Result<Instance>>;

/// Constructor for a [`Declarative`] component type.
pub fn constructor_for<C: Declarative>() -> Constructor {
    Rc::new(|ctx: &ComponentContext, element: NodeId, bag: &OptionsBag| {
        let options = parse_options::<C::Options>(C::NAME, bag)?;
        let component = C::construct(ctx, element, options)?;
        Ok(Rc::new(component) as Instance)
    })
}

// =============================================================================
// Registry
// =============================================================================

/// Name to constructor table
#[derive(Default, Clone)]
pub struct Registry {
    constructors: HashMap<String, Constructor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `constructor` under `name`, replacing any earlier entry.
    pub fn register(&mut self, name: impl Into<String>, constructor: Constructor) {
        let name = name.into();
        let replaced = self.constructors.insert(name.clone(), constructor).is_some();
        tracing::debug!(component = %name, replaced, "registered component");
    }

    /// Register a typed component under its default name.
    pub fn register_component<C: Declarative>(&mut self) {
        self.register(C::NAME, constructor_for::<C>());
    }

    pub fn lookup(&self, name: &str) -> Option<Constructor> {
        self.constructors.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.constructors.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.names())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dom::Document;
    use crate::engine::Component;
    use serde::Deserialize;
    use std::any::Any;

    struct Tagged {
        root: NodeId,
        tag: &'static str,
    }

    impl Component for Tagged {
        fn name(&self) -> &'static str {
            self.tag
        }

        fn root(&self) -> NodeId {
            self.root
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Default, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    struct NoOptions {}

    impl Declarative for Tagged {
        const NAME: &'static str = "tagged";
        type Options = NoOptions;

        fn construct(_ctx: &ComponentContext, root: NodeId, _options: NoOptions) -> Result<Self> {
            Ok(Self { root, tag: "typed" })
        }
    }

    fn tagged(tag: &'static str) -> Constructor {
        Rc::new(move |_ctx: &ComponentContext, root: NodeId, _bag: &OptionsBag| {
            Ok(Rc::new(Tagged { root, tag }) as Instance)
        })
    }

    fn setup() -> (ComponentContext, NodeId) {
        let doc = Document::new();
        let element = doc.create_element("div");
        (ComponentContext::new(doc, Config::default()), element)
    }

    #[test]
    fn test_last_registration_wins() {
        let (ctx, element) = setup();
        let mut registry = Registry::new();
        registry.register("widget", tagged("first"));
        registry.register("widget", tagged("second"));
        assert_eq!(registry.len(), 1);

        let constructor = registry.lookup("widget").unwrap();
        let instance = constructor(&ctx, element, &OptionsBag::new()).unwrap();
        assert_eq!(instance.name(), "second");
    }

    #[test]
    fn test_lookup_unknown_is_none() {
        let mut registry = Registry::new();
        assert!(registry.lookup("missing").is_none());
        assert!(!registry.contains("missing"));
        assert!(registry.is_empty());

        registry.register("present", tagged("p"));
        assert!(registry.contains("present"));
        assert!(!registry.contains("missing"));
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = Registry::new();
        registry.register("modal", tagged("m"));
        registry.register("button", tagged("b"));
        registry.register_component::<Tagged>();
        assert_eq!(registry.names(), vec!["button", "modal", "tagged"]);
    }

    #[test]
    fn test_typed_constructor_validates_options() {
        let (ctx, element) = setup();
        let constructor = constructor_for::<Tagged>();

        let instance = constructor(&ctx, element, &OptionsBag::new()).unwrap();
        assert_eq!(instance.root(), element);
        assert!(instance.is::<Tagged>());

        let mut bag = OptionsBag::new();
        bag.insert("unexpected".to_string(), serde_json::Value::Bool(true));
        assert!(constructor(&ctx, element, &bag).is_err());
    }
}
