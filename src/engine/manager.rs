//! Component Manager - Instantiation and auto-discovery.
//!
//! The manager owns a [`Registry`] together with the [`ComponentContext`]
//! every constructor receives. It is the entry point host code uses:
//!
//! ```ignore
//! let doc = Document::new();
//! let manager = ComponentManager::with_builtins(doc.clone());
//! let report = manager.auto_init();
//! for instance in &report.instances {
//!     println!("{} on {:?}", instance.name(), instance.root());
//! }
//! ```
//!
//! # Discovery
//!
//! [`auto_init`](ComponentManager::auto_init) walks the document in order and
//! instantiates every element carrying the marker attribute. A bad options
//! attribute fails only that element. Running it again builds a second
//! instance for every element that still carries the marker.

use super::component::{parse_options_attribute, Declarative, Instance, OptionsBag};
use super::context::ComponentContext;
use super::registry::{constructor_for, Constructor, Registry};
use crate::config::Config;
use crate::dom::{Compound, Document, NodeId};
use crate::error::{Error, Result};
use crate::primitives::{Control, Dialog, FieldValidator};

/// One element that could not be instantiated during a scan
#[derive(Debug)]
pub struct ScanFailure {
    pub element: NodeId,
    pub name: String,
    pub error: Error,
}

/// Result of one [`auto_init`](ComponentManager::auto_init) pass
#[derive(Default)]
pub struct ScanReport {
    /// Constructed instances, in document order
    pub instances: Vec<Instance>,
    /// Elements naming a component that is not registered
    pub unknown: Vec<(NodeId, String)>,
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    /// Number of elements the scan visited.
    pub fn visited(&self) -> usize {
        self.instances.len() + self.unknown.len() + self.failures.len()
    }
}

impl std::fmt::Debug for ScanReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let instances: Vec<(&'static str, NodeId)> = self
            .instances
            .iter()
            .map(|instance| (instance.name(), instance.root()))
            .collect();
        f.debug_struct("ScanReport")
            .field("instances", &instances)
            .field("unknown", &self.unknown)
            .field("failures", &self.failures)
            .finish()
    }
}

// =============================================================================
// Manager
// =============================================================================

/// Registry plus the context components are built in
#[derive(Debug)]
pub struct ComponentManager {
    registry: Registry,
    context: ComponentContext,
}

impl ComponentManager {
    /// Empty manager with the default configuration.
    pub fn new(document: Document) -> Self {
        Self::with_config(document, Config::default())
    }

    pub fn with_config(document: Document, config: Config) -> Self {
        Self {
            registry: Registry::new(),
            context: ComponentContext::new(document, config),
        }
    }

    /// Manager with `button`, `modal` and `form-validator` registered.
    pub fn with_builtins(document: Document) -> Self {
        let mut manager = Self::new(document);
        manager.register_builtins();
        manager
    }

    pub fn register_builtins(&mut self) {
        self.register_component::<Control>();
        self.register_component::<Dialog>();
        self.register_component::<FieldValidator>();
    }

    pub fn register(&mut self, name: impl Into<String>, constructor: Constructor) {
        self.registry.register(name, constructor);
    }

    /// Register a typed component under its default name.
    pub fn register_component<C: Declarative>(&mut self) {
        self.registry.register_component::<C>();
    }

    /// Register a typed component under a different name.
    pub fn register_component_as<C: Declarative>(&mut self, name: impl Into<String>) {
        self.registry.register(name, constructor_for::<C>());
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn context(&self) -> &ComponentContext {
        &self.context
    }

    pub fn document(&self) -> &Document {
        self.context.document()
    }

    // =========================================================================
    // Instantiation
    // =========================================================================

    /// Build the component registered as `name` on `element`.
    ///
    /// An unregistered name is logged and yields `Ok(None)`. Errors come only
    /// from the constructor, such as options rejected by the schema.
    pub fn instantiate(
        &self,
        name: &str,
        element: NodeId,
        options: &OptionsBag,
    ) -> Result<Option<Instance>> {
        let Some(constructor) = self.registry.lookup(name) else {
            tracing::warn!(component = %name, element = ?element, "component not found");
            return Ok(None);
        };
        let instance = constructor(&self.context, element, options)?;
        tracing::debug!(component = %name, element = ?element, "instantiated component");
        Ok(Some(instance))
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    /// Instantiate every element carrying the marker attribute.
    pub fn auto_init(&self) -> ScanReport {
        let config = self.context.config();
        let doc = self.context.document();
        let marker = Compound::any().with_attribute(&config.marker_attribute);
        let elements = doc.query_selector_all(doc.root(), &marker.into());

        let mut report = ScanReport::default();
        for element in elements {
            let name = doc
                .attribute(element, &config.marker_attribute)
                .unwrap_or_default();

            let bag = match doc.attribute(element, &config.options_attribute) {
                Some(raw) => match parse_options_attribute(&name, &raw) {
                    Ok(bag) => bag,
                    Err(error) => {
                        tracing::error!(component = %name, element = ?element, %error, "failed to parse options");
                        report.failures.push(ScanFailure {
                            element,
                            name,
                            error,
                        });
                        continue;
                    }
                },
                None => OptionsBag::new(),
            };

            match self.instantiate(&name, element, &bag) {
                Ok(Some(instance)) => report.instances.push(instance),
                Ok(None) => report.unknown.push((element, name)),
                Err(error) => {
                    tracing::error!(component = %name, element = ?element, %error, "failed to instantiate component");
                    report.failures.push(ScanFailure {
                        element,
                        name,
                        error,
                    });
                }
            }
        }

        tracing::debug!(
            instances = report.instances.len(),
            unknown = report.unknown.len(),
            failures = report.failures.len(),
            "auto-init finished"
        );
        report
    }
}

// =============================================================================
// TESTS
// =============================================================================
