//! Shared construction context handed to every component constructor.

use std::rc::Rc;

use crate::config::Config;
use crate::dom::Document;
use crate::state::OverlayStack;

/// The document a component binds to, its overlay stack and the active config
#[derive(Clone)]
pub struct ComponentContext {
    document: Document,
    overlays: OverlayStack,
    config: Rc<Config>,
}

impl ComponentContext {
    pub fn new(document: Document, config: Config) -> Self {
        let overlays = OverlayStack::new(document.clone());
        Self {
            document,
            overlays,
            config: Rc::new(config),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn overlays(&self) -> &OverlayStack {
        &self.overlays
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for ComponentContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentContext")
            .field("document", &self.document)
            .field("open_overlays", &self.overlays.open_count())
            .field("config", &self.config)
            .finish()
    }
}
