//! Component contract - What the registry constructs.
//!
//! Every component owns one root element and wires all of its behavior while
//! it is constructed; there is no separate activation step.
//!
//! Components requested from markup implement [`Declarative`], which ties a
//! registry name to a typed options schema. Options bags are validated
//! against that schema before construction: unknown keys and wrongly typed
//! values are rejected, unspecified keys fall back to the defaults.

use std::any::Any;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use snafu::ResultExt;

use super::context::ComponentContext;
use crate::dom::NodeId;
use crate::error::{InvalidOptionsSnafu, MalformedOptionsSnafu, OptionsNotObjectSnafu, Result};

/// Unordered option key/value pairs, as parsed from markup.
pub type OptionsBag = serde_json::Map<String, serde_json::Value>;

/// A live component bound to one root element
pub trait Component: Any {
    /// Registry name of the component type
    fn name(&self) -> &'static str;

    /// The element this instance is bound to
    fn root(&self) -> NodeId;

    fn as_any(&self) -> &dyn Any;
}

impl dyn Component {
    /// Borrow the concrete component type.
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Component>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// A constructed component, as returned by the instantiator.
pub type Instance = Rc<dyn Component>;

/// A component type that can be requested from markup.
pub trait Declarative: Component + Sized {
    /// Default registry name
    const NAME: &'static str;

    /// Option schema. `Default` supplies the built-in defaults.
    type Options: DeserializeOwned + Default;

    /// Construct and fully wire an instance on `root`.
    fn construct(ctx: &ComponentContext, root: NodeId, options: Self::Options) -> Result<Self>;
}

/// Validate an options bag against a component's schema.
pub fn parse_options<O: DeserializeOwned>(component: &str, bag: &OptionsBag) -> Result<O> {
    serde_json::from_value(serde_json::Value::Object(bag.clone()))
        .context(InvalidOptionsSnafu { component })
}

/// Parse a serialized options attribute into a bag.
///
/// The attribute must hold a JSON object. Anything else is an error for the
/// element carrying it.
pub fn parse_options_attribute(component: &str, raw: &str) -> Result<OptionsBag> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context(MalformedOptionsSnafu { component })?;
    match value {
        serde_json::Value::Object(bag) => Ok(bag),
        _ => OptionsNotObjectSnafu { component }.fail(),
    }
}
