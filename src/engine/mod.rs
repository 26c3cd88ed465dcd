//! Component Engine - Registry, instantiation and discovery.
//!
//! - Component: the contract every component implements, plus option parsing
//! - Registry: name to constructor table
//! - Context: document, overlay stack and config handed to constructors
//! - Manager: instantiation by name and the `auto_init` document scan
//!
//! # Architecture
//!
//! ```text
//! markup ──auto_init──▶ (element, name, options bag)
//!                              │
//!                         Registry::lookup(name)
//!                              │
//!                  Constructor(context, element, bag) ──▶ Instance
//! ```
//!
//! Components are wired entirely at construction. An instance lives as long
//! as its root element: removing the root drops its listeners and runs its
//! destroy callbacks.

mod component;
mod context;
mod manager;
mod registry;

pub use component::*;
pub use context::*;
pub use manager::*;
pub use registry::*;
