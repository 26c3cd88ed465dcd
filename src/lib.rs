//! # spark-components
//!
//! Declarative UI components for Rust.
//!
//! Markup requests a component by name through a data attribute; the
//! [`ComponentManager`] finds those elements and builds the registered
//! component on each one:
//!
//! ```text
//! <button data-component="button" data-options='{"loadingText": "Sending"}'>
//!         │
//!    auto_init ──▶ Registry::lookup("button") ──▶ Control bound to <button>
//! ```
//!
//! Components are written against [`dom::Document`], an in-memory document
//! with bubbling events, focus and a virtual-clock timer queue.
//!
//! ## Modules
//!
//! - [`dom`] - Host document: tree, selectors, events, focus, timers
//! - [`engine`] - Component contract, registry, instantiation and discovery
//! - [`primitives`] - Control, Dialog and FieldValidator
//! - [`state`] - Overlay stack shared by dialogs
//! - [`config`] - Markup attribute names and timing
//! - [`error`] - Crate error type

pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::Config;

pub use error::{Error, Result};

pub use dom::{DispatchOutcome, Document, Event, EventKind, KeyboardEvent, NodeId};

pub use engine::{
    constructor_for, Component, ComponentContext, ComponentManager, Constructor, Declarative,
    Instance, OptionsBag, Registry, ScanFailure, ScanReport,
};

pub use primitives::{
    Control, ControlOptions, Dialog, DialogOptions, FieldError, FieldValidator, SubmitHook,
    ValidatorOptions,
};

pub use state::{Dismiss, OverlayStack};
