//! Components - The concrete components built on the registry.
//!
//! - [`Control`] (`"button"`) - ripple click feedback and a busy state
//! - [`Dialog`] (`"modal"`) - modal overlay with a backdrop
//! - [`FieldValidator`] (`"form-validator"`) - required and email checks
//!
//! # Lifecycle
//!
//! Each component:
//! 1. Reads its typed options (defaults for anything unspecified)
//! 2. Wires every listener on its root during construction
//! 3. Lives until its root is removed or the document unloads
//!
//! ```ignore
//! let control = Control::new(&ctx, button, ControlOptions::default());
//! doc.remove(button); // listeners dropped, pending ripples cancelled
//! ```

mod control;
mod dialog;
mod field_validator;

pub use control::{Control, ControlOptions, LOADING_ATTRIBUTE};
pub use dialog::{Dialog, DialogOptions};
pub use field_validator::{FieldError, FieldValidator, SubmitHook, ValidatorOptions};
