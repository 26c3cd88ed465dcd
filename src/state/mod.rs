//! Shared state - Context objects components coordinate through.
//!
//! - [`overlay`] - Open dialogs, body scroll lock and Escape routing

pub mod overlay;

pub use overlay::{Dismiss, OverlayStack};
