//! Configuration - Markup contract names and timing knobs.
//!
//! The defaults match the markup the components were written for. A host can
//! override any subset from TOML:
//!
//! ```toml
//! marker_attribute = "data-widget"
//! ripple_duration_ms = 400
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::{ConfigParseSnafu, Result};

/// Framework configuration shared by every component of a manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Attribute naming the component an element requests
    pub marker_attribute: String,
    /// Attribute holding the JSON options object
    pub options_attribute: String,
    /// How long a ripple stays in the control before removal
    pub ripple_duration_ms: u64,
    pub ripple_class: String,
    /// Attribute on a dialog descendant that closes the dialog when clicked
    pub close_trigger_attribute: String,
    pub open_class: String,
    pub backdrop_class: String,
    /// Class of the error-display element next to a validated field
    pub error_class: String,
    /// Class toggled on a field that fails validation
    pub input_error_class: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker_attribute: "data-component".to_string(),
            options_attribute: "data-options".to_string(),
            ripple_duration_ms: 600,
            ripple_class: "ripple".to_string(),
            close_trigger_attribute: "data-modal-close".to_string(),
            open_class: "modal--open".to_string(),
            backdrop_class: "modal-backdrop".to_string(),
            error_class: "form__error".to_string(),
            input_error_class: "form__input--error".to_string(),
        }
    }
}

impl Config {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context(ConfigParseSnafu)
    }

    pub fn ripple_duration(&self) -> Duration {
        Duration::from_millis(self.ripple_duration_ms)
    }
}
