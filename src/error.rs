//! Error types for spark-components
//!
//! Centralized error handling using snafu. Validation failures are not errors:
//! they are [`FieldError`](crate::primitives::FieldError) values shown to the user.

use snafu::Snafu;

/// Main error type for the crate
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// The serialized options attribute is not valid JSON
    #[snafu(display("Malformed options for component {component:?}: {source}"))]
    MalformedOptions {
        component: String,
        source: serde_json::Error,
    },

    /// The serialized options attribute parsed, but not to an object
    #[snafu(display("Options for component {component:?} must be a JSON object"))]
    OptionsNotObject { component: String },

    /// The options bag does not fit the component's option schema
    #[snafu(display("Invalid options for component {component:?}: {source}"))]
    InvalidOptions {
        component: String,
        source: serde_json::Error,
    },

    /// A selector string could not be parsed
    #[snafu(display("Invalid selector {selector:?}: {reason}"))]
    Selector { selector: String, reason: String },

    /// The node was removed from the document or never belonged to it
    #[snafu(display("Node {node} is not part of this document"))]
    NodeNotFound { node: String },

    /// Tree mutation rejected (appending a node to itself or its descendant)
    #[snafu(display("Tree operation failed: {source}"))]
    Tree { source: indextree::NodeError },

    /// TOML deserialization error
    #[snafu(display("Config parse error: {source}"))]
    ConfigParse { source: toml::de::Error },
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
