//! Custom error types for promotion failures that callers match on.

use thiserror::Error;

/// Typed errors raised by the promotion engine.
///
/// Most failures in this crate propagate as wrapped `eyre` reports carrying
/// path and operation context. The variants here are the configuration errors
/// a caller may want to detect programmatically rather than display.
#[derive(Error, Debug)]
pub enum PromoteError {
    #[error("Invalid promote configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "No promotion rule configured: exactly one of apps, file, helm, helmfile or kpt must be set"
    )]
    NoRule,

    #[error(
        "Multiple promotion rules configured ({kinds}): exactly one of apps, file, helm, helmfile or kpt must be set"
    )]
    MultipleRules { kinds: String },

    #[error("At most one resource of kind App can be specified but found {names:?}")]
    MultipleAppResources { names: Vec<String> },

    #[error("No change function configured")]
    MissingChangeFunction,

    #[error("Invalid repository url {url}: {source}")]
    InvalidRepositoryUrl {
        url: String,
        source: url::ParseError,
    },
}

impl PromoteError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a multiple-rules error from the offending rule kinds
    pub fn multiple_rules(kinds: &[&str]) -> Self {
        Self::MultipleRules {
            kinds: kinds.join(", "),
        }
    }
}
