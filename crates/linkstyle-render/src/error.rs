//! Error types for the render crate.
//!
//! The styling pipeline itself never fails: a link it cannot style is logged
//! and skipped. Errors only come from loading configuration, naming a
//! contrast method and reading markup into a
//! [`Document`](crate::dom::Document).

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a [`Config`](crate::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML is malformed or has unknown keys.
    #[error("invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A value parsed but is out of range.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

/// A contrast method name other than `full`, `simple` or `none`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown contrast method '{0}' (expected full, simple or none)")]
pub struct UnknownContrastMethod(pub String);

/// Errors raised while reading markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// The XML reader rejected the input.
    #[error("markup syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    /// A closing tag does not match the open element.
    #[error("expected </{expected}>, found </{found}>")]
    Unbalanced { expected: String, found: String },

    /// Input ended with an element still open.
    #[error("unclosed element <{0}>")]
    Unclosed(String),
}
