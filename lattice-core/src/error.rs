//! Error types for Lattice.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`Error`] - Top-level error type for all Lattice operations
//! - [`ConfigError`] - Wiring mistakes that halt the current call chain
//! - [`SelectorError`] - Selector parse failures

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Lattice operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A programming or wiring mistake was detected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A selector string could not be parsed.
    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Wiring mistakes.
///
/// These indicate a programming error rather than a runtime condition to
/// recover from: they propagate to the caller and are never routed through
/// the error bus.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A container names a template the directory has no entry for.
    #[error("undefined template: {0}")]
    UndefinedTemplate(String),

    /// Listener registration was attempted against a value with no live
    /// binding scope.
    #[error("{0} does not accept listener registration")]
    NotRegistrable(String),

    /// A partial re-render produced a fragment whose inner-container shape
    /// does not match the live node. No content is swapped in this case.
    #[error(
        "refresh shape mismatch: {current} inner containers in the tree, {rendered} in the rendered fragment"
    )]
    ShapeMismatch {
        /// Inner containers under the live node.
        current: usize,
        /// Inner containers in the freshly rendered fragment.
        rendered: usize,
    },

    /// An operation that needs a live container was invoked on a widget that
    /// is not bound to one.
    #[error("widget for template `{0}` is not bound to a live container")]
    DetachedWidget(String),

    /// A transport operation was requested but no transport collaborator was
    /// configured.
    #[error("no transport configured")]
    NoTransport,
}

/// Errors raised while parsing a selector string.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector string was empty.
    #[error("empty selector")]
    Empty,

    /// An attribute clause was opened with `[` but never closed.
    #[error("unterminated attribute clause in `{0}`")]
    UnterminatedAttribute(String),

    /// A clause was started (`.` or `[`) without a name following it.
    #[error("missing name in clause of `{0}`")]
    MissingName(String),
}
