//! Listener-registration capability.

use crate::error::ConfigError;
use crate::node::NodeId;
use std::borrow::Cow;
use std::fmt;

/// Where a delegated listener is anchored.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BindScope {
    /// The tree-wide root: the listener sees matching events anywhere in the
    /// document.
    Root,
    /// A specific container node: the listener only sees events from that
    /// container's descendants.
    Node(NodeId),
}

/// A value listeners can be registered against.
///
/// The registration capability is part of the type, checked at compile time;
/// the remaining runtime failure is a value whose scope cannot currently be
/// resolved (for example a widget with no live container), surfaced as a
/// [`ConfigError::NotRegistrable`].
pub trait Registrable {
    /// The scope listeners registered through this value are anchored to.
    fn bind_scope(&self) -> Result<BindScope, ConfigError>;

    /// Load state of the anchoring container; `None` when the scope is the
    /// tree-wide root.
    fn load_state(&self) -> Option<bool>;

    /// Name used in configuration errors and log lines.
    fn describe(&self) -> String;
}

/// Stable identity for a registered handler.
///
/// Registering a second handler under a key already recorded for the same
/// `(scope, event, selector)` is skipped, which makes repeated listener
/// declaration idempotent. Callers that want a re-registration to take
/// effect pass a different key.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ListenerKey(Cow<'static, str>);

impl ListenerKey {
    /// Creates a key from any string-ish value.
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ListenerKey {
    fn from(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }
}

impl From<String> for ListenerKey {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}

impl fmt::Display for ListenerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
