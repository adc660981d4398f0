//! Deduplicated listener registration.
//!
//! Sits between callers and the tree's native event-delegation primitive.
//! The bus below it never dedupes; this layer does, keyed on an explicit
//! [`ListenerKey`] per `(scope, event ++ selector)`.

use lattice_core::{
    BindScope, BoundHandler, ConfigError, Error, ListenerKey, Registrable, Selector, Tree,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The tree-wide registration scope.
pub(crate) struct RootScope;

impl Registrable for RootScope {
    fn bind_scope(&self) -> Result<BindScope, ConfigError> {
        Ok(BindScope::Root)
    }

    fn load_state(&self) -> Option<bool> {
        None
    }

    fn describe(&self) -> String {
        "tree root".to_owned()
    }
}

/// Keeps delegated registrations idempotent.
///
/// Records are never removed: a key stays claimed for the life of the
/// runtime, so re-running a component's listener declarations (walk after
/// walk, refresh after refresh) silently lands on the existing binding.
#[derive(Default)]
pub struct ListenerRegistry {
    seen: Mutex<HashMap<(BindScope, String), Vec<ListenerKey>>>,
}

impl ListenerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(BindScope, String), Vec<ListenerKey>>> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `handler` for `event` on descendants of `target` matching
    /// `selector`.
    ///
    /// Returns `Ok(true)` when a native binding was created and `Ok(false)`
    /// when `key` was already recorded for this `(scope, event, selector)`
    /// and registration was skipped. Duplicates are skipped for every scope,
    /// loaded or not, so repeated declaration always nets a single binding.
    /// Fails with a configuration error when `target` has no resolvable
    /// scope.
    pub fn register(
        &self,
        tree: &dyn Tree,
        target: &dyn Registrable,
        event: &str,
        selector: &Selector,
        key: ListenerKey,
        handler: BoundHandler,
    ) -> Result<bool, Error> {
        let scope = target.bind_scope()?;
        let dedup = (scope, format!("{event}{selector}"));
        {
            let mut seen = self.lock();
            let keys = seen.entry(dedup).or_default();
            if keys.contains(&key) {
                tracing::trace!(
                    target = %target.describe(),
                    event,
                    %selector,
                    %key,
                    loaded = ?target.load_state(),
                    "duplicate listener key; skipping registration"
                );
                return Ok(false);
            }
            keys.push(key.clone());
        }
        let anchor = match scope {
            BindScope::Root => tree.root(),
            BindScope::Node(node) => node,
        };
        tracing::trace!(target = %target.describe(), event, %selector, %key, "binding listener");
        tree.bind(anchor, event, selector, handler);
        Ok(true)
    }
}
