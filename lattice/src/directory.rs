//! Template directory.

use crate::component::{AnyComponent, Component};
use lattice_core::Fragment;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Renders template data into a fragment.
pub type RenderFn = Arc<dyn Fn(&Value) -> Fragment + Send + Sync>;

pub(crate) type Factory = Arc<dyn Fn() -> Arc<dyn AnyComponent> + Send + Sync>;

#[derive(Clone)]
pub(crate) struct TemplateEntry {
    pub(crate) render: RenderFn,
    pub(crate) factory: Factory,
}

/// Maps template names to their render function and component factory.
///
/// Populated by the host at startup and handed to the runtime; entries are
/// never removed. Registering a name twice silently overwrites the earlier
/// entry (last registration wins).
#[derive(Default)]
pub struct Directory {
    templates: Mutex<HashMap<String, TemplateEntry>>,
}

impl Directory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, TemplateEntry>> {
        self.templates.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a template.
    ///
    /// `render` turns template data into a fragment; `factory` builds the
    /// API instance attached to each container rendered from this template.
    /// Components with no API can use `|| ()`.
    pub fn register<R, F, C>(&self, name: &str, render: R, factory: F)
    where
        R: Fn(&Value) -> Fragment + Send + Sync + 'static,
        F: Fn() -> C + Send + Sync + 'static,
        C: Component,
    {
        let entry = TemplateEntry {
            render: Arc::new(render),
            factory: Arc::new(move || Arc::new(factory()) as Arc<dyn AnyComponent>),
        };
        if self.lock().insert(name.to_owned(), entry).is_some() {
            tracing::debug!(template = name, "template re-registered; previous entry replaced");
        }
    }

    /// Whether `name` has an entry.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<TemplateEntry> {
        self.lock().get(name).cloned()
    }
}
