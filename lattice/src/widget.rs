//! Per-container widget handles.

use crate::component::{AnyComponent, Component};
use crate::runtime::Runtime;
use lattice_core::markers::INNER_CONTAINER_ATTR;
use lattice_core::{
    BindScope, ConfigError, Error, ListenerKey, NodeId, Registrable, Selector,
};
use serde_json::Value;
use std::sync::Arc;

enum WidgetBinding {
    /// Attached to a live container node.
    Node(NodeId),
    /// Constructed out of tree; carries its own instance.
    Detached(Arc<dyn AnyComponent>),
}

/// A handle to one component API instance.
///
/// Obtained from [`Runtime::api`], [`Widget::widget`], or handed to a
/// component's `create_listeners` hook. A widget is either bound to a
/// container node or detached; detached widgets support rendering-only use
/// and refuse refresh and listener registration.
pub struct Widget<'rt> {
    runtime: &'rt Runtime,
    template: String,
    binding: WidgetBinding,
}

impl<'rt> Widget<'rt> {
    pub(crate) fn bound(runtime: &'rt Runtime, template: String, node: NodeId) -> Self {
        Self {
            runtime,
            template,
            binding: WidgetBinding::Node(node),
        }
    }

    pub(crate) fn detached(
        runtime: &'rt Runtime,
        template: String,
        instance: Arc<dyn AnyComponent>,
    ) -> Self {
        Self {
            runtime,
            template,
            binding: WidgetBinding::Detached(instance),
        }
    }

    /// The template this widget was rendered from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The bound container node, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self.binding {
            WidgetBinding::Node(node) => Some(node),
            WidgetBinding::Detached(_) => None,
        }
    }

    /// Whether this widget is attached to a container.
    pub fn is_bound(&self) -> bool {
        self.node().is_some()
    }

    /// The component instance, downcast to its concrete API type.
    ///
    /// Returns `None` when the instance is of a different type or, for a
    /// bound widget, when the container has no instance attached.
    pub fn instance<C: Component>(&self) -> Option<Arc<C>> {
        let instance = match &self.binding {
            WidgetBinding::Node(node) => self.runtime.instance_of(*node)?,
            WidgetBinding::Detached(instance) => instance.clone(),
        };
        instance.as_any().downcast::<C>().ok()
    }

    /// Registers a delegated listener scoped to this widget's container.
    ///
    /// Registration is idempotent per `key`; declaring the same key again
    /// for the same event and selector is a no-op. Fails on a detached
    /// widget.
    pub fn connect(
        &self,
        selector: &str,
        event: &str,
        key: impl Into<ListenerKey>,
        handler: impl Fn(NodeId, &Value) + Send + Sync + 'static,
    ) -> Result<(), Error> {
        let selector: Selector = selector.parse()?;
        self.runtime.registry().register(
            self.runtime.tree(),
            self,
            event,
            &selector,
            key.into(),
            Arc::new(handler),
        )?;
        Ok(())
    }

    /// Partially re-renders this component with `data`.
    ///
    /// The template renders a fresh fragment; the fragment's inner
    /// containers are matched positionally (document order) against the
    /// inner containers under the live node, and each pair swaps content.
    /// The containers' own wrapping markup, and therefore their bound
    /// state, is untouched. A shape mismatch is a fatal configuration
    /// error and performs zero swaps.
    ///
    /// After the swaps the whole document is re-walked, so containers
    /// introduced by the new content come up bound, and this component's
    /// `create_listeners` hook runs again (a no-op for already-claimed
    /// keys).
    pub fn refresh(&self, data: &Value) -> Result<(), Error> {
        let node = self.live_node()?;
        let tree = self.runtime.tree();

        let fragment = self.runtime.render(&self.template, data)?;
        let staged = tree.graft(&fragment);

        let inner = Selector::attr(INNER_CONTAINER_ATTR);
        let current = tree.find(node, &inner);
        let rendered = tree.find(staged, &inner);
        if current.len() != rendered.len() {
            tree.remove(staged);
            return Err(ConfigError::ShapeMismatch {
                current: current.len(),
                rendered: rendered.len(),
            }
            .into());
        }

        tracing::debug!(%node, template = %self.template, swaps = current.len(), "refreshing");
        for (old, new) in current.iter().zip(&rendered) {
            tree.adopt_children(*old, *new);
        }
        tree.remove(staged);

        self.runtime.walk(tree.root())?;
        if let Some(instance) = self.runtime.instance_of(node) {
            instance.create_listeners_dyn(self)?;
        }
        Ok(())
    }

    /// The widget of the first bound descendant component rendered from
    /// `template`.
    ///
    /// With `host`, the search is rooted at the first node matching that
    /// selector under this widget's container instead. Returns `Ok(None)`
    /// when nothing matches or nothing is bound yet; that is an ordinary
    /// answer, not an error. On a detached widget the answer is always
    /// `Ok(None)`.
    pub fn widget(&self, template: &str, host: Option<&str>) -> Result<Option<Widget<'rt>>, Error> {
        let Some(node) = self.node() else {
            return Ok(None);
        };
        let scope = match host {
            Some(selector) => {
                let selector: Selector = selector.parse()?;
                match self.runtime.tree().find(node, &selector).into_iter().next() {
                    Some(host_node) => host_node,
                    None => return Ok(None),
                }
            }
            None => node,
        };
        Ok(self.runtime.widget_under(scope, template))
    }

    fn live_node(&self) -> Result<NodeId, Error> {
        match self.binding {
            WidgetBinding::Node(node) if self.runtime.tree().contains(node) => Ok(node),
            _ => Err(ConfigError::DetachedWidget(self.template.clone()).into()),
        }
    }
}

impl Registrable for Widget<'_> {
    fn bind_scope(&self) -> Result<BindScope, ConfigError> {
        match self.binding {
            WidgetBinding::Node(node) => Ok(BindScope::Node(node)),
            WidgetBinding::Detached(_) => Err(ConfigError::NotRegistrable(format!(
                "detached widget `{}`",
                self.template
            ))),
        }
    }

    fn load_state(&self) -> Option<bool> {
        self.node().map(|node| self.runtime.state(node).is_bound())
    }

    fn describe(&self) -> String {
        format!("widget `{}`", self.template)
    }
}
