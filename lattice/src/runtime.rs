//! The runtime context.
//!
//! [`Runtime`] wires the directory, buses, listener registry, and tree
//! together and owns the lifecycle walk. Everything a component or host
//! needs is reached through it; there is no ambient global state.

use crate::bus::EventBus;
use crate::component::AnyComponent;
use crate::directory::Directory;
use crate::faults::{ErrorBus, Fault};
use crate::registry::{ListenerRegistry, RootScope};
use crate::widget::Widget;
use lattice_core::markers::{
    CONTAINER_CLASS, LOADED_CLASS, REQUEST_COMPLETED_EVENT, TEMPLATE_ATTR,
};
use lattice_core::{
    Completion, ConfigError, Error, Exchange, Fragment, ListenerKey, NodeId, NodeState, Selector,
    Transport, Tree,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Builder for a [`Runtime`].
///
/// # Example
///
/// ```rust,ignore
/// let tree = Arc::new(MemTree::new());
/// let directory = Directory::new();
/// directory.register("card", card_render, || CardApi::new());
///
/// let runtime = RuntimeBuilder::new(tree.clone())
///     .directory(directory)
///     .transport(QueueTransport::new())
///     .build();
/// runtime.bootstrap()?;
/// ```
pub struct RuntimeBuilder {
    tree: Box<dyn Tree>,
    directory: Directory,
    transport: Option<Box<dyn Transport>>,
}

impl RuntimeBuilder {
    /// Starts a builder over the given tree.
    ///
    /// Hosts that keep driving the tree themselves (building the initial
    /// document, dispatching user events) pass an `Arc` clone here.
    pub fn new(tree: impl Tree + 'static) -> Self {
        Self {
            tree: Box::new(tree),
            directory: Directory::new(),
            transport: None,
        }
    }

    /// Uses a pre-populated template directory.
    pub fn directory(mut self, directory: Directory) -> Self {
        self.directory = directory;
        self
    }

    /// Registers a single template; see [`Directory::register`].
    pub fn template<R, F, C>(self, name: &str, render: R, factory: F) -> Self
    where
        R: Fn(&Value) -> Fragment + Send + Sync + 'static,
        F: Fn() -> C + Send + Sync + 'static,
        C: crate::component::Component,
    {
        self.directory.register(name, render, factory);
        self
    }

    /// Attaches the transport collaborator.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> Arc<Runtime> {
        Arc::new_cyclic(|weak| Runtime {
            weak: weak.clone(),
            tree: self.tree,
            directory: self.directory,
            bus: EventBus::new(),
            faults: ErrorBus::new(),
            registry: ListenerRegistry::new(),
            transport: self.transport,
            instances: Mutex::new(HashMap::new()),
            states: Mutex::new(HashMap::new()),
            bootstrapped: AtomicBool::new(false),
        })
    }
}

/// Options for [`Runtime::send`].
///
/// Both hooks are optional. `on_success` observes the response and decides
/// whether the completed broadcast may fire (returning `false` withholds
/// it); `suppress` is consulted afterwards and withholds the broadcast by
/// returning `true`.
#[derive(Default)]
pub struct SendOptions {
    on_success: Option<Box<dyn Fn(&Value) -> bool + Send + Sync>>,
    suppress: Option<Box<dyn Fn(&Value) -> bool + Send + Sync>>,
}

impl SendOptions {
    /// Options with no hooks: every successful exchange broadcasts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the success hook.
    pub fn on_success(mut self, hook: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    /// Installs the suppression hook.
    pub fn suppress(mut self, hook: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.suppress = Some(Box::new(hook));
        self
    }
}

/// The component runtime.
///
/// Construction goes through [`RuntimeBuilder`]; the result lives in an
/// `Arc` so bus handlers and transport completions can hold a weak
/// reference back into it. All operations are synchronous and run to
/// completion on the calling thread.
pub struct Runtime {
    weak: Weak<Runtime>,
    tree: Box<dyn Tree>,
    directory: Directory,
    bus: EventBus,
    faults: ErrorBus,
    registry: ListenerRegistry,
    transport: Option<Box<dyn Transport>>,
    instances: Mutex<HashMap<NodeId, Arc<dyn AnyComponent>>>,
    states: Mutex<HashMap<NodeId, NodeState>>,
    bootstrapped: AtomicBool,
}

impl Runtime {
    /// The tree this runtime drives.
    pub fn tree(&self) -> &dyn Tree {
        self.tree.as_ref()
    }

    /// The error classification bus.
    pub fn faults(&self) -> &ErrorBus {
        &self.faults
    }

    /// The host-ready entry point: performs the initial walk of the whole
    /// document exactly once. Later calls are no-ops; after bootstrap the
    /// walk re-runs only through [`Widget::refresh`] or an explicit
    /// [`walk`](Runtime::walk).
    pub fn bootstrap(&self) -> Result<(), Error> {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            tracing::debug!("bootstrap already ran; skipping");
            return Ok(());
        }
        self.walk(self.tree.root())
    }

    /// Discovers and initializes containers under `root`.
    ///
    /// Containers are processed descendants-first, so by the time a
    /// component's `create_listeners` hook runs, every container below it
    /// already exposes a live API. Processing a container is idempotent:
    /// a `Bound` node is skipped outright.
    pub fn walk(&self, root: NodeId) -> Result<(), Error> {
        let containers = self.tree.find(root, &Selector::class(CONTAINER_CLASS));
        // Reverse document order puts every descendant before its ancestor.
        for node in containers.into_iter().rev() {
            self.bind_container(node)?;
        }
        Ok(())
    }

    fn bind_container(&self, node: NodeId) -> Result<(), Error> {
        if self.state(node).is_bound() {
            return Ok(());
        }
        let Some(template) = self.tree.attr(node, TEMPLATE_ATTR) else {
            tracing::warn!(%node, "container carries no template name; leaving unbound");
            return Ok(());
        };
        let entry = self
            .directory
            .get(&template)
            .ok_or_else(|| ConfigError::UndefinedTemplate(template.clone()))?;

        let instance = (entry.factory)();
        self.lock_instances().insert(node, instance.clone());

        // Listener declarations run while the node is still unbound; the
        // loaded marker goes on only after they succeed.
        let widget = Widget::bound(self, template.clone(), node);
        instance.create_listeners_dyn(&widget)?;

        self.lock_states().insert(node, NodeState::Bound);
        self.tree.add_class(node, LOADED_CLASS);
        tracing::debug!(%node, template = %template, "component bound");
        Ok(())
    }

    /// The widget for the first bound container rendered from `name`.
    ///
    /// When no bound container carries the template, a detached instance is
    /// constructed instead: it supports out-of-tree use such as pure string
    /// rendering, but cannot refresh or register listeners.
    pub fn api(&self, name: &str) -> Result<Widget<'_>, Error> {
        let carriers = self
            .tree
            .find(self.tree.root(), &Selector::attr_eq(TEMPLATE_ATTR, name));
        for node in carriers {
            if self.state(node).is_bound() {
                return Ok(Widget::bound(self, name.to_owned(), node));
            }
        }
        let entry = self
            .directory
            .get(name)
            .ok_or_else(|| ConfigError::UndefinedTemplate(name.to_owned()))?;
        Ok(Widget::detached(self, name.to_owned(), (entry.factory)()))
    }

    /// Renders `name` with `data` without touching the tree.
    pub fn render(&self, name: &str, data: &Value) -> Result<Fragment, Error> {
        let entry = self
            .directory
            .get(name)
            .ok_or_else(|| ConfigError::UndefinedTemplate(name.to_owned()))?;
        Ok((entry.render)(data))
    }

    /// Subscribes `handler` on the event bus.
    ///
    /// Pass `Some(node)` to tie delivery to that node's liveness; `None`
    /// always delivers.
    pub fn subscribe(
        &self,
        event: &str,
        subscriber: Option<NodeId>,
        handler: impl Fn(&Value) + Send + Sync + 'static,
    ) {
        self.bus.subscribe(event, subscriber, Arc::new(handler));
    }

    /// Broadcasts `data` under `event` to every live subscriber.
    pub fn broadcast(&self, event: &str, data: &Value) {
        self.bus
            .broadcast(event, data, &|node| self.tree.contains(node));
    }

    /// Registers a tree-wide delegated listener: `handler` runs for every
    /// `event` fired on a node matching `selector`, anywhere under the
    /// root.
    pub fn connect(
        &self,
        selector: &str,
        event: &str,
        key: impl Into<ListenerKey>,
        handler: impl Fn(NodeId, &Value) + Send + Sync + 'static,
    ) -> Result<(), Error> {
        let selector: Selector = selector.parse()?;
        self.registry.register(
            self.tree.as_ref(),
            &RootScope,
            event,
            &selector,
            key.into(),
            Arc::new(handler),
        )?;
        Ok(())
    }

    /// Issues a transport exchange.
    ///
    /// Returns immediately after dispatch. On completion: a failure is
    /// raised on the error bus as an `"UnknownError"` fault, never as a
    /// fatal error; a success runs the [`SendOptions`] hooks and then
    /// broadcasts the response under `"XHR_Request_Completed"` unless a
    /// hook withheld it.
    pub fn send(&self, endpoint: &str, payload: &Value, options: SendOptions) -> Result<(), Error> {
        let transport = self
            .transport
            .as_ref()
            .ok_or(ConfigError::NoTransport)?;
        // A completion arriving after the runtime is dropped is a no-op.
        let runtime = self.weak.clone();
        let complete: Completion = Box::new(move |exchange| {
            let Some(runtime) = runtime.upgrade() else {
                return;
            };
            match exchange {
                Exchange::Failure(data) => runtime.faults.raise(&Fault::unknown(data)),
                Exchange::Success(data) => {
                    let mut emit = match &options.on_success {
                        Some(hook) => hook(&data),
                        None => true,
                    };
                    if emit {
                        if let Some(hook) = &options.suppress {
                            emit = !hook(&data);
                        }
                    }
                    if emit {
                        runtime.broadcast(REQUEST_COMPLETED_EVENT, &data);
                    }
                }
            }
        });
        tracing::debug!(endpoint, "dispatching transport exchange");
        transport.dispatch(endpoint, payload, complete);
        Ok(())
    }

    fn lock_instances(&self) -> MutexGuard<'_, HashMap<NodeId, Arc<dyn AnyComponent>>> {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_states(&self) -> MutexGuard<'_, HashMap<NodeId, NodeState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self, node: NodeId) -> NodeState {
        self.lock_states().get(&node).copied().unwrap_or_default()
    }

    pub(crate) fn instance_of(&self, node: NodeId) -> Option<Arc<dyn AnyComponent>> {
        self.lock_instances().get(&node).cloned()
    }

    pub(crate) fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    /// First bound widget rendered from `template` under `scope`.
    pub(crate) fn widget_under(&self, scope: NodeId, template: &str) -> Option<Widget<'_>> {
        self.tree
            .find(scope, &Selector::attr_eq(TEMPLATE_ATTR, template))
            .into_iter()
            .find(|node| self.state(*node).is_bound())
            .map(|node| Widget::bound(self, template.to_owned(), node))
    }
}
