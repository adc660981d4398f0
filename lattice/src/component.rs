//! Component API instances.

use crate::widget::Widget;
use lattice_core::Error;
use std::any::Any;
use std::sync::Arc;

/// The API object attached to a container by lifecycle initialization.
///
/// A template's factory returns one of these per container. The type is the
/// component's public surface: custom methods are reached by downcasting
/// through [`Widget::instance`]. The framework calls
/// [`create_listeners`](Component::create_listeners) once when the
/// container is first bound (before it is marked loaded) and again after
/// every refresh; declarations there are idempotent because the listener
/// registry dedupes on key.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a component API",
    label = "missing `Component` implementation",
    note = "Template factories must return a type implementing `Component`."
)]
pub trait Component: Send + Sync + 'static {
    /// Declares the delegated listeners for this component's container.
    ///
    /// The default declares none.
    fn create_listeners(&self, widget: &Widget<'_>) -> Result<(), Error> {
        let _ = widget;
        Ok(())
    }
}

/// A component with no API of its own; useful for purely presentational
/// templates.
impl Component for () {}

/// Object-safe carrier for stored instances.
///
/// Splitting this from [`Component`] keeps the public trait free of
/// downcasting plumbing while letting the runtime hold instances uniformly.
pub(crate) trait AnyComponent: Send + Sync {
    fn create_listeners_dyn(&self, widget: &Widget<'_>) -> Result<(), Error>;
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<C: Component> AnyComponent for C {
    fn create_listeners_dyn(&self, widget: &Widget<'_>) -> Result<(), Error> {
        self.create_listeners(widget)
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
