//! # lattice - Component Lifecycle Runtime
//!
//! `lattice` manages hierarchical UI components over a document-like tree
//! of nested, named containers. Containers discovered in the tree are
//! lazily and idempotently bound to API instances (descendants first), a
//! synchronous broadcast bus fans events out with per-subscriber liveness
//! checks, and a partial re-render protocol swaps only a component's inner
//! containers while everything around them keeps its state.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lattice::{Component, Fragment, MemTree, RuntimeBuilder, Widget};
//!
//! struct CardApi;
//! impl Component for CardApi {
//!     fn create_listeners(&self, widget: &Widget<'_>) -> Result<(), lattice::Error> {
//!         widget.connect("button.reload", "click", "card-reload", |_, _| { /* ... */ })
//!     }
//! }
//!
//! let tree = std::sync::Arc::new(MemTree::new());
//! // ... build the document under tree.root() ...
//! let runtime = RuntimeBuilder::new(tree.clone())
//!     .template("card", |data| Fragment::new("div").text(data["title"].to_string()), || CardApi)
//!     .build();
//! runtime.bootstrap()?;
//! ```
//!
//! ## Layers
//!
//! - [`EventBus`] - the raw synchronous fan-out primitive; append-only, no
//!   dedup
//! - [`ErrorBus`] - typed error classification (known kinds vs catch-all)
//!   layered on the bus
//! - [`ListenerRegistry`] - idempotent delegated registration, keyed on
//!   [`ListenerKey`]
//! - [`Directory`] + [`Runtime`] - template registration and the lifecycle
//!   walk
//! - [`Widget`] - the per-container handle: `refresh`, `connect`, `widget`

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod bus;
mod component;
mod directory;
mod faults;
mod registry;
mod runtime;
mod widget;

pub use bus::{BusHandler, EventBus};
pub use component::Component;
pub use directory::{Directory, RenderFn};
pub use faults::{ErrorBus, Fault};
pub use registry::ListenerRegistry;
pub use runtime::{Runtime, RuntimeBuilder, SendOptions};
pub use widget::Widget;

pub use lattice_core::{
    BindScope, BoundHandler, BoxError, Completion, ConfigError, Error, Exchange, Fragment,
    ListenerKey, NodeId, NodeState, NodeView, Registrable, Selector, SelectorError, Transport,
    Tree, markers,
};

pub use lattice_std::transport::QueueTransport;
pub use lattice_std::tree::MemTree;

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use lattice_std::testing::*;
}

/// Prelude module - common imports for Lattice hosts and components.
pub mod prelude {
    pub use crate::{
        Component, Directory, Error, Fragment, MemTree, NodeId, Runtime, RuntimeBuilder, Selector,
        Tree, Widget,
    };
}
