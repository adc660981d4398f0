//! # lattice-core
//!
//! Core traits and types for the Lattice component runtime.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! tree backends and host integrations that don't need the full `lattice`
//! runtime.
//!
//! # Boundaries
//!
//! Lattice manages component lifecycles over a document-like tree it does
//! not own. This crate defines the seams to everything the runtime treats
//! as a collaborator:
//!
//! - [`Tree`] - the document: queries, attributes, content replacement,
//!   native event delegation, and the liveness check
//! - [`Transport`] - the request/response channel to a remote endpoint
//! - [`Fragment`] - structured render output, grafted into a tree or
//!   serialized to markup
//! - [`Selector`] - the `tag.class[attr=value]` conjunctions used for
//!   container discovery and event delegation
//! - [`Registrable`] / [`ListenerKey`] - the listener-registration
//!   capability and the stable handler identity dedup is keyed on
//! - [`markers`] - the bit-exact string conventions shared with template
//!   output
//!
//! # Error Types
//!
//! - [`Error`] - Top-level error type
//! - [`ConfigError`] - Wiring mistakes, fatal to the current call chain
//! - [`SelectorError`] - Selector parse failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod capability;
mod error;
mod fragment;
pub mod markers;
mod node;
mod selector;
mod transport;
mod tree;

pub use capability::{BindScope, ListenerKey, Registrable};
pub use error::{BoxError, ConfigError, Error, SelectorError};
pub use fragment::Fragment;
pub use node::{NodeId, NodeState};
pub use selector::{NodeView, Selector};
pub use transport::{Completion, Exchange, Transport};
pub use tree::{BoundHandler, Tree};
