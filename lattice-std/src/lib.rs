//! # lattice-std
//!
//! Standard implementations for the Lattice component runtime.
//!
//! This crate provides:
//! - **Document tree**: [`MemTree`], an arena-backed [`Tree`] with
//!   delegated event dispatch
//! - **Transport**: [`QueueTransport`], a manually-pumped exchange queue
//! - **Testing**: payload recorders and invocation counters
//!
//! [`Tree`]: lattice_core::Tree
//! [`MemTree`]: tree::MemTree
//! [`QueueTransport`]: transport::QueueTransport

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use lattice_core;

// Modules
pub mod testing;
pub mod transport;
pub mod tree;
