//! Testing utilities for Lattice.
//!
//! This module provides probes for asserting on bus deliveries and
//! delegated-event dispatch without writing bespoke closures in every test.
//!
//! - [`Recorder`]: records every payload a handler receives
//! - [`Counter`]: counts handler invocations

use lattice_core::NodeId;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records every payload a handler receives.
///
/// Clones share the same backing store, so a test can hand one clone to the
/// runtime and keep another for assertions.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = Recorder::new();
/// runtime.subscribe("ping", None, recorder.callback());
///
/// runtime.broadcast("ping", &json!({"x": 1}));
/// assert_eq!(recorder.count(), 1);
/// ```
#[derive(Default)]
pub struct Recorder {
    values: Arc<Mutex<Vec<Value>>>,
}

impl Recorder {
    /// A recorder with an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clone of the recorded payloads, oldest first.
    pub fn values(&self) -> Vec<Value> {
        self.values.lock().unwrap().clone()
    }

    /// Number of recorded payloads.
    pub fn count(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    /// Clears the store.
    pub fn clear(&self) {
        self.values.lock().unwrap().clear();
    }

    /// A bus-shaped callback recording into this store.
    pub fn callback(&self) -> impl Fn(&Value) + Send + Sync + 'static {
        let values = self.values.clone();
        move |data: &Value| values.lock().unwrap().push(data.clone())
    }

    /// A delegation-shaped callback recording into this store. The firing
    /// node is discarded; only the payload is kept.
    pub fn bound(&self) -> impl Fn(NodeId, &Value) + Send + Sync + 'static {
        let values = self.values.clone();
        move |_node: NodeId, data: &Value| values.lock().unwrap().push(data.clone())
    }
}

impl Clone for Recorder {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
        }
    }
}

/// Counts handler invocations.
#[derive(Default)]
pub struct Counter {
    count: Arc<AtomicUsize>,
}

impl Counter {
    /// A counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Resets the count to zero.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }

    /// A bus-shaped callback incrementing this counter.
    pub fn callback(&self) -> impl Fn(&Value) + Send + Sync + 'static {
        let count = self.count.clone();
        move |_data: &Value| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// A delegation-shaped callback incrementing this counter.
    pub fn bound(&self) -> impl Fn(NodeId, &Value) + Send + Sync + 'static {
        let count = self.count.clone();
        move |_node: NodeId, _data: &Value| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Clone for Counter {
    fn clone(&self) -> Self {
        Self {
            count: self.count.clone(),
        }
    }
}
