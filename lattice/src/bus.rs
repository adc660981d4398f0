//! Synchronous broadcast bus.
//!
//! The lowest-level primitive: per-event ordered subscriber lists with a
//! liveness filter. Deliberately without deduplication; making repeated
//! registration idempotent is the listener registry's job, layered on top
//! for delegated bindings only.

use lattice_core::NodeId;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A handler subscribed on the bus.
pub type BusHandler = Arc<dyn Fn(&Value) + Send + Sync>;

struct Subscription {
    subscriber: Option<NodeId>,
    handler: BusHandler,
}

/// Ordered, append-only pub/sub with per-subscriber liveness filtering.
///
/// Subscription lists are append-only and delivery follows registration
/// order. Broadcast is fully synchronous: it returns only after every live
/// subscriber's handler has returned. A panicking handler is not caught; it
/// propagates to whatever triggered the broadcast.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Mutex<HashMap<String, Vec<Subscription>>>,
}

impl EventBus {
    /// An empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Subscription>>> {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a subscription for `event`.
    ///
    /// No deduplication: subscribing the same handler twice produces two
    /// deliveries per broadcast. A `subscriber` of `None` means "always
    /// deliver"; handlers tied to a node are skipped once the node leaves
    /// the live tree.
    pub fn subscribe(&self, event: &str, subscriber: Option<NodeId>, handler: BusHandler) {
        self.lock()
            .entry(event.to_owned())
            .or_default()
            .push(Subscription { subscriber, handler });
    }

    /// Synchronously fans `data` out to every live subscriber of `event`.
    ///
    /// No subscribers is a no-op, not an error. The subscriber list is
    /// snapshotted before any handler runs, so a handler may subscribe
    /// (taking effect from the next broadcast) without deadlocking.
    pub fn broadcast(&self, event: &str, data: &Value, live: &dyn Fn(NodeId) -> bool) {
        let snapshot: Vec<(Option<NodeId>, BusHandler)> = {
            let subscriptions = self.lock();
            match subscriptions.get(event) {
                Some(subs) => subs
                    .iter()
                    .map(|s| (s.subscriber, s.handler.clone()))
                    .collect(),
                None => return,
            }
        };
        let mut skipped = 0usize;
        for (subscriber, handler) in &snapshot {
            if let Some(node) = subscriber {
                if !live(*node) {
                    skipped += 1;
                    continue;
                }
            }
            handler(data);
        }
        if skipped > 0 {
            tracing::warn!(event, skipped, "skipped stale subscribers during broadcast");
        }
        tracing::trace!(event, delivered = snapshot.len() - skipped, "broadcast complete");
    }
}
