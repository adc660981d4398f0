//! Manually-pumped transport.

use lattice_core::{Completion, Exchange, Transport};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

struct Pending {
    endpoint: String,
    payload: Value,
    complete: Completion,
}

/// A transport that queues dispatches for explicit completion.
///
/// Nothing happens until the host (or a test) pumps the queue with
/// [`complete_next`](QueueTransport::complete_next), which makes exchange
/// ordering fully deterministic.
#[derive(Default)]
pub struct QueueTransport {
    pending: Mutex<VecDeque<Pending>>,
}

impl QueueTransport {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of exchanges waiting for completion.
    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    /// Endpoints of the waiting exchanges, oldest first.
    pub fn pending_endpoints(&self) -> Vec<String> {
        self.lock().iter().map(|p| p.endpoint.clone()).collect()
    }

    /// Payload of the oldest waiting exchange.
    pub fn peek_payload(&self) -> Option<Value> {
        self.lock().front().map(|p| p.payload.clone())
    }

    /// Completes the oldest waiting exchange with `outcome`.
    ///
    /// The completion callback runs synchronously on the calling thread,
    /// re-entering the runtime the exchange came from. Returns `false` when
    /// the queue was empty.
    pub fn complete_next(&self, outcome: Exchange) -> bool {
        let next = self.lock().pop_front();
        match next {
            Some(pending) => {
                (pending.complete)(outcome);
                true
            }
            None => false,
        }
    }
}

impl Transport for QueueTransport {
    fn dispatch(&self, endpoint: &str, payload: &Value, complete: Completion) {
        self.lock().push_back(Pending {
            endpoint: endpoint.to_owned(),
            payload: payload.clone(),
            complete,
        });
    }
}
