//! Error classification bus.
//!
//! Layered on [`EventBus`]: application errors carry a string kind; kinds
//! with at least one dedicated handler are "known", everything else lands
//! in a single catch-all.

use crate::bus::{BusHandler, EventBus};
use lattice_core::markers::{CATCH_ALL, UNKNOWN_FAULT};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// An application-level error routed through the [`ErrorBus`].
#[derive(Clone, Debug)]
pub struct Fault {
    /// Classification key, matched against handler registrations.
    pub kind: String,
    /// Error payload handed to whichever handlers react.
    pub data: Value,
}

impl Fault {
    /// A fault of the given kind.
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }

    /// A generic transport-failure fault.
    pub fn unknown(data: Value) -> Self {
        Self::new(UNKNOWN_FAULT, data)
    }
}

/// Classifying fan-out for [`Fault`]s.
///
/// One per runtime. Handler registration is irrevocable: there is no
/// unregister operation, and a kind that has ever had a dedicated handler
/// never reaches the catch-all again.
#[derive(Default)]
pub struct ErrorBus {
    bus: EventBus,
    known: Mutex<HashSet<String>>,
    catch_all: Mutex<Option<BusHandler>>,
}

impl ErrorBus {
    /// A bus with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_known(&self) -> MutexGuard<'_, HashSet<String>> {
        self.known.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a handler for `kind`.
    ///
    /// The reserved kind `"*"` installs the catch-all, replacing any
    /// previous one; at most one catch-all exists. Any other kind becomes
    /// known (idempotently) and gains a dedicated subscription; every
    /// dedicated handler for a kind runs on each raise of that kind.
    pub fn on(&self, kind: &str, handler: BusHandler) {
        if kind == CATCH_ALL {
            *self
                .catch_all
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(handler);
            return;
        }
        self.lock_known().insert(kind.to_owned());
        self.bus.subscribe(kind, None, handler);
    }

    /// Raises `fault`, delivering synchronously.
    ///
    /// Every handler dedicated to the fault's kind runs first (possibly
    /// zero). Then, independently, the catch-all runs iff the kind is not
    /// known at raise time. Both checks consult registrations made up to
    /// this moment only.
    pub fn raise(&self, fault: &Fault) {
        tracing::debug!(kind = %fault.kind, "raising fault");
        self.bus.broadcast(&fault.kind, &fault.data, &|_| true);
        if self.is_known(&fault.kind) {
            return;
        }
        let catch_all = self
            .catch_all
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = catch_all {
            handler(&fault.data);
        }
    }

    /// Whether `kind` has ever had a dedicated handler.
    pub fn is_known(&self, kind: &str) -> bool {
        self.lock_known().contains(kind)
    }
}
