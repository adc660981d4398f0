//! The transport collaborator boundary.

use serde_json::Value;

/// Outcome of a transport exchange.
#[derive(Clone, Debug)]
pub enum Exchange {
    /// The endpoint answered; the payload is the response data.
    Success(Value),
    /// The exchange failed at the transport layer; the payload describes the
    /// failure.
    Failure(Value),
}

/// Completion callback handed to a transport with each dispatch.
pub type Completion = Box<dyn FnOnce(Exchange) + Send>;

/// An asynchronous request/response channel to a remote endpoint.
///
/// `dispatch` returns immediately; the transport invokes `complete` from the
/// host loop once the exchange finishes, at which point runtime operations
/// may run again. The runtime never blocks on a dispatch and has no way to
/// cancel one. Retries and timeouts are the transport's own business.
pub trait Transport: Send + Sync {
    /// Issues a request and registers its completion callback.
    fn dispatch(&self, endpoint: &str, payload: &Value, complete: Completion);
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn dispatch(&self, endpoint: &str, payload: &Value, complete: Completion) {
        (**self).dispatch(endpoint, payload, complete);
    }
}
