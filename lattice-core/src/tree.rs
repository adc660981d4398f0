//! The document-tree collaborator boundary.
//!
//! The runtime never walks or mutates document structure directly; every
//! structural operation goes through this trait. Implementations supply the
//! query primitive, attribute access, content replacement, and the native
//! event-delegation binding the listener registry delegates to.

use crate::fragment::Fragment;
use crate::node::NodeId;
use crate::selector::Selector;
use serde_json::Value;
use std::sync::Arc;

/// A handler bound through native event delegation.
///
/// Receives the node the event fired on and the event payload.
pub type BoundHandler = Arc<dyn Fn(NodeId, &Value) + Send + Sync>;

/// The host document tree.
///
/// All operations are synchronous. Implementations must return `find`
/// results in document order, and must keep delegated bindings live: a
/// binding matches whatever descendants satisfy its selector at dispatch
/// time, not a snapshot taken at registration.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot host a component runtime",
    label = "missing `Tree` implementation",
    note = "The runtime drives the document through the `Tree` trait; implement it or wrap `MemTree`."
)]
pub trait Tree: Send + Sync {
    /// The root of the live document.
    fn root(&self) -> NodeId;

    /// Whether `node` is currently attached under the root.
    ///
    /// Detached grafts and removed nodes report `false`; this is the
    /// liveness check the event bus filters subscribers with.
    fn contains(&self, node: NodeId) -> bool;

    /// The value of attribute `name` on `node`, if present.
    fn attr(&self, node: NodeId, name: &str) -> Option<String>;

    /// Sets attribute `name` on `node`.
    fn set_attr(&self, node: NodeId, name: &str, value: &str);

    /// Whether `node` carries the given class.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Adds a class to `node`. Adding a class twice is a no-op.
    fn add_class(&self, node: NodeId, class: &str);

    /// Descendants of `scope` matching `selector`, in document order.
    /// `scope` itself is never included.
    fn find(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId>;

    /// Builds `fragment` as a detached subtree and returns its root.
    ///
    /// The grafted nodes are queryable through [`find`](Tree::find) but not
    /// [contained](Tree::contains) until their content is adopted into the
    /// live document.
    fn graft(&self, fragment: &Fragment) -> NodeId;

    /// Replaces the children of `target` with the children of `source`.
    ///
    /// `target`'s own markup (tag, classes, attributes) is untouched;
    /// `target`'s previous children are removed and `source` is left
    /// childless.
    fn adopt_children(&self, target: NodeId, source: NodeId);

    /// Removes `node` and its subtree from the tree.
    fn remove(&self, node: NodeId);

    /// Registers a delegated listener.
    ///
    /// `handler` runs whenever an event named `event` fires on a node that
    /// is, at dispatch time, a descendant of `scope` matching `selector`.
    fn bind(&self, scope: NodeId, event: &str, selector: &Selector, handler: BoundHandler);
}

impl<T: Tree + ?Sized> Tree for Arc<T> {
    fn root(&self) -> NodeId {
        (**self).root()
    }

    fn contains(&self, node: NodeId) -> bool {
        (**self).contains(node)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        (**self).attr(node, name)
    }

    fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        (**self).set_attr(node, name, value);
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        (**self).has_class(node, class)
    }

    fn add_class(&self, node: NodeId, class: &str) {
        (**self).add_class(node, class);
    }

    fn find(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        (**self).find(scope, selector)
    }

    fn graft(&self, fragment: &Fragment) -> NodeId {
        (**self).graft(fragment)
    }

    fn adopt_children(&self, target: NodeId, source: NodeId) {
        (**self).adopt_children(target, source);
    }

    fn remove(&self, node: NodeId) {
        (**self).remove(node);
    }

    fn bind(&self, scope: NodeId, event: &str, selector: &Selector, handler: BoundHandler) {
        (**self).bind(scope, event, selector, handler);
    }
}
