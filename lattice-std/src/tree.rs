//! In-memory document tree.
//!
//! [`MemTree`] is the standard [`Tree`] backend: an arena of nodes with
//! classes, attributes, and delegated event bindings. Hosts build the
//! initial document with [`MemTree::append`] and feed user events in
//! through [`MemTree::dispatch`].

use lattice_core::{BoundHandler, Fragment, NodeId, NodeView, Selector, Tree};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

struct MemNode {
    tag: String,
    classes: Vec<String>,
    attrs: HashMap<String, String>,
    text: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
    alive: bool,
}

impl MemNode {
    fn from_fragment(fragment: &Fragment, parent: Option<usize>) -> Self {
        Self {
            tag: fragment.tag_name().to_owned(),
            classes: fragment.classes().to_vec(),
            attrs: fragment.attrs().iter().cloned().collect(),
            text: fragment.text_content().map(str::to_owned),
            parent,
            children: Vec::new(),
            alive: true,
        }
    }
}

struct Arena {
    nodes: Vec<MemNode>,
    root: usize,
}

impl Arena {
    fn view(&self, idx: usize) -> NodeView<'_> {
        let node = &self.nodes[idx];
        NodeView {
            tag: &node.tag,
            classes: &node.classes,
            attrs: &node.attrs,
        }
    }

    fn is_attached(&self, idx: usize) -> bool {
        let mut cursor = idx;
        loop {
            if !self.nodes[cursor].alive {
                return false;
            }
            if cursor == self.root {
                return true;
            }
            match self.nodes[cursor].parent {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }

    /// Strict ancestry: a node is not its own ancestor.
    fn is_ancestor(&self, ancestor: usize, descendant: usize) -> bool {
        let mut cursor = self.nodes[descendant].parent;
        while let Some(idx) = cursor {
            if idx == ancestor {
                return true;
            }
            cursor = self.nodes[idx].parent;
        }
        false
    }

    fn build(&mut self, fragment: &Fragment, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(MemNode::from_fragment(fragment, parent));
        for child in fragment.children() {
            let child_idx = self.build(child, Some(idx));
            self.nodes[idx].children.push(child_idx);
        }
        idx
    }

    fn collect(&self, scope: usize, selector: &Selector, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[scope].children {
            if self.nodes[child].alive {
                if selector.matches(&self.view(child)) {
                    out.push(NodeId(child as u64));
                }
                self.collect(child, selector, out);
            }
        }
    }

    fn kill_subtree(&mut self, idx: usize) {
        self.nodes[idx].alive = false;
        for child in self.nodes[idx].children.clone() {
            self.kill_subtree(child);
        }
    }
}

struct Binding {
    scope: usize,
    event: String,
    selector: Selector,
    handler: BoundHandler,
}

/// An arena-backed document tree with delegated event dispatch.
///
/// Node ids index the arena and are never reused; removed nodes keep their
/// slot but report dead on every liveness path. All methods take `&self`;
/// hosts typically share the tree as an `Arc<MemTree>` between themselves
/// and the runtime.
pub struct MemTree {
    arena: Mutex<Arena>,
    bindings: Mutex<Vec<Binding>>,
}

impl MemTree {
    /// An empty document with a single `document` root node.
    pub fn new() -> Self {
        let root = MemNode {
            tag: "document".to_owned(),
            classes: Vec::new(),
            attrs: HashMap::new(),
            text: None,
            parent: None,
            children: Vec::new(),
            alive: true,
        };
        Self {
            arena: Mutex::new(Arena {
                nodes: vec![root],
                root: 0,
            }),
            bindings: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Arena> {
        self.arena.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_bindings(&self) -> MutexGuard<'_, Vec<Binding>> {
        self.bindings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Builds `fragment` as a subtree attached under `parent` and returns
    /// its root id.
    ///
    /// An unknown `parent` leaves the subtree detached instead of panicking.
    pub fn append(&self, parent: NodeId, fragment: &Fragment) -> NodeId {
        let mut arena = self.lock();
        let parent_idx = parent.0 as usize;
        let known = parent_idx < arena.nodes.len();
        let idx = arena.build(fragment, known.then_some(parent_idx));
        if known {
            arena.nodes[parent_idx].children.push(idx);
        }
        NodeId(idx as u64)
    }

    /// Text content of a node, if any. Useful for asserting on swapped
    /// content.
    pub fn text(&self, node: NodeId) -> Option<String> {
        self.lock().nodes.get(node.0 as usize)?.text.clone()
    }

    /// Number of delegated bindings registered so far.
    pub fn binding_count(&self) -> usize {
        self.lock_bindings().len()
    }

    /// Fires an event on `target`, running every delegated binding whose
    /// scope is an ancestor of `target` and whose selector matches it.
    ///
    /// Handlers run synchronously in binding-registration order, after all
    /// matching decisions are made, so a handler may bind further listeners
    /// or mutate the tree without deadlocking.
    pub fn dispatch(&self, target: NodeId, event: &str, payload: &Value) {
        let hits: Vec<BoundHandler> = {
            let arena = self.lock();
            let idx = target.0 as usize;
            if idx >= arena.nodes.len() || !arena.is_attached(idx) {
                return;
            }
            let bindings = self.lock_bindings();
            bindings
                .iter()
                .filter(|b| {
                    b.event == event
                        && arena.is_ancestor(b.scope, idx)
                        && b.selector.matches(&arena.view(idx))
                })
                .map(|b| b.handler.clone())
                .collect()
        };
        tracing::trace!(%target, event, hits = hits.len(), "dispatching delegated event");
        for handler in hits {
            handler(target, payload);
        }
    }
}

impl Default for MemTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree for MemTree {
    fn root(&self) -> NodeId {
        NodeId(self.lock().root as u64)
    }

    fn contains(&self, node: NodeId) -> bool {
        let arena = self.lock();
        let idx = node.0 as usize;
        idx < arena.nodes.len() && arena.is_attached(idx)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.lock().nodes.get(node.0 as usize)?.attrs.get(name).cloned()
    }

    fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        let mut arena = self.lock();
        if let Some(n) = arena.nodes.get_mut(node.0 as usize) {
            n.attrs.insert(name.to_owned(), value.to_owned());
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.lock()
            .nodes
            .get(node.0 as usize)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn add_class(&self, node: NodeId, class: &str) {
        let mut arena = self.lock();
        if let Some(n) = arena.nodes.get_mut(node.0 as usize) {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_owned());
            }
        }
    }

    fn find(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        let arena = self.lock();
        let mut out = Vec::new();
        if (scope.0 as usize) < arena.nodes.len() {
            arena.collect(scope.0 as usize, selector, &mut out);
        }
        out
    }

    fn graft(&self, fragment: &Fragment) -> NodeId {
        let mut arena = self.lock();
        let idx = arena.build(fragment, None);
        NodeId(idx as u64)
    }

    fn adopt_children(&self, target: NodeId, source: NodeId) {
        let mut arena = self.lock();
        let target_idx = target.0 as usize;
        let source_idx = source.0 as usize;
        if target_idx >= arena.nodes.len() || source_idx >= arena.nodes.len() {
            return;
        }
        for child in std::mem::take(&mut arena.nodes[target_idx].children) {
            arena.kill_subtree(child);
        }
        let adopted = std::mem::take(&mut arena.nodes[source_idx].children);
        for &child in &adopted {
            arena.nodes[child].parent = Some(target_idx);
        }
        arena.nodes[target_idx].children = adopted;
    }

    fn remove(&self, node: NodeId) {
        let mut arena = self.lock();
        let idx = node.0 as usize;
        if idx >= arena.nodes.len() {
            return;
        }
        if let Some(parent) = arena.nodes[idx].parent {
            arena.nodes[parent].children.retain(|&c| c != idx);
        }
        arena.kill_subtree(idx);
    }

    fn bind(&self, scope: NodeId, event: &str, selector: &Selector, handler: BoundHandler) {
        self.lock_bindings().push(Binding {
            scope: scope.0 as usize,
            event: event.to_owned(),
            selector: selector.clone(),
            handler,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample() -> (MemTree, NodeId, NodeId) {
        let tree = MemTree::new();
        let outer = tree.append(
            tree.root(),
            &Fragment::new("div")
                .class("outer")
                .child(Fragment::new("span").class("a").text("one"))
                .child(Fragment::new("span").class("a").text("two")),
        );
        let sibling = tree.append(tree.root(), &Fragment::new("p").class("b"));
        (tree, outer, sibling)
    }

    #[test]
    fn find_returns_document_order_without_scope() {
        let (tree, outer, sibling) = sample();
        let spans = tree.find(tree.root(), &Selector::class("a"));
        assert_eq!(spans.len(), 2);
        assert_eq!(tree.text(spans[0]).as_deref(), Some("one"));
        assert_eq!(tree.text(spans[1]).as_deref(), Some("two"));
        assert!(tree.find(outer, &Selector::class("outer")).is_empty());
        assert_eq!(tree.find(tree.root(), &Selector::class("b")), vec![sibling]);
    }

    #[test]
    fn grafts_stay_detached_until_adopted() {
        let (tree, outer, _) = sample();
        let staged = tree.graft(
            &Fragment::new("div").child(Fragment::new("span").class("a").text("fresh")),
        );
        assert!(!tree.contains(staged));

        let old = tree.find(outer, &Selector::class("a"));
        tree.adopt_children(outer, staged);
        for node in old {
            assert!(!tree.contains(node));
        }
        let fresh = tree.find(outer, &Selector::class("a"));
        assert_eq!(fresh.len(), 1);
        assert!(tree.contains(fresh[0]));
        assert_eq!(tree.text(fresh[0]).as_deref(), Some("fresh"));
    }

    #[test]
    fn append_under_unknown_parent_stays_detached() {
        let tree = MemTree::new();
        let orphan = tree.append(NodeId(999), &Fragment::new("div").class("a"));
        assert!(!tree.contains(orphan));
        assert!(tree.find(tree.root(), &Selector::class("a")).is_empty());
    }

    #[test]
    fn removal_is_transitive() {
        let (tree, outer, _) = sample();
        let spans = tree.find(outer, &Selector::class("a"));
        tree.remove(outer);
        assert!(!tree.contains(outer));
        for span in spans {
            assert!(!tree.contains(span));
        }
    }

    #[test]
    fn dispatch_honors_scope_and_selector() {
        let (tree, outer, sibling) = sample();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        tree.bind(
            outer,
            "click",
            &"span.a".parse().unwrap(),
            Arc::new(move |_, _| {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let span = tree.find(outer, &Selector::class("a"))[0];
        tree.dispatch(span, "click", &json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // wrong event name, out-of-scope target, and the scope itself
        tree.dispatch(span, "keyup", &json!({}));
        tree.dispatch(sibling, "click", &json!({}));
        tree.dispatch(outer, "click", &json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
