#![allow(dead_code)]

use lattice::testing::Recorder;
use lattice::{Component, Error, Fragment, MemTree, NodeId, Runtime, RuntimeBuilder, Tree, Widget};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Test Components
// ============================================================================

/// A card component with a recordable API and a keyed delegated listener.
pub struct CardApi {
    loaded: Mutex<Vec<u64>>,
    pub clicks: Recorder,
}

impl CardApi {
    pub fn new() -> Self {
        Self {
            loaded: Mutex::new(Vec::new()),
            clicks: Recorder::new(),
        }
    }

    pub fn load(&self, id: u64) {
        self.loaded.lock().unwrap().push(id);
    }

    pub fn loaded_ids(&self) -> Vec<u64> {
        self.loaded.lock().unwrap().clone()
    }
}

impl Component for CardApi {
    fn create_listeners(&self, widget: &Widget<'_>) -> Result<(), Error> {
        let record = self.clicks.callback();
        widget.connect("button.reload", "click", "card-reload", move |_, data| {
            record(data)
        })
    }
}

/// A component with no listeners and no API of its own.
pub struct PanelApi;

impl Component for PanelApi {}

// ============================================================================
// Renderers
// ============================================================================

/// Card markup: one inner container carrying the title, plus a reload
/// button outside it.
pub fn render_card(data: &Value) -> Fragment {
    let title = data["title"].as_str().unwrap_or("untitled").to_owned();
    Fragment::new("div")
        .class("card-body")
        .child(
            Fragment::new("div")
                .inner_container()
                .child(Fragment::new("span").class("title").text(title)),
        )
        .child(Fragment::new("button").class("reload").text("reload"))
}

/// Panel markup: a single inner container that hosts a nested card.
pub fn render_panel(_data: &Value) -> Fragment {
    Fragment::new("div").class("panel-body").child(
        Fragment::new("div")
            .inner_container()
            .child(Fragment::container("card")),
    )
}

// ============================================================================
// Fixtures
// ============================================================================

/// A document with one card container, wired to a runtime that counts
/// factory invocations.
pub struct CardFixture {
    pub tree: Arc<MemTree>,
    pub runtime: Arc<Runtime>,
    pub card: NodeId,
    pub built: Arc<AtomicUsize>,
}

impl CardFixture {
    pub fn builds(&self) -> usize {
        self.built.load(Ordering::SeqCst)
    }
}

pub fn card_fixture() -> CardFixture {
    let tree = Arc::new(MemTree::new());
    let card = tree.append(tree.root(), &Fragment::container("card"));
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();
    let runtime = RuntimeBuilder::new(tree.clone())
        .template("card", render_card, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            CardApi::new()
        })
        .build();
    CardFixture {
        tree,
        runtime,
        card,
        built,
    }
}

/// A document with a panel wrapping a nested card, both templates
/// registered.
pub struct NestedFixture {
    pub tree: Arc<MemTree>,
    pub runtime: Arc<Runtime>,
    pub panel: NodeId,
}

pub fn nested_fixture() -> NestedFixture {
    let tree = Arc::new(MemTree::new());
    let panel = tree.append(
        tree.root(),
        &Fragment::container("panel").child(
            Fragment::new("div")
                .inner_container()
                .child(Fragment::container("card")),
        ),
    );
    let runtime = RuntimeBuilder::new(tree.clone())
        .template("card", render_card, CardApi::new)
        .template("panel", render_panel, || PanelApi)
        .build();
    NestedFixture {
        tree,
        runtime,
        panel,
    }
}
