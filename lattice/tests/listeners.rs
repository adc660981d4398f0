//! Keyed listener registration: idempotency across repeated declaration,
//! scoping, and delegated dispatch.

mod common;

use common::{CardApi, card_fixture, render_card};
use lattice::testing::Recorder;
use lattice::{Component, ConfigError, Error, Fragment, MemTree, RuntimeBuilder, Tree, Widget};
use serde_json::json;
use std::sync::Arc;

/// Declares the same keyed listener twice from its lifecycle hook, which
/// runs while the container is still unloaded.
struct DoubleDeclare;

impl Component for DoubleDeclare {
    fn create_listeners(&self, widget: &Widget<'_>) -> Result<(), Error> {
        widget.connect("button.reload", "click", "reload", |_, _| {})?;
        widget.connect("button.reload", "click", "reload", |_, _| {})
    }
}

#[test]
fn same_key_registers_once() {
    let fx = card_fixture();
    fx.runtime
        .connect("a.nav", "click", "nav", |_, _| {})
        .unwrap();
    fx.runtime
        .connect("a.nav", "click", "nav", |_, _| {})
        .unwrap();
    assert_eq!(fx.tree.binding_count(), 1);
}

#[test]
fn distinct_keys_register_separately() {
    let fx = card_fixture();
    fx.runtime
        .connect("a.nav", "click", "nav-one", |_, _| {})
        .unwrap();
    fx.runtime
        .connect("a.nav", "click", "nav-two", |_, _| {})
        .unwrap();
    assert_eq!(fx.tree.binding_count(), 2);
}

#[test]
fn same_key_before_load_nets_one_binding() {
    let tree = Arc::new(MemTree::new());
    tree.append(tree.root(), &Fragment::container("card"));
    let runtime = RuntimeBuilder::new(tree.clone())
        .template("card", render_card, || DoubleDeclare)
        .build();

    runtime.bootstrap().unwrap();
    assert_eq!(tree.binding_count(), 1);
}

#[test]
fn redeclaring_a_key_after_load_is_a_no_op() {
    let fx = card_fixture();
    fx.runtime.bootstrap().unwrap();
    assert_eq!(fx.tree.binding_count(), 1, "create_listeners binds once");

    let widget = fx.runtime.api("card").unwrap();
    widget
        .connect("button.reload", "click", "card-reload", |_, _| {})
        .unwrap();
    assert_eq!(fx.tree.binding_count(), 1);
}

#[test]
fn detached_widget_refuses_registration() {
    let tree = Arc::new(MemTree::new());
    let runtime = RuntimeBuilder::new(tree)
        .template("card", render_card, CardApi::new)
        .build();
    let widget = runtime.api("card").unwrap();

    match widget.connect("button.reload", "click", "k", |_, _| {}) {
        Err(Error::Config(ConfigError::NotRegistrable(_))) => {}
        other => panic!("expected NotRegistrable, got {other:?}"),
    }
}

#[test]
fn delegated_dispatch_reaches_the_component() {
    let fx = card_fixture();
    fx.runtime.bootstrap().unwrap();
    let button = fx
        .tree
        .append(fx.card, &Fragment::new("button").class("reload"));

    fx.tree.dispatch(button, "click", &json!({"source": "test"}));

    let widget = fx.runtime.api("card").unwrap();
    let api = widget.instance::<CardApi>().unwrap();
    assert_eq!(api.clicks.values(), vec![json!({"source": "test"})]);
}

#[test]
fn dispatch_filters_on_selector_and_event() {
    let fx = card_fixture();
    fx.runtime.bootstrap().unwrap();
    let button = fx
        .tree
        .append(fx.card, &Fragment::new("button").class("reload"));
    let span = fx.tree.append(fx.card, &Fragment::new("span"));

    fx.tree.dispatch(span, "click", &json!(1));
    fx.tree.dispatch(button, "hover", &json!(2));

    let widget = fx.runtime.api("card").unwrap();
    let api = widget.instance::<CardApi>().unwrap();
    assert_eq!(api.clicks.count(), 0);
}

#[test]
fn root_scope_does_not_collide_with_widget_scope() {
    // The same key under different scopes is two independent claims.
    let fx = card_fixture();
    fx.runtime.bootstrap().unwrap();

    fx.runtime
        .connect("button.reload", "click", "card-reload", |_, _| {})
        .unwrap();
    assert_eq!(fx.tree.binding_count(), 2);
}

#[test]
fn root_connect_catches_events_anywhere() {
    let fx = card_fixture();
    let recorder = Recorder::new();
    fx.runtime
        .connect("a.nav", "click", "nav", recorder.bound())
        .unwrap();

    let link = fx
        .tree
        .append(fx.card, &Fragment::new("a").class("nav"));
    fx.tree.dispatch(link, "click", &json!({"href": "/home"}));
    assert_eq!(recorder.values(), vec![json!({"href": "/home"})]);
}
