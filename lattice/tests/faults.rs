//! Error bus routing: known fault kinds, the catch-all handler, and the
//! boundary between them.

mod common;

use common::card_fixture;
use lattice::Fault;
use lattice::testing::Recorder;
use serde_json::json;
use std::sync::Arc;

#[test]
fn known_kind_reaches_its_handler() {
    let fx = card_fixture();
    let recorder = Recorder::new();
    fx.runtime
        .faults()
        .on("ValidationError", Arc::new(recorder.callback()));

    fx.runtime
        .faults()
        .raise(&Fault::new("ValidationError", json!({"field": "email"})));
    assert_eq!(recorder.values(), vec![json!({"field": "email"})]);
}

#[test]
fn unknown_kind_falls_through_to_catch_all_once() {
    let fx = card_fixture();
    let catch_all = Recorder::new();
    fx.runtime.faults().on("*", Arc::new(catch_all.callback()));

    fx.runtime
        .faults()
        .raise(&Fault::new("NeverDeclared", json!({"n": 1})));
    assert_eq!(catch_all.count(), 1);
}

#[test]
fn known_kind_never_reaches_catch_all() {
    let fx = card_fixture();
    let typed = Recorder::new();
    let catch_all = Recorder::new();
    fx.runtime
        .faults()
        .on("ValidationError", Arc::new(typed.callback()));
    fx.runtime.faults().on("*", Arc::new(catch_all.callback()));

    fx.runtime
        .faults()
        .raise(&Fault::new("ValidationError", json!(1)));
    assert_eq!(typed.count(), 1);
    assert_eq!(catch_all.count(), 0);
}

#[test]
fn known_kind_skips_catch_all_even_with_inert_handler() {
    // Declaring a kind forecloses the catch-all for it permanently,
    // whether or not the dedicated handler does anything useful.
    let fx = card_fixture();
    let catch_all = Recorder::new();
    fx.runtime
        .faults()
        .on("ValidationError", Arc::new(|_: &serde_json::Value| {}));
    fx.runtime.faults().on("*", Arc::new(catch_all.callback()));

    assert!(fx.runtime.faults().is_known("ValidationError"));
    fx.runtime
        .faults()
        .raise(&Fault::new("ValidationError", json!(1)));
    assert_eq!(catch_all.count(), 0);
}

#[test]
fn catch_all_registration_overwrites() {
    let fx = card_fixture();
    let first = Recorder::new();
    let second = Recorder::new();
    fx.runtime.faults().on("*", Arc::new(first.callback()));
    fx.runtime.faults().on("*", Arc::new(second.callback()));

    fx.runtime.faults().raise(&Fault::unknown(json!(1)));
    assert_eq!(first.count(), 0);
    assert_eq!(second.count(), 1);
}

#[test]
fn unknown_fault_constructor_uses_reserved_kind() {
    let fault = Fault::unknown(json!({"status": 500}));
    assert_eq!(fault.kind, lattice::markers::UNKNOWN_FAULT);
}
