//! Unit tests for handler sets and the dispatcher.

use std::sync::atomic::Ordering;

use futures::executor::block_on;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::outcome::Outcome;
use crate::protocol::{ProtocolError, encode_request};
use crate::test_utils::{Buy, BuyOptions, CountingShop, Hello, Purchase, Shop};

#[fixture]
fn dispatcher() -> Dispatcher<Shop, ()> {
    let (_, shop) = CountingShop::new();
    Shop::define_handlers(shop)
}

fn run(dispatcher: &Dispatcher<Shop, ()>, request: Value) -> Result<Value, DispatchError> {
    block_on(dispatcher.dispatch((), request))
}

#[rstest]
fn defined_handlers_cover_every_command(dispatcher: Dispatcher<Shop, ()>) {
    assert_eq!(
        dispatcher.commands(),
        vec!["buy", "explode", "hello", "sold_out"]
    );
    assert!(dispatcher.handles("hello"));
    assert!(!dispatcher.handles("refund"));
}

#[rstest]
#[case::hello(json!({"$cmd": "hello"}), json!({"ok": true, "value": "hello"}))]
#[case::default_num(
    json!({"$cmd": "buy", "item": "book"}),
    json!({"ok": true, "value": {"item": "book", "num": 1}})
)]
#[case::explicit_num(
    json!({"$cmd": "buy", "item": "pen", "num": 3}),
    json!({"ok": true, "value": {"item": "pen", "num": 3}})
)]
#[case::failed_outcome(
    json!({"$cmd": "sold_out", "item": "lamp"}),
    json!({"ok": false, "error": {"message": "lamp is sold out"}})
)]
fn routes_by_command_name(
    dispatcher: Dispatcher<Shop, ()>,
    #[case] request: Value,
    #[case] expected: Value,
) {
    let response = run(&dispatcher, request).expect("dispatched");
    assert_eq!(response, expected);
}

#[rstest]
fn routes_encoded_requests(dispatcher: Dispatcher<Shop, ()>) {
    let request = encode_request::<Buy>(&BuyOptions::new("book", Some(2))).expect("encode");
    let response = run(&dispatcher, request).expect("dispatched");
    let outcome: Outcome<Purchase> = serde_json::from_value(response).expect("decode");
    assert_eq!(
        outcome,
        Outcome::ok(Purchase {
            item: "book".into(),
            num: 2
        })
    );
}

#[rstest]
fn rejects_unknown_commands(dispatcher: Dispatcher<Shop, ()>) {
    let error = run(&dispatcher, json!({"$cmd": "refund"})).expect_err("unknown");
    assert!(matches!(
        error,
        DispatchError::UnknownCommand { spec: "Shop", ref command } if command == "refund"
    ));
}

#[rstest]
#[case::not_object(json!(["hello"]))]
#[case::missing_command(json!({"item": "book"}))]
#[case::empty_command(json!({"$cmd": ""}))]
fn rejects_malformed_envelopes(dispatcher: Dispatcher<Shop, ()>, #[case] request: Value) {
    let error = run(&dispatcher, request).expect_err("malformed");
    assert!(matches!(error, DispatchError::Protocol(_)));
}

#[rstest]
fn rejects_options_that_do_not_decode() {
    let (calls, shop) = CountingShop::new();
    let dispatcher: Dispatcher<Shop, ()> = Shop::define_handlers(shop);
    let error = run(&dispatcher, json!({"$cmd": "buy", "num": 2})).expect_err("bad options");
    assert!(matches!(
        error,
        DispatchError::Protocol(ProtocolError::DecodeOptions { .. })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0, "handler must not run");
}

#[rstest]
fn handler_errors_become_rejections(dispatcher: Dispatcher<Shop, ()>) {
    let error = run(&dispatcher, json!({"$cmd": "explode"})).expect_err("rejected");
    match error {
        DispatchError::HandlerRejected { command, source } => {
            assert_eq!(command, "explode");
            assert_eq!(source.message(), "boom");
        }
        other => panic!("expected handler rejection, got {other:?}"),
    }
}

#[rstest]
fn handlers_receive_the_event() {
    let dispatcher = HandlerSet::<Shop, u32>::new()
        .on::<Hello, _, _>(|event: u32, _options| async move {
            Ok(Outcome::ok(format!("event {event}")))
        })
        .into_dispatcher();
    let response = block_on(dispatcher.dispatch(7, json!({"$cmd": "hello"}))).expect("dispatched");
    assert_eq!(response, json!({"ok": true, "value": "event 7"}));
}

#[rstest]
fn partial_sets_report_missing_commands() {
    let set = HandlerSet::<Shop, ()>::new().on::<Hello, _, _>(|(), _options| async {
        Ok(Outcome::ok("hi".to_owned()))
    });
    assert!(set.contains("hello"));
    assert_eq!(set.missing(), vec!["buy", "sold_out", "explode"]);

    let error = set.build().expect_err("incomplete");
    assert!(matches!(
        error,
        DispatchError::MissingHandlers { spec: "Shop", ref commands }
            if commands == &["buy", "sold_out", "explode"]
    ));
}

#[rstest]
fn unchecked_dispatchers_reject_unhandled_commands() {
    let dispatcher = HandlerSet::<Shop, ()>::new()
        .on::<Hello, _, _>(|(), _options| async { Ok(Outcome::ok("hi".to_owned())) })
        .into_dispatcher();
    let error = run(&dispatcher, json!({"$cmd": "buy", "item": "book"})).expect_err("unhandled");
    assert!(matches!(error, DispatchError::UnknownCommand { .. }));
}

#[rstest]
fn later_handlers_replace_earlier_ones() {
    let dispatcher = HandlerSet::<Shop, ()>::new()
        .on::<Hello, _, _>(|(), _options| async { Ok(Outcome::ok("first".to_owned())) })
        .on::<Hello, _, _>(|(), _options| async { Ok(Outcome::ok("second".to_owned())) })
        .into_dispatcher();
    let response = run(&dispatcher, json!({"$cmd": "hello"})).expect("dispatched");
    assert_eq!(response, json!({"ok": true, "value": "second"}));
}

#[rstest]
fn clones_share_handlers() {
    let (calls, shop) = CountingShop::new();
    let dispatcher: Dispatcher<Shop, ()> = Shop::define_handlers(shop);
    let clone = dispatcher.clone();
    run(&dispatcher, json!({"$cmd": "hello"})).expect("first");
    run(&clone, json!({"$cmd": "hello"})).expect("second");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[rstest]
fn listeners_dispatch_like_the_dispatcher(dispatcher: Dispatcher<Shop, ()>) {
    let listener = dispatcher.into_listener();
    let response = block_on(listener((), json!({"$cmd": "hello"}))).expect("dispatched");
    assert_eq!(response, json!({"ok": true, "value": "hello"}));
}

#[rstest]
fn debug_lists_spec_and_commands(dispatcher: Dispatcher<Shop, ()>) {
    let rendered = format!("{dispatcher:?}");
    assert!(rendered.contains("Shop"));
    assert!(rendered.contains("sold_out"));

    let set = HandlerSet::<Shop, ()>::default();
    assert_eq!(
        format!("{set:?}"),
        r#"HandlerSet { spec: "Shop", commands: [] }"#
    );
}

#[test]
fn handler_errors_keep_their_source() {
    let io = std::io::Error::other("disk full");
    let error = HandlerError::from_error(io);
    assert_eq!(error.message(), "disk full");
    assert!(std::error::Error::source(&error).is_some());
    assert!(std::error::Error::source(&HandlerError::new("plain")).is_none());
}
