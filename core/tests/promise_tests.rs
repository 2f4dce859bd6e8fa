use std::cell::RefCell;
use std::rc::Rc;

use thenable::{Context, ErrorKind, Handler, Outcome, Promise, PromiseError, PromiseState, Value};

#[derive(Clone, Default)]
struct Output(Rc<RefCell<Vec<String>>>);

impl Output {
    fn log(&self) -> Handler {
        self.tagged("")
    }

    fn tagged(&self, tag: &'static str) -> Handler {
        let lines = Rc::clone(&self.0);
        Handler::new(move |value| {
            lines.borrow_mut().push(format!("{tag}{value}"));
            Ok(value)
        })
    }

    fn lines(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

fn add(n: f64) -> Handler {
    Handler::new(move |value| Ok(Value::from(value.as_number().unwrap_or(f64::NAN) + n)))
}

fn times(n: f64) -> Handler {
    Handler::new(move |value| Ok(Value::from(value.as_number().unwrap_or(f64::NAN) * n)))
}

#[test]
fn promise_constructor_and_then() {
    let ctx = Context::new();
    let output = Output::default();

    let p = ctx.promise(|resolve, _| {
        resolve.call(42);
        Ok(())
    });
    p.then(Some(output.log()), None);
    ctx.run_until_idle().unwrap();

    assert_eq!(output.lines(), vec!["42"]);
}

#[test]
fn resolve_then_increment_fulfills_with_two() {
    let ctx = Context::new();
    let p = ctx
        .promise(|resolve, _| {
            resolve.call(1);
            Ok(())
        })
        .then(Some(add(1.0)), None);

    assert_eq!(ctx.settle(&p).unwrap(), PromiseState::Fulfilled(Value::from(2)));
}

#[test]
fn catch_recovers_with_new_value() {
    let ctx = Context::new();
    let p = ctx
        .promise(|_, reject| {
            reject.call("e");
            Ok(())
        })
        .catch(Some(Handler::new(|reason| Ok(Value::from(format!("{reason}!"))))));

    assert_eq!(ctx.settle(&p).unwrap(), PromiseState::Fulfilled(Value::from("e!")));
}

#[test]
fn promise_chaining_and_catch() {
    let ctx = Context::new();
    let output = Output::default();

    ctx.resolve(1)
        .then(Some(add(1.0)), None)
        .then(Some(times(2.0)), None)
        .then(Some(output.log()), None);
    ctx.reject("fail").catch(Some(output.log()));
    ctx.run_until_idle().unwrap();

    assert_eq!(output.lines(), vec!["fail", "4"]);
}

#[test]
fn then_callback_is_never_synchronous() {
    let ctx = Context::new();
    let output = Output::default();

    let settled = ctx.resolve("now");
    settled.then(Some(output.log()), None);
    let d = ctx.deferred();
    d.promise.then(Some(output.log()), None);
    d.resolve.call("later");

    assert!(output.lines().is_empty());
    ctx.run_until_idle().unwrap();
    assert_eq!(output.lines(), vec!["now", "later"]);
}

#[test]
fn settling_twice_has_no_effect() {
    let ctx = Context::new();
    let output = Output::default();
    let d = ctx.deferred();
    d.promise.then(Some(output.tagged("ok:")), Some(output.tagged("err:")));

    d.resolve.call(1);
    d.resolve.call(2);
    d.reject.call(3);
    ctx.run_until_idle().unwrap();
    d.resolve.call(4);
    d.reject.call(5);
    ctx.run_until_idle().unwrap();

    assert_eq!(d.promise.state(), PromiseState::Fulfilled(Value::from(1)));
    assert_eq!(output.lines(), vec!["ok:1"]);
}

#[test]
fn each_callback_fires_exactly_once_before_and_after_settlement() {
    let ctx = Context::new();
    let output = Output::default();
    let d = ctx.deferred();

    d.promise.then(Some(output.tagged("a:")), None);
    d.promise.then(Some(output.tagged("b:")), None);
    d.reject.call("x");
    d.promise.then(None, Some(output.tagged("c:")));
    d.promise.catch(Some(output.tagged("d:")));
    ctx.run_until_idle().unwrap();
    d.promise.catch(Some(output.tagged("e:")));
    ctx.run_until_idle().unwrap();

    assert_eq!(output.lines(), vec!["c:x", "d:x", "e:x"]);
}

#[test]
fn callbacks_on_one_promise_fire_in_registration_order() {
    let ctx = Context::new();
    let output = Output::default();
    let d = ctx.deferred();
    for tag in ["1:", "2:", "3:"] {
        d.promise.then(Some(output.tagged(tag)), None);
    }
    d.resolve.call("v");
    ctx.run_until_idle().unwrap();

    assert_eq!(output.lines(), vec!["1:v", "2:v", "3:v"]);
}

#[test]
fn callback_registered_from_a_callback_still_fires() {
    let ctx = Context::new();
    let output = Output::default();
    let d = ctx.deferred();

    let promise = d.promise.clone();
    let inner_output = output.clone();
    d.promise.then(
        Some(Handler::new(move |value| {
            promise.then(Some(inner_output.tagged("nested:")), None);
            Ok(value)
        })),
        None,
    );
    d.promise.then(Some(output.tagged("sibling:")), None);
    d.resolve.call(7);
    ctx.run_until_idle().unwrap();

    assert_eq!(output.lines(), vec!["sibling:7", "nested:7"]);
}

#[test]
fn then_returns_a_fresh_pending_promise_every_time() {
    let ctx = Context::new();
    let p = ctx.resolve(1);
    let a = p.then(None, None);
    let b = p.then(None, None);

    assert!(!a.ptr_eq(&b));
    assert!(!a.ptr_eq(&p));
    assert!(a.is_pending());
}

#[test]
fn returning_the_derived_promise_is_a_chaining_cycle() {
    let ctx = Context::new();
    let slot: Rc<RefCell<Option<Promise>>> = Rc::new(RefCell::new(None));
    let inner = Rc::clone(&slot);
    let derived = ctx.resolve(1).then(
        Some(Handler::new(move |_| {
            let own = inner.borrow().clone().expect("derived promise stored");
            Ok(Value::Promise(own))
        })),
        None,
    );
    *slot.borrow_mut() = Some(derived.clone());
    let observed = derived.catch(Some(Handler::new(Ok)));

    match ctx.settle(&observed).unwrap() {
        PromiseState::Fulfilled(reason) => assert!(reason.is_error_kind(ErrorKind::TypeError)),
        other => panic!("expected the cycle error to be caught, got {other:?}"),
    }
}

#[test]
fn self_resolution_rejects_even_without_rejection_handlers() {
    let ctx = Context::new();
    let d = ctx.deferred();
    assert_eq!(d.promise.waiting(Outcome::Rejected), 0);

    d.resolve.call(d.promise.clone());

    match d.promise.state() {
        PromiseState::Rejected(reason) => {
            assert!(reason.is_error_kind(ErrorKind::TypeError));
            assert_eq!(reason.to_string(), "TypeError: Chaining cycle detected for promise");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn handler_errors_reject_the_derived_promise() {
    let ctx = Context::new();
    let p = ctx
        .resolve(1)
        .then(Some(Handler::new(|_| Err(PromiseError::thrown("boom")))), None)
        .then(Some(add(1.0)), None);

    assert_eq!(ctx.settle(&p).unwrap(), PromiseState::Rejected(Value::from("boom")));
}

#[test]
fn promises_display_their_state() {
    let ctx = Context::new();
    let d = ctx.deferred();
    assert_eq!(Value::Promise(d.promise.clone()).to_string(), "Promise { <pending> }");
    d.resolve.call(3);
    assert_eq!(
        Value::Promise(d.promise.clone()).to_string(),
        "Promise { <fulfilled>: 3 }"
    );
    assert_eq!(
        Value::from(ctx.reject("no")).to_string(),
        "Promise { <rejected>: no }"
    );
}

#[test]
fn dropping_a_long_pending_chain_does_not_overflow() {
    let ctx = Context::new();
    let d = ctx.deferred();
    let mut tail = d.promise.clone();
    for _ in 0..100_000 {
        tail = tail.then(None, None);
    }
    assert!(tail.is_pending());

    drop(tail);
    drop(d);
    ctx.run_until_idle().unwrap();
}

#[test]
fn rejecting_the_head_of_a_long_chain_drops_unused_fulfillment_callbacks() {
    let ctx = Context::new();
    let d = ctx.deferred();
    let mut tail = d.promise.clone();
    for _ in 0..100_000 {
        tail = tail.then(Some(Handler::new(Ok)), None);
    }

    d.reject.call("stop");
    assert_eq!(ctx.settle(&tail).unwrap(), PromiseState::Rejected(Value::from("stop")));
}
