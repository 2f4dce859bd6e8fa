use std::cell::{Cell, RefCell};
use std::rc::Rc;

use thenable::runtime::value::object::Object;
use thenable::{Handler, Promise, PromiseError, PromiseState, Value};

use super::Case;
use crate::harness::{Harness, expect_eq, expect_type_error, foreign_thenable, invoke};

pub fn cases() -> Vec<Case> {
    vec![
        Case::new("2.3.1", "resolving with itself rejects with TypeError", self_resolution),
        Case::new("2.3.1", "returning the derived promise rejects with TypeError", derived_cycle),
        Case::new("2.3.2", "adopts a pending promise's fulfillment", adopts_fulfillment),
        Case::new("2.3.2", "adopts a pending promise's rejection", adopts_rejection),
        Case::new("2.3.2", "adopts an already settled promise", adopts_settled),
        Case::new("2.3.3.1", "then is read exactly once", then_read_once),
        Case::new("2.3.3.2", "failing then read rejects", failing_then_read),
        Case::new("2.3.3.3", "then is called with the value as receiver", then_receiver),
        Case::new("2.3.3.3.1", "nested thenables are unwrapped", nested_thenables),
        Case::new("2.3.3.3.3", "first capability call wins", first_call_wins),
        Case::new("2.3.3.3.4", "throwing after resolving is ignored", throw_after_resolve),
        Case::new("2.3.3.3.4", "throwing before resolving rejects", throw_before_resolve),
        Case::new("2.3.3.4", "non-callable then fulfills with the object", non_callable_then),
        Case::new("2.3.4", "plain values fulfill as-is", plain_values),
    ]
}

fn self_resolution(h: &Harness) -> Result<(), String> {
    let d = h.deferred();
    d.resolve.call(d.promise.clone());
    expect_type_error(&d.promise.state())
}

fn derived_cycle(h: &Harness) -> Result<(), String> {
    let slot: Rc<RefCell<Option<Promise>>> = Rc::new(RefCell::new(None));
    let inner = Rc::clone(&slot);
    let derived = h.resolved(1).then(
        Some(Handler::new(move |_| {
            Ok(inner
                .borrow()
                .clone()
                .map(Value::Promise)
                .unwrap_or(Value::Undefined))
        })),
        None,
    );
    *slot.borrow_mut() = Some(derived.clone());
    let state = h.settle(&derived)?;
    // Drop the cycle between the handler and the promise it returns.
    slot.borrow_mut().take();
    expect_type_error(&state)
}

fn adopts_fulfillment(h: &Harness) -> Result<(), String> {
    let inner = h.deferred();
    let outer = h.resolved(inner.promise.clone());
    h.drain()?;
    expect_eq("while inner pending", outer.is_pending(), true)?;
    inner.resolve.call("inner");
    expect_eq("outer", h.settle(&outer)?, PromiseState::Fulfilled(Value::from("inner")))
}

fn adopts_rejection(h: &Harness) -> Result<(), String> {
    let inner = h.deferred();
    let outer = h.resolved(inner.promise.clone());
    inner.reject.call("inner");
    expect_eq("outer", h.settle(&outer)?, PromiseState::Rejected(Value::from("inner")))
}

fn adopts_settled(h: &Harness) -> Result<(), String> {
    let outer = h.resolved(h.rejected("done"));
    expect_eq("outer", h.settle(&outer)?, PromiseState::Rejected(Value::from("done")))
}

fn then_read_once(h: &Harness) -> Result<(), String> {
    let reads = Rc::new(Cell::new(0));
    let counter = Rc::clone(&reads);
    let object = Object::new();
    object.set_getter("then", move |_, _| {
        counter.set(counter.get() + 1);
        Ok(Value::function("then", |_, args| {
            args[0].call(&Value::Undefined, &[Value::from("once")])
        }))
    });

    let p = h.resolved(Value::Object(Rc::new(object)));
    expect_eq("state", h.settle(&p)?, PromiseState::Fulfilled(Value::from("once")))?;
    expect_eq("reads", reads.get(), 1)
}

fn failing_then_read(h: &Harness) -> Result<(), String> {
    let object = Object::new();
    object.set_getter("then", |_, _| Err(PromiseError::thrown("no then")));
    let p = h.resolved(Value::Object(Rc::new(object)));
    expect_eq("state", h.settle(&p)?, PromiseState::Rejected(Value::from("no then")))
}

fn then_receiver(h: &Harness) -> Result<(), String> {
    let object = Object::new();
    object.set("payload", Value::from("mine"));
    object.set(
        "then",
        Value::function("then", |this, args| {
            let payload = this.get("payload")?;
            args[0].call(&Value::Undefined, &[payload])
        }),
    );
    let p = h.resolved(Value::Object(Rc::new(object)));
    expect_eq("state", h.settle(&p)?, PromiseState::Fulfilled(Value::from("mine")))
}

fn nested_thenables(h: &Harness) -> Result<(), String> {
    fn wrap(inner: Value) -> Value {
        foreign_thenable(move |resolve, _| invoke(resolve, inner.clone()))
    }

    let value = (0..4).fold(h.resolved("leaf").into(), |inner: Value, _| wrap(inner));
    let p = h.resolved(value);
    expect_eq("state", h.settle(&p)?, PromiseState::Fulfilled(Value::from("leaf")))
}

fn first_call_wins(h: &Harness) -> Result<(), String> {
    let fulfilled = h.resolved(foreign_thenable(|resolve, reject| {
        invoke(resolve, "first")?;
        invoke(reject, "second")?;
        invoke(resolve, "third")
    }));
    let rejected = h.resolved(foreign_thenable(|resolve, reject| {
        invoke(reject, "first")?;
        invoke(resolve, "second")
    }));
    expect_eq(
        "resolve first",
        h.settle(&fulfilled)?,
        PromiseState::Fulfilled(Value::from("first")),
    )?;
    expect_eq("reject first", h.settle(&rejected)?, PromiseState::Rejected(Value::from("first")))
}

fn throw_after_resolve(h: &Harness) -> Result<(), String> {
    let p = h.resolved(foreign_thenable(|resolve, _| {
        invoke(resolve, "kept")?;
        Err(PromiseError::thrown("ignored"))
    }));
    expect_eq("state", h.settle(&p)?, PromiseState::Fulfilled(Value::from("kept")))
}

fn throw_before_resolve(h: &Harness) -> Result<(), String> {
    let p = h.resolved(foreign_thenable(|_, _| Err(PromiseError::thrown("then failed"))));
    expect_eq("state", h.settle(&p)?, PromiseState::Rejected(Value::from("then failed")))
}

fn non_callable_then(h: &Harness) -> Result<(), String> {
    let object = Value::object([("then", Value::from(5))]);
    let p = h.resolved(object.clone());
    expect_eq("state", h.settle(&p)?, PromiseState::Fulfilled(object))
}

fn plain_values(h: &Harness) -> Result<(), String> {
    for value in [
        Value::Undefined,
        Value::Null,
        Value::from(false),
        Value::from(0),
        Value::from("text"),
        Value::array([Value::from(1)]),
    ] {
        let p = h.resolved(value.clone());
        expect_eq("state", h.settle(&p)?, PromiseState::Fulfilled(value))?;
    }
    Ok(())
}
