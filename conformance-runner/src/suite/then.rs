use std::cell::RefCell;
use std::rc::Rc;

use thenable::{Handler, Promise, PromiseError, PromiseState, Value};

use super::Case;
use crate::harness::{Harness, expect_eq};

pub fn cases() -> Vec<Case> {
    vec![
        Case::new("2.2.1", "non-function arguments are ignored", non_functions_ignored),
        Case::new("2.2.2", "onFulfilled waits for fulfillment", waits_for_fulfillment),
        Case::new("2.2.2", "onFulfilled runs at most once", fulfilled_runs_once),
        Case::new("2.2.3", "onRejected runs at most once", rejected_runs_once),
        Case::new("2.2.4", "callbacks never run synchronously", never_synchronous),
        Case::new("2.2.6", "fulfillment callbacks run in registration order", fulfilled_order),
        Case::new("2.2.6", "rejection callbacks run in registration order", rejected_order),
        Case::new("2.2.6", "callbacks added during dispatch still run", added_during_dispatch),
        Case::new("2.2.7", "then returns a fresh promise", returns_fresh_promise),
        Case::new("2.2.7.1", "returned value resolves the derived promise", returned_value),
        Case::new("2.2.7.2", "thrown value rejects the derived promise", thrown_value),
        Case::new("2.2.7.3", "missing onFulfilled passes the value on", passes_value),
        Case::new("2.2.7.4", "missing onRejected passes the reason on", passes_reason),
    ]
}

fn non_functions_ignored(h: &Harness) -> Result<(), String> {
    let fulfilled = h
        .resolved("v")
        .then_values(&Value::from(5), &Value::Null);
    let rejected = h
        .rejected("r")
        .then_values(&Value::from("x"), &Value::Undefined);
    expect_eq("fulfilled", h.settle(&fulfilled)?, PromiseState::Fulfilled(Value::from("v")))?;
    expect_eq("rejected", h.settle(&rejected)?, PromiseState::Rejected(Value::from("r")))
}

fn waits_for_fulfillment(h: &Harness) -> Result<(), String> {
    let d = h.deferred();
    d.promise.then(Some(h.record("")), None);
    h.drain()?;
    expect_eq("before", h.log().len(), 0)?;
    d.resolve.call("now");
    h.drain()?;
    expect_eq("after", h.log(), vec!["now".to_string()])
}

fn fulfilled_runs_once(h: &Harness) -> Result<(), String> {
    let d = h.deferred();
    d.promise.then(Some(h.record("")), None);
    d.resolve.call(1);
    d.resolve.call(2);
    h.drain()?;
    d.resolve.call(3);
    h.drain()?;
    expect_eq("calls", h.log(), vec!["1".to_string()])
}

fn rejected_runs_once(h: &Harness) -> Result<(), String> {
    let d = h.deferred();
    d.promise.catch(Some(h.record("")));
    d.reject.call(1);
    d.reject.call(2);
    h.drain()?;
    expect_eq("calls", h.log(), vec!["1".to_string()])
}

fn never_synchronous(h: &Harness) -> Result<(), String> {
    let settled = h.resolved("early");
    settled.then(Some(h.record("")), None);
    let d = h.deferred();
    d.promise.then(Some(h.record("")), None);
    d.resolve.call("late");
    expect_eq("inline calls", h.log().len(), 0)?;
    h.drain()?;
    expect_eq("calls", h.log(), vec!["early".to_string(), "late".to_string()])
}

fn fulfilled_order(h: &Harness) -> Result<(), String> {
    let d = h.deferred();
    for tag in ["1:", "2:", "3:"] {
        d.promise.then(Some(h.record(tag)), None);
    }
    d.resolve.call("v");
    h.drain()?;
    expect_eq("order", h.log(), vec!["1:v".to_string(), "2:v".into(), "3:v".into()])
}

fn rejected_order(h: &Harness) -> Result<(), String> {
    let d = h.deferred();
    d.promise.then(None, Some(h.record("1:")));
    d.promise.catch(Some(h.record("2:")));
    d.reject.call("r");
    d.promise.catch(Some(h.record("3:")));
    h.drain()?;
    expect_eq("order", h.log(), vec!["1:r".to_string(), "2:r".into(), "3:r".into()])
}

fn added_during_dispatch(h: &Harness) -> Result<(), String> {
    let d = h.deferred();
    let promise = d.promise.clone();
    let nested = h.record("nested:");
    d.promise.then(
        Some(Handler::new(move |value| {
            promise.then(Some(nested.clone()), None);
            Ok(value)
        })),
        None,
    );
    d.promise.then(Some(h.record("sibling:")), None);
    d.resolve.call(7);
    h.drain()?;
    expect_eq(
        "order",
        h.log(),
        vec!["sibling:7".to_string(), "nested:7".into()],
    )
}

fn returns_fresh_promise(h: &Harness) -> Result<(), String> {
    let p = h.resolved(1);
    let a = p.then(None, None);
    let b = p.then(None, None);
    expect_eq("distinct derived promises", a.ptr_eq(&b), false)?;
    expect_eq("distinct from source", a.ptr_eq(&p), false)?;
    expect_eq("pending when returned", a.is_pending(), true)
}

fn returned_value(h: &Harness) -> Result<(), String> {
    let returned: Rc<RefCell<Option<Promise>>> = Rc::new(RefCell::new(None));
    let inner = h.deferred();
    let slot = Rc::clone(&returned);
    let derived = h.resolved("ignored").then(
        Some(Handler::new(move |_| {
            Ok(slot
                .borrow()
                .clone()
                .map(Value::Promise)
                .unwrap_or(Value::Undefined))
        })),
        None,
    );
    *returned.borrow_mut() = Some(inner.promise.clone());
    h.drain()?;
    expect_eq("while inner pending", derived.is_pending(), true)?;
    inner.resolve.call("inner");
    expect_eq("derived", h.settle(&derived)?, PromiseState::Fulfilled(Value::from("inner")))
}

fn thrown_value(h: &Harness) -> Result<(), String> {
    let fulfilled = h
        .resolved(1)
        .then(Some(Handler::new(|_| Err(PromiseError::thrown("from fulfill")))), None);
    let rejected = h
        .rejected(1)
        .catch(Some(Handler::new(|_| Err(PromiseError::thrown("from reject")))));
    expect_eq(
        "after onFulfilled",
        h.settle(&fulfilled)?,
        PromiseState::Rejected(Value::from("from fulfill")),
    )?;
    expect_eq(
        "after onRejected",
        h.settle(&rejected)?,
        PromiseState::Rejected(Value::from("from reject")),
    )
}

fn passes_value(h: &Harness) -> Result<(), String> {
    let derived = h.resolved("v").catch(Some(h.record("unexpected:")));
    expect_eq("derived", h.settle(&derived)?, PromiseState::Fulfilled(Value::from("v")))?;
    expect_eq("onRejected calls", h.log().len(), 0)
}

fn passes_reason(h: &Harness) -> Result<(), String> {
    let derived = h.rejected("r").then(Some(h.record("unexpected:")), None);
    expect_eq("derived", h.settle(&derived)?, PromiseState::Rejected(Value::from("r")))?;
    expect_eq("onFulfilled calls", h.log().len(), 0)
}
