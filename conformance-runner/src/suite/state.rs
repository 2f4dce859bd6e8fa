use thenable::{PromiseState, Value};

use super::Case;
use crate::harness::{Harness, expect_eq};

pub fn cases() -> Vec<Case> {
    vec![
        Case::new("2.1.1", "pending promise may fulfill", pending_may_fulfill),
        Case::new("2.1.1", "pending promise may reject", pending_may_reject),
        Case::new("2.1.2", "fulfilled promise ignores rejection", fulfilled_ignores_reject),
        Case::new("2.1.2", "fulfilled value never changes", fulfilled_value_is_fixed),
        Case::new("2.1.3", "rejected promise ignores fulfillment", rejected_ignores_fulfill),
        Case::new("2.1.3", "rejection reason never changes", rejected_reason_is_fixed),
    ]
}

fn pending_may_fulfill(h: &Harness) -> Result<(), String> {
    let d = h.deferred();
    expect_eq("before", d.promise.state(), PromiseState::Pending)?;
    d.resolve.call("v");
    expect_eq("after", h.settle(&d.promise)?, PromiseState::Fulfilled(Value::from("v")))
}

fn pending_may_reject(h: &Harness) -> Result<(), String> {
    let d = h.deferred();
    d.reject.call("r");
    expect_eq("after", h.settle(&d.promise)?, PromiseState::Rejected(Value::from("r")))
}

fn fulfilled_ignores_reject(h: &Harness) -> Result<(), String> {
    let d = h.deferred();
    d.promise.then(Some(h.record("ok:")), Some(h.record("err:")));
    d.resolve.call(1);
    d.reject.call(2);
    h.drain()?;
    d.reject.call(3);
    h.drain()?;
    expect_eq("callbacks", h.log(), vec!["ok:1".to_string()])
}

fn fulfilled_value_is_fixed(h: &Harness) -> Result<(), String> {
    let d = h.deferred();
    d.resolve.call("first");
    h.drain()?;
    d.resolve.call("second");
    h.drain()?;
    expect_eq("state", d.promise.state(), PromiseState::Fulfilled(Value::from("first")))
}

fn rejected_ignores_fulfill(h: &Harness) -> Result<(), String> {
    let d = h.deferred();
    d.promise.then(Some(h.record("ok:")), Some(h.record("err:")));
    d.reject.call(1);
    d.resolve.call(2);
    h.drain()?;
    expect_eq("callbacks", h.log(), vec!["err:1".to_string()])
}

fn rejected_reason_is_fixed(h: &Harness) -> Result<(), String> {
    let d = h.deferred();
    d.reject.call("first");
    h.drain()?;
    d.reject.call("second");
    h.drain()?;
    expect_eq("state", d.promise.state(), PromiseState::Rejected(Value::from("first")))
}
