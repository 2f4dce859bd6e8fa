use thenable::{PromiseState, Value};

use super::Case;
use crate::harness::{Harness, expect_eq, foreign_thenable, invoke};

pub fn cases() -> Vec<Case> {
    vec![
        Case::new("all", "empty input fulfills with an empty array", all_empty),
        Case::new("all", "values keep input order", all_positional),
        Case::new("all", "first rejection wins", all_first_rejection),
        Case::new("all", "plain values and thenables count as fulfilled", all_mixed),
        Case::new("race", "fastest fulfillment wins", race_fastest),
        Case::new("race", "fastest rejection wins", race_rejection),
        Case::new("race", "empty input stays pending", race_empty),
        Case::new("resolve", "adopts promises", resolve_adopts),
        Case::new("reject", "never unwraps its reason", reject_keeps_reason),
    ]
}

fn all_empty(h: &Harness) -> Result<(), String> {
    let p = h.all(Vec::new());
    expect_eq("state", h.settle(&p)?, PromiseState::Fulfilled(Value::array([])))
}

fn all_positional(h: &Harness) -> Result<(), String> {
    let p = h.all(vec![
        h.delayed(30, "slow").into(),
        h.delayed(10, "fast").into(),
        h.delayed(20, "middle").into(),
    ]);
    let expected = Value::array([Value::from("slow"), Value::from("fast"), Value::from("middle")]);
    expect_eq("state", h.settle(&p)?, PromiseState::Fulfilled(expected))
}

fn all_first_rejection(h: &Harness) -> Result<(), String> {
    let p = h.all(vec![
        h.delayed(10, "ok").into(),
        h.delayed_rejection(20, "first").into(),
        h.delayed_rejection(30, "second").into(),
    ]);
    expect_eq("state", h.settle(&p)?, PromiseState::Rejected(Value::from("first")))?;
    h.drain()?;
    expect_eq("after all inputs", p.state(), PromiseState::Rejected(Value::from("first")))
}

fn all_mixed(h: &Harness) -> Result<(), String> {
    let p = h.all(vec![
        Value::from(1),
        foreign_thenable(|resolve, _| invoke(resolve, 2)),
        h.resolved(3).into(),
    ]);
    let expected = Value::array([Value::from(1), Value::from(2), Value::from(3)]);
    expect_eq("state", h.settle(&p)?, PromiseState::Fulfilled(expected))
}

fn race_fastest(h: &Harness) -> Result<(), String> {
    let p = h.race(vec![h.delayed(20, "slow").into(), h.delayed(5, "fast").into()]);
    expect_eq("state", h.settle(&p)?, PromiseState::Fulfilled(Value::from("fast")))
}

fn race_rejection(h: &Harness) -> Result<(), String> {
    let p = h.race(vec![
        h.delayed(20, "slow").into(),
        h.delayed_rejection(5, "fast").into(),
    ]);
    expect_eq("state", h.settle(&p)?, PromiseState::Rejected(Value::from("fast")))
}

fn race_empty(h: &Harness) -> Result<(), String> {
    let p = h.race(Vec::new());
    h.drain()?;
    expect_eq("pending", p.is_pending(), true)
}

fn resolve_adopts(h: &Harness) -> Result<(), String> {
    let inner = h.rejected("inner");
    let outer = h.resolved(inner.clone());
    expect_eq("distinct", outer.ptr_eq(&inner), false)?;
    expect_eq("state", h.settle(&outer)?, PromiseState::Rejected(Value::from("inner")))
}

fn reject_keeps_reason(h: &Harness) -> Result<(), String> {
    let inner = h.resolved("inner");
    let outer = h.rejected(inner.clone());
    expect_eq("state", h.settle(&outer)?, PromiseState::Rejected(Value::Promise(inner)))
}
