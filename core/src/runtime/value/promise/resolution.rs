use crate::errors::PromiseError;
use crate::runtime::value::Value;

use super::{Capability, Outcome, Promise};

/// The promise resolution procedure.
///
/// Settles `promise` from `value`, adopting the state of promises and
/// thenables. Does nothing if `promise` already settled.
pub(crate) fn resolve_promise(promise: &Promise, value: Value) {
    if !promise.is_pending() {
        return;
    }

    if let Value::Promise(inner) = &value {
        if inner.ptr_eq(promise) {
            log::debug!("promise #{} resolved with itself", promise.id());
            reject_promise(promise, PromiseError::ChainingCycle.into_value());
        } else {
            adopt(promise, inner);
        }
        return;
    }

    if matches!(value, Value::Object(_)) {
        resolve_object(promise, value);
        return;
    }

    promise.settle(Outcome::Fulfilled, value);
}

/// Rejects `promise` with `reason` as is. Reasons are never unwrapped.
pub(crate) fn reject_promise(promise: &Promise, reason: Value) {
    promise.settle(Outcome::Rejected, reason);
}

fn adopt(promise: &Promise, source: &Promise) {
    log::trace!("promise #{} follows promise #{}", promise.id(), source.id());
    let target = promise.clone();
    source.subscribe(
        Outcome::Fulfilled,
        Box::new(move |value| resolve_promise(&target, value)),
    );
    let target = promise.clone();
    source.subscribe(
        Outcome::Rejected,
        Box::new(move |reason| reject_promise(&target, reason)),
    );
}

fn resolve_object(promise: &Promise, value: Value) {
    let (resolve, reject) = Capability::pair(promise);

    let then = match value.get("then") {
        Ok(then) => then,
        Err(err) => {
            log::debug!("promise #{} could not read `then`: {err}", promise.id());
            reject.call(err.into_value());
            return;
        }
    };

    if !then.is_callable() {
        promise.settle(Outcome::Fulfilled, value);
        return;
    }

    let args = [resolve.into_value(), reject.clone().into_value()];
    if let Err(err) = then.call(&value, &args) {
        if reject.is_used() {
            log::trace!("promise #{} ignored a failure from a settled thenable", promise.id());
            return;
        }
        log::debug!("promise #{} thenable failed: {err}", promise.id());
        reject.call(err.into_value());
    }
}
