use std::fmt;
use std::rc::Rc;

use crate::errors::{Completion, PromiseError};
use crate::runtime::value::Value;

use super::resolution::{reject_promise, resolve_promise};
use super::{Outcome, Promise};

/// A user callback passed to [`Promise::then`] or [`Promise::catch`].
///
/// Returning `Ok` resolves the derived promise with the value (so returning a
/// promise or thenable chains onto it); returning `Err` rejects it.
#[derive(Clone)]
pub struct Handler {
    callback: Rc<dyn Fn(Value) -> Completion>,
}

impl Handler {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(Value) -> Completion + 'static,
    {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Wraps a callable value. Anything else yields `None`, which `then`
    /// treats the same as an omitted callback.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_callable() {
            return None;
        }
        let function = value.clone();
        Some(Self::new(move |argument| {
            function.call(&Value::Undefined, &[argument])
        }))
    }

    pub fn call(&self, argument: Value) -> Completion {
        (self.callback)(argument)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

impl Promise {
    /// Registers callbacks for either outcome and returns the derived promise.
    ///
    /// The derived promise is returned right away whatever the state of
    /// `self`. A missing `on_fulfilled` passes the value through; a missing
    /// `on_rejected` passes the reason through.
    pub fn then(&self, on_fulfilled: Option<Handler>, on_rejected: Option<Handler>) -> Promise {
        let child = Promise::pending(self.scheduler());

        let target = child.clone();
        self.subscribe(
            Outcome::Fulfilled,
            Box::new(move |value| react(on_fulfilled.as_ref(), Outcome::Fulfilled, &target, value)),
        );
        let target = child.clone();
        self.subscribe(
            Outcome::Rejected,
            Box::new(move |reason| react(on_rejected.as_ref(), Outcome::Rejected, &target, reason)),
        );

        child
    }

    /// `then` taking arbitrary values; non-callable arguments are ignored.
    pub fn then_values(&self, on_fulfilled: &Value, on_rejected: &Value) -> Promise {
        self.then(
            Handler::from_value(on_fulfilled),
            Handler::from_value(on_rejected),
        )
    }

    pub fn catch(&self, on_rejected: Option<Handler>) -> Promise {
        self.then(None, on_rejected)
    }
}

fn react(handler: Option<&Handler>, outcome: Outcome, child: &Promise, argument: Value) {
    let result = match (handler, outcome) {
        (Some(handler), _) => handler.call(argument),
        (None, Outcome::Fulfilled) => Ok(argument),
        (None, Outcome::Rejected) => Err(PromiseError::Thrown { value: argument }),
    };

    match result {
        Ok(value) => resolve_promise(child, value),
        Err(err) => reject_promise(child, err.into_value()),
    }
}
