use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::runtime::scheduler::SchedulerHandle;
use crate::runtime::value::Value;

use super::resolution::{reject_promise, resolve_promise};
use super::{Outcome, Promise};

/// One of the two functions able to settle a promise.
///
/// Capabilities created together share a latch: the first call to either
/// one wins and every later call, to either, is ignored. That holds even
/// while the promise is still pending because it adopted a thenable.
#[derive(Clone)]
pub struct Capability {
    promise: Promise,
    outcome: Outcome,
    already_resolved: Rc<Cell<bool>>,
}

impl Capability {
    /// A resolve/reject pair for `promise` sharing one latch.
    pub(crate) fn pair(promise: &Promise) -> (Capability, Capability) {
        let already_resolved = Rc::new(Cell::new(false));
        let resolve = Capability {
            promise: promise.clone(),
            outcome: Outcome::Fulfilled,
            already_resolved: Rc::clone(&already_resolved),
        };
        let reject = Capability {
            promise: promise.clone(),
            outcome: Outcome::Rejected,
            already_resolved,
        };
        (resolve, reject)
    }

    /// Resolves (through the resolution procedure) or rejects the promise.
    /// Returns `false` if the pair was already used.
    pub fn call(&self, value: impl Into<Value>) -> bool {
        if self.already_resolved.replace(true) {
            log::trace!(
                "promise #{} ignored a repeated settle call",
                self.promise.id()
            );
            return false;
        }
        match self.outcome {
            Outcome::Fulfilled => resolve_promise(&self.promise, value.into()),
            Outcome::Rejected => reject_promise(&self.promise, value.into()),
        }
        true
    }

    pub fn is_used(&self) -> bool {
        self.already_resolved.get()
    }

    /// The capability as a callable value taking the settlement as its first
    /// argument, for handing to foreign thenables.
    pub fn into_value(self) -> Value {
        let name = match self.outcome {
            Outcome::Fulfilled => "resolve",
            Outcome::Rejected => "reject",
        };
        Value::function(name, move |_, args| {
            self.call(args.first().cloned().unwrap_or(Value::Undefined));
            Ok(Value::Undefined)
        })
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("promise", &self.promise.id())
            .field("outcome", &self.outcome)
            .field("used", &self.is_used())
            .finish()
    }
}

/// A promise together with the two capabilities that settle it.
#[derive(Debug, Clone)]
pub struct Deferred {
    pub promise: Promise,
    pub resolve: Capability,
    pub reject: Capability,
}

impl Deferred {
    pub fn new(scheduler: &SchedulerHandle) -> Self {
        let promise = Promise::pending(scheduler);
        let (resolve, reject) = Capability::pair(&promise);
        Self {
            promise,
            resolve,
            reject,
        }
    }
}
