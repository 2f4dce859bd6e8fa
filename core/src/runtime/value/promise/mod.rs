mod capability;
mod chain;
mod combinators;
mod registry;
mod resolution;
mod state;

pub use capability::{Capability, Deferred};
pub use chain::Handler;
pub use state::{Outcome, PromiseState};

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::Completion;
use crate::runtime::scheduler::{Scheduler, SchedulerHandle};
use crate::runtime::value::Value;

use registry::Reaction;
use state::StateCell;

static NEXT_PROMISE_ID: AtomicU64 = AtomicU64::new(1);

/// The eventual result of a deferred computation.
///
/// Cloning a `Promise` clones the handle, not the computation: clones
/// observe the same settlement. Every callback is delivered through the
/// scheduler the promise was created with, never inline.
#[derive(Clone)]
pub struct Promise {
    inner: Rc<PromiseInner>,
}

struct PromiseInner {
    id: u64,
    cell: StateCell,
    scheduler: SchedulerHandle,
}

impl Promise {
    /// Runs `initializer` synchronously with the two settling capabilities.
    /// An `Err` from the initializer rejects the promise unless it already
    /// resolved.
    pub fn new<F>(scheduler: &SchedulerHandle, initializer: F) -> Promise
    where
        F: FnOnce(Capability, Capability) -> Completion<()>,
    {
        let Deferred {
            promise,
            resolve,
            reject,
        } = Deferred::new(scheduler);

        if let Err(err) = initializer(resolve, reject.clone()) {
            log::debug!("promise #{} initializer failed: {err}", promise.id());
            reject.call(err.into_value());
        }
        promise
    }

    /// A pending promise with no way to settle it other than the crate's own
    /// resolution functions.
    pub(crate) fn pending(scheduler: &SchedulerHandle) -> Promise {
        Promise {
            inner: Rc::new(PromiseInner {
                id: NEXT_PROMISE_ID.fetch_add(1, Ordering::Relaxed),
                cell: StateCell::default(),
                scheduler: Rc::clone(scheduler),
            }),
        }
    }

    /// A pending promise plus its `resolve` and `reject` capabilities, for
    /// driving a promise from outside without an initializer closure.
    pub fn deferred(scheduler: &SchedulerHandle) -> Deferred {
        Deferred::new(scheduler)
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn state(&self) -> PromiseState {
        self.inner.cell.snapshot()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.cell.is_pending()
    }

    pub fn ptr_eq(&self, other: &Promise) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Identity of the shared state, for cycle checks while walking values.
    pub(crate) fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.inner).cast()
    }

    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.inner.scheduler
    }

    /// Callbacks still waiting for `outcome`.
    pub fn waiting(&self, outcome: Outcome) -> usize {
        self.inner.cell.waiting(outcome)
    }

    pub(crate) fn subscribe(&self, outcome: Outcome, reaction: Reaction) {
        self.inner
            .cell
            .subscribe(outcome, reaction, self.scheduler_ref());
    }

    pub(crate) fn settle(&self, outcome: Outcome, value: Value) {
        let unobserved = outcome == Outcome::Rejected && self.waiting(Outcome::Rejected) == 0;
        if !self.inner.cell.settle(outcome, value, self.scheduler_ref()) {
            return;
        }
        match outcome {
            Outcome::Fulfilled => log::trace!("promise #{} fulfilled", self.id()),
            Outcome::Rejected if unobserved => {
                log::debug!("promise #{} rejected with no rejection handler", self.id())
            }
            Outcome::Rejected => log::trace!("promise #{} rejected", self.id()),
        }
    }

    fn scheduler_ref(&self) -> &dyn Scheduler {
        self.inner.scheduler.as_ref()
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("id", &self.id())
            .field("state", &self.state().label())
            .finish()
    }
}
