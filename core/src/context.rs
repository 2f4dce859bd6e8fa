use std::rc::Rc;

use crate::errors::{Completion, EngineError, LoopError};
use crate::runtime::event_loop::EventLoop;
use crate::runtime::scheduler::SchedulerHandle;
use crate::runtime::value::Value;
use crate::runtime::value::promise::{Capability, Deferred, Promise, PromiseState};

/// An event loop plus the promise API bound to it.
pub struct Context {
    event_loop: Rc<EventLoop>,
    scheduler: SchedulerHandle,
}

impl Context {
    pub fn new() -> Self {
        Self::new_with_realtime(false)
    }

    pub fn new_with_realtime(realtime: bool) -> Self {
        Self::from_event_loop(EventLoop::new_with_realtime(realtime))
    }

    fn from_event_loop(event_loop: EventLoop) -> Self {
        let event_loop = Rc::new(event_loop);
        let scheduler: SchedulerHandle = event_loop.clone();
        Self {
            event_loop,
            scheduler,
        }
    }

    pub fn set_max_steps(&self, max: usize) {
        self.event_loop.set_max_steps(max);
    }

    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    pub fn promise<F>(&self, initializer: F) -> Promise
    where
        F: FnOnce(Capability, Capability) -> Completion<()>,
    {
        Promise::new(&self.scheduler, initializer)
    }

    pub fn deferred(&self) -> Deferred {
        Promise::deferred(&self.scheduler)
    }

    pub fn resolve(&self, value: impl Into<Value>) -> Promise {
        Promise::resolve(&self.scheduler, value)
    }

    pub fn reject(&self, reason: impl Into<Value>) -> Promise {
        Promise::reject(&self.scheduler, reason)
    }

    pub fn all<I>(&self, inputs: I) -> Promise
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Promise::all(&self.scheduler, inputs)
    }

    pub fn race<I>(&self, inputs: I) -> Promise
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Promise::race(&self.scheduler, inputs)
    }

    /// Fulfills with `value` once `delay_ms` have passed on the loop's clock.
    pub fn delay(&self, delay_ms: u64, value: impl Into<Value>) -> Promise {
        let deferred = self.deferred();
        let resolve = deferred.resolve.clone();
        let value = value.into();
        self.event_loop.set_timeout(
            delay_ms,
            Box::new(move || {
                resolve.call(value);
            }),
        );
        deferred.promise
    }

    /// Rejects with `reason` once `delay_ms` have passed on the loop's clock.
    pub fn delay_reject(&self, delay_ms: u64, reason: impl Into<Value>) -> Promise {
        let deferred = self.deferred();
        let reject = deferred.reject.clone();
        let reason = reason.into();
        self.event_loop.set_timeout(
            delay_ms,
            Box::new(move || {
                reject.call(reason);
            }),
        );
        deferred.promise
    }

    pub fn run_until_idle(&self) -> Result<(), EngineError> {
        self.event_loop.run_until_idle()?;
        Ok(())
    }

    /// Drives the loop until `promise` settles and returns its final state.
    pub fn settle(&self, promise: &Promise) -> Result<PromiseState, EngineError> {
        self.event_loop.run_until_settled(promise)?;
        match promise.state() {
            PromiseState::Pending => Err(LoopError::StillPending { id: promise.id() }.into()),
            settled => Ok(settled),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
