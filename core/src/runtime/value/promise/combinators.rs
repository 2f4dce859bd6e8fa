use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::runtime::scheduler::SchedulerHandle;
use crate::runtime::value::Value;

use super::{Deferred, Handler, Promise};

impl Promise {
    /// A promise resolved with `value` through the resolution procedure, so a
    /// promise or thenable argument is adopted rather than wrapped.
    pub fn resolve(scheduler: &SchedulerHandle, value: impl Into<Value>) -> Promise {
        let deferred = Deferred::new(scheduler);
        deferred.resolve.call(value);
        deferred.promise
    }

    /// A promise rejected with `reason`, never unwrapped.
    pub fn reject(scheduler: &SchedulerHandle, reason: impl Into<Value>) -> Promise {
        let deferred = Deferred::new(scheduler);
        deferred.reject.call(reason);
        deferred.promise
    }

    /// Fulfills with every input's value, in input order, once all inputs
    /// fulfill. Rejects with the first rejection; later settlements are
    /// ignored. Non-promise inputs count as already fulfilled.
    pub fn all<I>(scheduler: &SchedulerHandle, inputs: I) -> Promise
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let inputs: Vec<Promise> = inputs
            .into_iter()
            .map(|input| coerce(scheduler, input.into()))
            .collect();
        let deferred = Deferred::new(scheduler);

        if inputs.is_empty() {
            deferred.resolve.call(Value::array([]));
            return deferred.promise;
        }

        let slots: Rc<RefCell<Vec<Option<Value>>>> =
            Rc::new(RefCell::new(vec![None; inputs.len()]));
        let remaining = Rc::new(Cell::new(inputs.len()));

        for (index, input) in inputs.iter().enumerate() {
            let slots = Rc::clone(&slots);
            let remaining = Rc::clone(&remaining);
            let resolve = deferred.resolve.clone();
            let on_fulfilled = Handler::new(move |value| {
                slots.borrow_mut()[index] = Some(value);
                remaining.set(remaining.get() - 1);
                if remaining.get() == 0 {
                    let values: Vec<Value> = slots
                        .borrow_mut()
                        .drain(..)
                        .map(|slot| slot.unwrap_or(Value::Undefined))
                        .collect();
                    resolve.call(values);
                }
                Ok(Value::Undefined)
            });

            let reject = deferred.reject.clone();
            let on_rejected = Handler::new(move |reason| {
                reject.call(reason);
                Ok(Value::Undefined)
            });

            input.then(Some(on_fulfilled), Some(on_rejected));
        }

        deferred.promise
    }

    /// Settles like whichever input settles first. An empty input never
    /// settles.
    pub fn race<I>(scheduler: &SchedulerHandle, inputs: I) -> Promise
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let deferred = Deferred::new(scheduler);

        for input in inputs {
            let input = coerce(scheduler, input.into());
            let resolve = deferred.resolve.clone();
            let reject = deferred.reject.clone();
            input.then(
                Some(Handler::new(move |value| {
                    resolve.call(value);
                    Ok(Value::Undefined)
                })),
                Some(Handler::new(move |reason| {
                    reject.call(reason);
                    Ok(Value::Undefined)
                })),
            );
        }

        deferred.promise
    }
}

fn coerce(scheduler: &SchedulerHandle, value: Value) -> Promise {
    match value {
        Value::Promise(promise) => promise,
        other => Promise::resolve(scheduler, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::event_loop::EventLoop;
    use crate::runtime::value::promise::PromiseState;

    fn setup() -> (Rc<EventLoop>, SchedulerHandle) {
        let event_loop = Rc::new(EventLoop::new());
        let scheduler: SchedulerHandle = event_loop.clone();
        (event_loop, scheduler)
    }

    #[test]
    fn resolve_adopts_existing_promises() {
        let (event_loop, scheduler) = setup();
        let original = Promise::resolve(&scheduler, 4);
        let adopted = Promise::resolve(&scheduler, original.clone());
        assert!(!adopted.ptr_eq(&original));

        event_loop.run_until_idle().unwrap();
        assert_eq!(adopted.state(), PromiseState::Fulfilled(Value::from(4)));
    }

    #[test]
    fn all_keeps_input_order_not_arrival_order() {
        let (event_loop, scheduler) = setup();
        let first = Deferred::new(&scheduler);
        let second = Deferred::new(&scheduler);
        let all = Promise::all(
            &scheduler,
            [first.promise.clone(), second.promise.clone()],
        );

        second.resolve.call("b");
        event_loop.run_until_idle().unwrap();
        first.resolve.call("a");
        event_loop.run_until_idle().unwrap();

        assert_eq!(
            all.state(),
            PromiseState::Fulfilled(Value::array([Value::from("a"), Value::from("b")]))
        );
    }

    #[test]
    fn all_of_nothing_fulfills_immediately() {
        let (_event_loop, scheduler) = setup();
        let all = Promise::all(&scheduler, Vec::<Value>::new());
        assert_eq!(all.state(), PromiseState::Fulfilled(Value::array([])));
    }

    #[test]
    fn all_accepts_plain_values() {
        let (event_loop, scheduler) = setup();
        let all = Promise::all(&scheduler, [Value::from(1), Value::from("two")]);
        event_loop.run_until_idle().unwrap();
        assert_eq!(
            all.state(),
            PromiseState::Fulfilled(Value::array([Value::from(1), Value::from("two")]))
        );
    }

    #[test]
    fn race_of_nothing_stays_pending() {
        let (event_loop, scheduler) = setup();
        let race = Promise::race(&scheduler, Vec::<Promise>::new());
        event_loop.run_until_idle().unwrap();
        assert!(race.is_pending());
    }

    #[test]
    fn race_takes_first_rejection_too() {
        let (event_loop, scheduler) = setup();
        let slow = Deferred::new(&scheduler);
        let fast = Deferred::new(&scheduler);
        let race = Promise::race(&scheduler, [slow.promise.clone(), fast.promise.clone()]);

        fast.reject.call("fast");
        event_loop.run_until_idle().unwrap();
        slow.resolve.call("slow");
        event_loop.run_until_idle().unwrap();

        assert_eq!(race.state(), PromiseState::Rejected(Value::from("fast")));
    }
}
