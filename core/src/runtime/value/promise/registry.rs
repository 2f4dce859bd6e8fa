use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::runtime::scheduler::Scheduler;
use crate::runtime::value::Value;

/// A callback waiting for one outcome of a promise.
pub(crate) type Reaction = Box<dyn FnOnce(Value)>;

/// Ordered callbacks for one outcome of one promise.
#[derive(Default)]
pub(crate) struct CallbackRegistry {
    callbacks: RefCell<VecDeque<Reaction>>,
}

impl CallbackRegistry {
    pub fn push(&self, reaction: Reaction) {
        self.callbacks.borrow_mut().push_back(reaction);
    }

    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    /// Hands every callback to the scheduler in registration order.
    ///
    /// Entries are popped one at a time with no borrow held across the
    /// scheduler call, so callbacks pushed while draining are still delivered.
    pub fn drain(&self, value: &Value, scheduler: &dyn Scheduler) {
        while let Some(reaction) = self.pop_front() {
            dispatch(scheduler, reaction, value.clone());
        }
    }

    pub fn clear(&self) {
        let callbacks = std::mem::take(&mut *self.callbacks.borrow_mut());
        discard(callbacks);
    }

    fn pop_front(&self) -> Option<Reaction> {
        self.callbacks.borrow_mut().pop_front()
    }
}

impl Drop for CallbackRegistry {
    fn drop(&mut self) {
        discard(std::mem::take(self.callbacks.get_mut()));
    }
}

thread_local! {
    static DISCARDED: RefCell<Vec<Reaction>> = const { RefCell::new(Vec::new()) };
    static DISCARDING: Cell<bool> = const { Cell::new(false) };
}

/// Drops reactions without recursing through the promises they own.
///
/// A reaction owns its derived promise, whose registries own further
/// reactions, so a plain drop of a long pending chain nests once per link.
/// Nested calls only queue their reactions; the outermost call drops them
/// one at a time.
fn discard(callbacks: VecDeque<Reaction>) {
    if callbacks.is_empty() {
        return;
    }
    let queued = DISCARDED.try_with(|discarded| discarded.borrow_mut().extend(callbacks));
    if queued.is_err() {
        return;
    }
    if DISCARDING.with(|flag| flag.replace(true)) {
        return;
    }

    while let Some(reaction) = DISCARDED.with(|discarded| discarded.borrow_mut().pop()) {
        drop(reaction);
    }
    DISCARDING.with(|flag| flag.set(false));
}

pub(crate) fn dispatch(scheduler: &dyn Scheduler, reaction: Reaction, value: Value) {
    scheduler.schedule(Box::new(move || reaction(value)));
}
