use std::cell::RefCell;

use crate::runtime::scheduler::Scheduler;
use crate::runtime::value::Value;

use super::registry::{CallbackRegistry, Reaction, dispatch};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PromiseState {
    #[default]
    Pending,
    Fulfilled(Value),
    Rejected(Value),
}

impl PromiseState {
    pub fn is_pending(&self) -> bool {
        matches!(self, PromiseState::Pending)
    }

    pub fn outcome(&self) -> Option<(Outcome, &Value)> {
        match self {
            PromiseState::Pending => None,
            PromiseState::Fulfilled(value) => Some((Outcome::Fulfilled, value)),
            PromiseState::Rejected(reason) => Some((Outcome::Rejected, reason)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PromiseState::Pending => "pending",
            PromiseState::Fulfilled(_) => "fulfilled",
            PromiseState::Rejected(_) => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Fulfilled,
    Rejected,
}

impl Outcome {
    fn settled(self, value: Value) -> PromiseState {
        match self {
            Outcome::Fulfilled => PromiseState::Fulfilled(value),
            Outcome::Rejected => PromiseState::Rejected(value),
        }
    }
}

/// Status, result and the two callback lists of a single promise.
#[derive(Default)]
pub(crate) struct StateCell {
    state: RefCell<PromiseState>,
    on_fulfilled: CallbackRegistry,
    on_rejected: CallbackRegistry,
}

impl StateCell {
    pub fn snapshot(&self) -> PromiseState {
        self.state.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }

    pub fn waiting(&self, outcome: Outcome) -> usize {
        self.registry(outcome).len()
    }

    /// Performs the one and only transition out of pending. Returns `false`
    /// without touching anything if the cell already settled.
    pub fn settle(&self, outcome: Outcome, value: Value, scheduler: &dyn Scheduler) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if !state.is_pending() {
                return false;
            }
            *state = outcome.settled(value.clone());
        }

        let other = match outcome {
            Outcome::Fulfilled => Outcome::Rejected,
            Outcome::Rejected => Outcome::Fulfilled,
        };
        self.registry(other).clear();
        self.registry(outcome).drain(&value, scheduler);
        true
    }

    /// Queues `reaction` for `outcome`. Once settled the reaction is dispatched
    /// straight away when the outcome matches and dropped when it does not.
    pub fn subscribe(&self, outcome: Outcome, reaction: Reaction, scheduler: &dyn Scheduler) {
        let settled = self
            .state
            .borrow()
            .outcome()
            .map(|(current, value)| (current, value.clone()));

        match settled {
            None => self.registry(outcome).push(reaction),
            Some((settled, value)) if settled == outcome => dispatch(scheduler, reaction, value),
            Some(_) => {}
        }
    }

    fn registry(&self, outcome: Outcome) -> &CallbackRegistry {
        match outcome {
            Outcome::Fulfilled => &self.on_fulfilled,
            Outcome::Rejected => &self.on_rejected,
        }
    }
}
