use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use thenable::{
    Context, Deferred, Engine, ErrorKind, Handler, Promise, PromiseError, PromiseState, Value,
};

/// Adapter handed to every case. All promises a case builds come from
/// [`Harness::deferred`], so only the public settlement surface is exercised.
pub struct Harness {
    ctx: Context,
    log: Rc<RefCell<Vec<String>>>,
}

impl Harness {
    pub fn new(engine: &Engine) -> Self {
        Self {
            ctx: engine.new_context(),
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn deferred(&self) -> Deferred {
        self.ctx.deferred()
    }

    pub fn resolved(&self, value: impl Into<Value>) -> Promise {
        let d = self.deferred();
        d.resolve.call(value);
        d.promise
    }

    pub fn rejected(&self, reason: impl Into<Value>) -> Promise {
        let d = self.deferred();
        d.reject.call(reason);
        d.promise
    }

    /// Fulfills after `delay_ms` on the loop's clock.
    pub fn delayed(&self, delay_ms: u64, value: impl Into<Value>) -> Promise {
        self.ctx.delay(delay_ms, value)
    }

    pub fn delayed_rejection(&self, delay_ms: u64, reason: impl Into<Value>) -> Promise {
        self.ctx.delay_reject(delay_ms, reason)
    }

    pub fn all(&self, inputs: Vec<Value>) -> Promise {
        self.ctx.all(inputs)
    }

    pub fn race(&self, inputs: Vec<Value>) -> Promise {
        self.ctx.race(inputs)
    }

    /// A handler that appends `{tag}{value}` to the case log and passes the
    /// value on.
    pub fn record(&self, tag: &'static str) -> Handler {
        let log = Rc::clone(&self.log);
        Handler::new(move |value| {
            log.borrow_mut().push(format!("{tag}{value}"));
            Ok(value)
        })
    }

    pub fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn drain(&self) -> Result<(), String> {
        self.ctx.run_until_idle().map_err(|err| err.to_string())
    }

    pub fn settle(&self, promise: &Promise) -> Result<PromiseState, String> {
        self.ctx.settle(promise).map_err(|err| err.to_string())
    }
}

/// An object whose `then` runs `body` with its resolve and reject arguments.
pub fn foreign_thenable<F>(body: F) -> Value
where
    F: Fn(&Value, &Value) -> Result<(), PromiseError> + 'static,
{
    Value::object([(
        "then",
        Value::function("then", move |_, args| {
            let resolve = args.first().cloned().unwrap_or(Value::Undefined);
            let reject = args.get(1).cloned().unwrap_or(Value::Undefined);
            body(&resolve, &reject)?;
            Ok(Value::Undefined)
        }),
    )])
}

pub fn invoke(function: &Value, argument: impl Into<Value>) -> Result<(), PromiseError> {
    function.call(&Value::Undefined, &[argument.into()])?;
    Ok(())
}

pub fn expect_eq<T: PartialEq + Debug>(what: &str, actual: T, expected: T) -> Result<(), String> {
    if actual == expected {
        Ok(())
    } else {
        Err(format!("{what}: expected {expected:?}, got {actual:?}"))
    }
}

pub fn expect_type_error(state: &PromiseState) -> Result<(), String> {
    match state {
        PromiseState::Rejected(reason) if reason.is_error_kind(ErrorKind::TypeError) => Ok(()),
        other => Err(format!("expected rejection with a TypeError, got {other:?}")),
    }
}
