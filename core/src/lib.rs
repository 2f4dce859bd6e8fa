//! A Promise/A+ settlement engine.
//!
//! Promises here carry dynamically typed [`Value`]s so that any object with a
//! callable `then` property is recognised as a thenable, whichever
//! implementation produced it. Callbacks are never run inline: they go through
//! an injected [`Scheduler`], normally the [`EventLoop`] owned by a
//! [`Context`].

pub mod context;
pub mod engine;
pub mod errors;
pub mod runtime;

pub use context::Context;
pub use engine::Engine;
pub use errors::{Completion, EngineError, LoopError, PromiseError};
pub use runtime::event_loop::EventLoop;
pub use runtime::scheduler::{Job, Scheduler, SchedulerHandle};
pub use runtime::value::promise::{
    Capability, Deferred, Handler, Outcome, Promise, PromiseState,
};
pub use runtime::value::{ErrorKind, ErrorValue, Value};
