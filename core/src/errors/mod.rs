mod loop_error;
mod promise_error;

pub use loop_error::LoopError;
pub use promise_error::PromiseError;

use miette::Diagnostic;
use thiserror::Error;

use crate::runtime::value::Value;

/// Outcome of a user callback, an initializer or a property read.
pub type Completion<T = Value> = Result<T, PromiseError>;

/// Unified error type wrapping all engine errors.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Promise(#[from] PromiseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Loop(#[from] LoopError),
}
