use miette::Diagnostic;
use thiserror::Error;

use crate::runtime::value::{ErrorKind, Value};

pub(crate) const CHAINING_CYCLE_MESSAGE: &str = "Chaining cycle detected for promise";

#[derive(Debug, Clone, Error, Diagnostic)]
pub enum PromiseError {
    /// A value raised by user code. It becomes the rejection reason verbatim.
    #[error("uncaught {value}")]
    Thrown { value: Value },

    #[error("type error: {message}")]
    TypeError { message: String },

    #[error("Chaining cycle detected for promise")]
    #[diagnostic(help("a promise was resolved with itself, directly or through a callback"))]
    ChainingCycle,
}

impl PromiseError {
    pub fn thrown(value: impl Into<Value>) -> Self {
        Self::Thrown {
            value: value.into(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError {
            message: message.into(),
        }
    }

    /// Converts the failure into the value a promise is rejected with.
    pub fn into_value(self) -> Value {
        match self {
            PromiseError::Thrown { value } => value,
            PromiseError::TypeError { message } => Value::error(ErrorKind::TypeError, message),
            PromiseError::ChainingCycle => {
                Value::error(ErrorKind::TypeError, CHAINING_CYCLE_MESSAGE)
            }
        }
    }
}
