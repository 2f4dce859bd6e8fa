mod display;
mod error;
mod function;
mod json;
pub mod object;
pub mod promise;

pub use error::{ErrorKind, ErrorValue};
pub use function::NativeFunction;

use std::rc::Rc;

use crate::errors::{Completion, PromiseError};
use object::Object;
use promise::{Handler, Promise};

/// A dynamically typed value flowing through promises.
///
/// Objects may carry accessor properties and may be callable, which is all
/// the resolution procedure needs to recognise thenables from other
/// implementations.
#[derive(Debug, Clone)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Rc<[Value]>),
    Object(Rc<Object>),
    Error(Rc<ErrorValue>),
    Promise(Promise),
}

/// Arrays and errors compare structurally, objects and promises by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Promise(a), Value::Promise(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Value {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Value::Error(Rc::new(ErrorValue::new(kind, message)))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }

    /// A plain object with data properties.
    pub fn object<K: Into<String>>(properties: impl IntoIterator<Item = (K, Value)>) -> Self {
        let object = Object::new();
        for (key, value) in properties {
            object.set(key, value);
        }
        Value::Object(Rc::new(object))
    }

    /// A callable object. The closure receives the receiver and the arguments.
    pub fn function<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Completion + 'static,
    {
        Value::Object(Rc::new(Object::function(NativeFunction::from_closure(
            name, callback,
        ))))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Object(object) if object.is_callable())
    }

    pub fn is_error_kind(&self, kind: ErrorKind) -> bool {
        matches!(self, Value::Error(err) if err.kind == kind)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_promise(&self) -> Option<&Promise> {
        match self {
            Value::Promise(promise) => Some(promise),
            _ => None,
        }
    }

    /// Reads a property. Accessor properties run their getter, which may fail.
    ///
    /// Promises expose `then` and `catch` as bound functions so that foreign
    /// code can treat them as thenables.
    pub fn get(&self, key: &str) -> Completion {
        match self {
            Value::Object(object) => object.get(self, key),
            Value::Promise(promise) => Ok(promise_method(promise, key)),
            _ => Ok(Value::Undefined),
        }
    }

    /// Calls the value with `this` as receiver.
    pub fn call(&self, this: &Value, args: &[Value]) -> Completion {
        match self {
            Value::Object(object) => object.call(this, args),
            other => Err(PromiseError::type_error(format!("{other} is not a function"))),
        }
    }
}

fn promise_method(promise: &Promise, key: &str) -> Value {
    let promise = promise.clone();
    match key {
        "then" => Value::function("then", move |_, args| {
            let on_fulfilled = args.first().and_then(Handler::from_value);
            let on_rejected = args.get(1).and_then(Handler::from_value);
            Ok(Value::Promise(promise.then(on_fulfilled, on_rejected)))
        }),
        "catch" => Value::function("catch", move |_, args| {
            let on_rejected = args.first().and_then(Handler::from_value);
            Ok(Value::Promise(promise.catch(on_rejected)))
        }),
        _ => Value::Undefined,
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items.into())
    }
}

impl From<Promise> for Value {
    fn from(promise: Promise) -> Self {
        Value::Promise(promise)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}
