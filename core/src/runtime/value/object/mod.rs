mod property;

pub use property::Property;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use crate::errors::{Completion, PromiseError};
use crate::runtime::value::{NativeFunction, Value};

/// A property bag, optionally callable.
#[derive(Default)]
pub struct Object {
    properties: RefCell<HashMap<String, Property>>,
    call: Option<NativeFunction>,
}

/// Lists keys only; property values may lead back to this object.
impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.properties.borrow().keys().cloned().collect();
        keys.sort();
        f.debug_struct("Object")
            .field("keys", &keys)
            .field("call", &self.call)
            .finish()
    }
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function(call: NativeFunction) -> Self {
        Self {
            properties: RefCell::new(HashMap::new()),
            call: Some(call),
        }
    }

    pub fn is_callable(&self) -> bool {
        self.call.is_some()
    }

    pub fn name(&self) -> Option<&str> {
        self.call.as_ref().map(NativeFunction::name)
    }

    /// Reads `key` with `this` as the getter receiver. Missing keys read as
    /// `undefined`.
    pub fn get(&self, this: &Value, key: &str) -> Completion {
        // Clone out before running the getter: it may touch this object.
        let property = self.properties.borrow().get(key).cloned();
        match property {
            Some(Property {
                getter: Some(getter),
                ..
            }) => getter.call(this, &[]),
            Some(property) => Ok(property.value),
            None => Ok(Value::Undefined),
        }
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.properties
            .borrow_mut()
            .insert(key.into(), Property::new(value));
    }

    pub fn set_getter<F>(&self, key: impl Into<String>, getter: F)
    where
        F: Fn(&Value, &[Value]) -> Completion + 'static,
    {
        let key = key.into();
        let getter = NativeFunction::from_closure(format!("get {key}"), getter);
        self.properties
            .borrow_mut()
            .insert(key, Property::with_getter(getter));
    }

    pub fn call(&self, this: &Value, args: &[Value]) -> Completion {
        match &self.call {
            Some(function) => function.call(this, args),
            None => Err(PromiseError::type_error("object is not a function")),
        }
    }

    /// Data properties in key order. Accessors are skipped.
    pub fn data_properties(&self) -> Vec<(String, Value)> {
        let mut pairs: Vec<(String, Value)> = self
            .properties
            .borrow()
            .iter()
            .filter(|(_, p)| p.getter.is_none())
            .map(|(k, p)| (k.clone(), p.value.clone()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }
}
