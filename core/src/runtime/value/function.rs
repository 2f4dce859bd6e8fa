use std::rc::Rc;

use crate::errors::Completion;
use crate::runtime::value::Value;

type Callback = dyn Fn(&Value, &[Value]) -> Completion;

#[derive(Clone)]
pub struct NativeFunction {
    name: String,
    callback: Rc<Callback>,
}

impl std::fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

impl NativeFunction {
    pub fn from_closure<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Completion + 'static,
    {
        Self {
            name: name.into(),
            callback: Rc::new(callback),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, this: &Value, args: &[Value]) -> Completion {
        (self.callback)(this, args)
    }
}
