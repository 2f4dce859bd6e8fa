use crate::runtime::value::{NativeFunction, Value};

#[derive(Debug, Clone)]
pub struct Property {
    pub value: Value,
    pub getter: Option<NativeFunction>,
}

impl Property {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            getter: None,
        }
    }

    pub fn with_getter(getter: NativeFunction) -> Self {
        Self {
            value: Value::Undefined,
            getter: Some(getter),
        }
    }
}
