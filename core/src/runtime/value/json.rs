use std::rc::Rc;

use serde_json::{Map, Number};

use super::Value;
use super::object::Object;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl Value {
    /// JSON rendering of the value. `None` for values JSON cannot carry:
    /// `undefined`, functions and promises. An object nested inside itself
    /// renders as the string `"[Circular]"`.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        to_json_value(self, &mut Vec::new())
    }
}

fn to_json_value(value: &Value, seen: &mut Vec<*const Object>) -> Option<serde_json::Value> {
    let json = match value {
        Value::Undefined | Value::Promise(_) => return None,
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
            serde_json::Value::Number(Number::from(*n as i64))
        }
        Value::Number(n) => Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|item| to_json_value(item, seen).unwrap_or(serde_json::Value::Null))
                .collect(),
        ),
        Value::Object(object) if object.is_callable() => return None,
        Value::Object(object) => {
            let ptr = Rc::as_ptr(object);
            if seen.contains(&ptr) {
                return Some(serde_json::Value::String("[Circular]".into()));
            }
            seen.push(ptr);
            let mut map = Map::new();
            for (key, value) in object.data_properties() {
                if let Some(json) = to_json_value(&value, seen) {
                    map.insert(key, json);
                }
            }
            seen.pop();
            serde_json::Value::Object(map)
        }
        Value::Error(err) => {
            let mut map = Map::new();
            map.insert("name".into(), err.kind.name().into());
            map.insert("message".into(), err.message.clone().into());
            serde_json::Value::Object(map)
        }
    };
    Some(json)
}
