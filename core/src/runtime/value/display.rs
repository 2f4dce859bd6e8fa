use std::fmt;
use std::rc::Rc;

use super::Value;
use super::promise::PromiseState;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut Vec::new())
    }
}

/// `seen` holds the objects and promises currently being printed; meeting
/// one again prints `[Circular]`.
fn write_value(
    f: &mut fmt::Formatter<'_>,
    value: &Value,
    seen: &mut Vec<*const ()>,
) -> fmt::Result {
    match value {
        Value::Undefined => write!(f, "undefined"),
        Value::Null => write!(f, "null"),
        Value::Boolean(b) => write!(f, "{b}"),
        Value::Number(n) => {
            if n.fract() == 0.0 && n.is_finite() {
                write!(f, "{}", *n as i64)
            } else {
                write!(f, "{n}")
            }
        }
        Value::String(s) => write!(f, "{s}"),
        Value::Array(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item, seen)?;
            }
            f.write_str("]")
        }
        Value::Object(object) => {
            if let Some(name) = object.name() {
                return write!(f, "function {name}() {{ [native code] }}");
            }
            let ptr = Rc::as_ptr(object).cast::<()>();
            if seen.contains(&ptr) {
                return f.write_str("[Circular]");
            }
            seen.push(ptr);
            f.write_str("{ ")?;
            for (i, (key, value)) in object.data_properties().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key}: ")?;
                write_value(f, value, seen)?;
            }
            seen.pop();
            f.write_str(" }")
        }
        Value::Error(err) => write!(f, "{}: {}", err.kind.name(), err.message),
        Value::Promise(promise) => {
            let ptr = promise.as_ptr();
            if seen.contains(&ptr) {
                return f.write_str("[Circular]");
            }
            seen.push(ptr);
            match promise.state() {
                PromiseState::Pending => f.write_str("Promise { <pending> }")?,
                PromiseState::Fulfilled(value) => {
                    f.write_str("Promise { <fulfilled>: ")?;
                    write_value(f, &value, seen)?;
                    f.write_str(" }")?;
                }
                PromiseState::Rejected(reason) => {
                    f.write_str("Promise { <rejected>: ")?;
                    write_value(f, &reason, seen)?;
                    f.write_str(" }")?;
                }
            }
            seen.pop();
            Ok(())
        }
    }
}
