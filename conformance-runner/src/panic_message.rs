use std::any::Any;

/// Failure reason for a case that panicked, carrying the panic message when
/// the payload is a string.
pub fn format_panic(payload: Box<dyn Any + Send>) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .map(|msg| msg.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned());

    match message {
        Some(message) => format!("case panicked: {message}"),
        None => "case panicked with a non-string payload".to_string(),
    }
}
