//! Describing a caught task panic for structured logging.
//!
//! Neither peer runs application code via `std::panic::catch_unwind`
//! directly — that combinator doesn't compose across `.await` points
//! without an extra crate the rest of the stack doesn't use. Instead, each
//! long-lived connection task is itself wrapped in an inner `tokio::spawn`;
//! a panic inside it is caught by the runtime and surfaces as
//! `JoinError::is_panic()` on the outer `.await`, with the original panic
//! payload recoverable via `into_panic`. This function renders that payload
//! the same way the original source's recovered-panic log line would.
use std::any::Any;

/// Render a caught panic payload as a human-readable message, the way
/// `recover()`'s result is rendered in the original source's panic log
/// line.
#[must_use]
pub fn describe_panic_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic payload was not a string".to_string()
    }
}
