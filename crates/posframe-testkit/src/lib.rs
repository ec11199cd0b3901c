//! Reference packager and message type for posframe's own tests and demo
//! binaries.
//!
//! Nothing here is a production ISO 8583 field dictionary — it exists so
//! the framework crates have a concrete [`posframe_proto::Packager`] to
//! exercise without depending on a real (and licensed) field-layout
//! implementation.

#![forbid(unsafe_code)]

mod handler;
mod message;
mod packager;

pub use handler::EchoHandler;
pub use message::PosMessage;
pub use packager::TlvPackager;
