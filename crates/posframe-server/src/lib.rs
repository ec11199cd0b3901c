//! Accepting (server) peer for the posframe POS protocol.
//!
//! Binds a listen address, bounds concurrent connections with a semaphore,
//! and dispatches each inbound frame to an application-supplied
//! [`Handler`]. See [`ServerSession`] for the entry point.

#![forbid(unsafe_code)]

mod config;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::ServerError;
pub use handler::{Handler, ResponseSender};
pub use server::ServerSession;
