//! Initiating (client) peer for the posframe POS protocol.
//!
//! Dials a server, serializes writes, and correlates responses back to the
//! request that triggered them via [`posframe_core::InFlightTable`]. See
//! [`ClientSession`] for the entry point.

#![forbid(unsafe_code)]

mod client;
mod config;
mod error;

pub use client::{ClientSession, PendingTransaction};
pub use config::ClientConfig;
pub use error::ClientError;
