//! Connection lifecycle, framed-message I/O loop, and in-flight
//! request-correlation engine shared by the posframe client and server
//! peers.
//!
//! This crate has no notion of "client" or "server" roles — it owns the
//! parts that are identical on both: connection/request contexts, the
//! single-writer-per-socket guarantee, the STAN counter, correlation key
//! construction, the in-flight table, and the framed read/write primitives.
//! Role-specific orchestration (dial vs. accept, auto-reconnect vs.
//! backpressure semaphore) lives in `posframe-client` and
//! `posframe-server`.

#![forbid(unsafe_code)]

mod attributes;
mod context;
mod correlation;
mod error;
mod framing;
mod inflight;
mod panics;
mod safe_writer;
mod stan;

pub use attributes::Attributes;
pub use context::{ConnectionContext, RequestContext};
pub use correlation::{request_key, response_key};
pub use error::CorrelationError;
pub use framing::{FrameOutcome, assemble_frame, read_frame};
pub use inflight::InFlightTable;
pub use panics::describe_panic_payload;
pub use safe_writer::SafeWriter;
pub use stan::StanCounter;
