//! Correlation key construction.
//!
//! The key construction logic is identical in `Send` and `Wait` so the
//! registration and the lookup match exactly — both call
//! [`request_key`], which is built from the *request* message and
//! substitutes field 0 with the expected response MTI. The client's listen
//! loop instead calls [`response_key`] against the arrived message, which
//! uses field 0 as-is (it already carries a response MTI).

use posframe_proto::{IsoMessage, response_mti};

use crate::error::CorrelationError;

fn build(fields: &[u32], msg: &impl IsoMessage, substitute_mti: bool) -> Result<String, CorrelationError> {
    let mut key = String::new();
    for &field in fields {
        if field == 0 && substitute_mti {
            let mti = msg.get_field(0).ok_or(CorrelationError::MissingField { field: 0 })?;
            key.push_str(response_mti(mti)?);
            continue;
        }
        let value = msg.get_field(field).ok_or(CorrelationError::MissingField { field })?;
        key.push_str(value);
    }
    Ok(key)
}

/// Build the key `Send`/`Wait` register and look up under, derived from the
/// request message with field 0 mapped to its expected response MTI.
pub fn request_key(fields: &[u32], request: &impl IsoMessage) -> Result<String, CorrelationError> {
    build(fields, request, true)
}

/// Build the key for an arrived message, using field 0 verbatim.
pub fn response_key(fields: &[u32], message: &impl IsoMessage) -> Result<String, CorrelationError> {
    build(fields, message, false)
}
