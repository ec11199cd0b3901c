//! Request → response MTI mapping.
//!
//! A small, immutable lookup (not a module-level mutable singleton, per the
//! design notes) used when field 0 is part of the configured correlation
//! key: the client registers its in-flight slot under the *response* MTI it
//! expects, so that when the response frame arrives its own (as-is) field 0
//! matches the key the client built at `Send` time.

use thiserror::Error;

/// Failure to determine the expected response MTI for a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no known response MTI for request MTI {0:?}")]
pub struct UnknownMti(pub String);

/// Map a request MTI to its expected response MTI.
///
/// # Errors
///
/// Returns [`UnknownMti`] for any MTI not in the fixed table below. Callers
/// (`Send`/`Wait`) propagate this as a correlation error rather than
/// guessing.
pub fn response_mti(request_mti: &str) -> Result<&'static str, UnknownMti> {
    match request_mti {
        "0100" => Ok("0110"),
        "0200" => Ok("0210"),
        "0400" => Ok("0410"),
        "0420" => Ok("0430"),
        "1100" => Ok("1110"),
        "1420" => Ok("1430"),
        other => Err(UnknownMti(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_mtis() {
        assert_eq!(response_mti("0200"), Ok("0210"));
        assert_eq!(response_mti("1420"), Ok("1430"));
    }

    #[test]
    fn rejects_unknown_mti() {
        assert_eq!(response_mti("9999"), Err(UnknownMti("9999".to_string())));
    }
}
