//! Log-correlation attribute bag.
//!
//! Mirrors `context.Attributes` in the original source: a small ordered
//! string map a connection context exposes purely so log lines can be
//! tagged consistently, without every call site re-deriving the same
//! key/value pairs by hand.

use std::collections::BTreeMap;
use std::fmt;

/// Key/value pairs attached to a connection for log correlation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(BTreeMap<&'static str, String>);

impl Attributes {
    /// Start building an attribute set for a connection id.
    #[must_use]
    pub fn for_connection(conn_id: uuid::Uuid) -> Self {
        let mut map = BTreeMap::new();
        map.insert("connId", conn_id.to_string());
        Self(map)
    }

    /// Attach the remote address.
    #[must_use]
    pub fn with_remote_addr(mut self, addr: impl fmt::Display) -> Self {
        self.0.insert("remoteAddr", addr.to_string());
        self
    }

    /// Iterate key/value pairs in a stable order, for log formatting.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in self.iter() {
            write!(f, ",\"{k}\":\"{v}\"")?;
        }
        Ok(())
    }
}
