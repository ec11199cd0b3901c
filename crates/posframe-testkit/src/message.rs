//! A minimal in-memory ISO 8583-ish message: a sparse map from field id to
//! string value. No bitmap encoding, no field-specific formatting (dates,
//! binary amounts, etc.) — just enough structure to exercise correlation,
//! framing, and the client/server session machinery end to end.

use std::collections::BTreeMap;

use posframe_proto::IsoMessage;

/// A sparse ISO 8583-ish message keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosMessage {
    fields: BTreeMap<u32, String>,
}

impl PosMessage {
    /// Build a message from `(field, value)` pairs.
    #[must_use]
    pub fn new(fields: impl IntoIterator<Item = (u32, impl Into<String>)>) -> Self {
        let mut message = Self::default();
        for (id, value) in fields {
            message.set_field(id, value.into());
        }
        message
    }
}

impl IsoMessage for PosMessage {
    fn get_field(&self, id: u32) -> Option<&str> {
        self.fields.get(&id).map(String::as_str)
    }

    fn set_field(&mut self, id: u32, value: impl Into<String>) {
        self.fields.insert(id, value.into());
    }

    fn bitmap(&self) -> Vec<u32> {
        self.fields.keys().copied().collect()
    }

    fn log(&self) -> String {
        let body = self.fields.iter().map(|(id, value)| format!("\"{id}\":\"{value}\"")).collect::<Vec<_>>().join(",");
        format!("{{{body}}}")
    }
}
