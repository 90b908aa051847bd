#[cfg(test)]
#[path = "session_id_test.rs"]
mod tests;

/// Namespace prefix the agent service puts on every session identifier.
pub const WIRE_PREFIX: &str = "thread_";

/// A session identifier in its canonical wire form. The display form, used
/// anywhere a human sees the id, is the wire form with the prefix stripped.
/// Construction accepts either form and never double-prefixes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionId {
    wire: String,
}

impl SessionId {
    pub fn new(id: &str) -> SessionId {
        if id.starts_with(WIRE_PREFIX) {
            return SessionId {
                wire: id.to_string(),
            };
        }

        return SessionId {
            wire: format!("{WIRE_PREFIX}{id}"),
        };
    }

    pub fn wire(&self) -> &str {
        return &self.wire;
    }

    pub fn display(&self) -> &str {
        return self.wire.strip_prefix(WIRE_PREFIX).unwrap_or(&self.wire);
    }
}
