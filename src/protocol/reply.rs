//! Reply model
//!
//! A single server reply as read off the wire, before any per-command
//! interpretation. Owned and consumed exactly once by the decoder; Rust's
//! move semantics release the buffers on every path, early returns included.

use bytes::Bytes;

/// One parsed server reply
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Status line, e.g. "OK" (`+...`)
    Status(String),

    /// Server-reported error message (`-...`)
    Error(String),

    /// Signed 64-bit integer (`:...`)
    Integer(i64),

    /// Bulk string payload; `None` is the nil bulk (`$-1`), meaning absent
    Bulk(Option<Bytes>),

    /// Array of nested replies; `None` is the nil array (`*-1`),
    /// which is distinct from an empty array
    Array(Option<Vec<Reply>>),
}

impl Reply {
    /// Short name of the active variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Status(_) => "status",
            Reply::Error(_) => "error",
            Reply::Integer(_) => "integer",
            Reply::Bulk(_) => "bulk",
            Reply::Array(_) => "array",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_every_variant() {
        assert_eq!(Reply::Status("OK".into()).kind(), "status");
        assert_eq!(Reply::Error("ERR".into()).kind(), "error");
        assert_eq!(Reply::Integer(7).kind(), "integer");
        assert_eq!(Reply::Bulk(None).kind(), "bulk");
        assert_eq!(Reply::Array(Some(vec![])).kind(), "array");
    }
}
