//! Command definitions
//!
//! A command is an ordered sequence of byte-string arguments with the
//! command name first. The builder encodes whatever it is given; arity
//! rules (e.g. MSET key/value pairing) are checked by callers before any
//! wire traffic.

/// A command invocation to send to the server
#[derive(Debug, Clone)]
pub struct Command {
    args: Vec<Vec<u8>>,
}

impl Command {
    /// Start a command with its name (e.g. "GET")
    pub fn new(name: &str) -> Self {
        Self {
            args: vec![name.as_bytes().to_vec()],
        }
    }

    /// Append one argument; arguments keep their insertion order
    pub fn arg(mut self, arg: impl AsRef<[u8]>) -> Self {
        self.args.push(arg.as_ref().to_vec());
        self
    }

    /// Append every item of an iterator as an argument
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[u8]>,
    {
        for a in args {
            self.args.push(a.as_ref().to_vec());
        }
        self
    }

    /// Build a command from a raw command line, split on whitespace.
    ///
    /// Used by the raw `exec` escape hatch. Returns `None` for a line with
    /// no command name.
    pub fn from_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        Some(Command::new(name).args(parts))
    }

    /// Ordered argument list, command name first
    pub fn parts(&self) -> &[Vec<u8>] {
        &self.args
    }

    /// Command name as UTF-8, for logging
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.args[0]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_argument_order() {
        let cmd = Command::new("SET").arg("key").arg("value");
        let parts = cmd.parts();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], b"SET");
        assert_eq!(parts[1], b"key");
        assert_eq!(parts[2], b"value");
    }

    #[test]
    fn from_line_splits_on_whitespace() {
        let cmd = Command::from_line("  zadd  board 10 alice ").unwrap();
        assert_eq!(cmd.name(), "zadd");
        assert_eq!(cmd.parts().len(), 4);
    }

    #[test]
    fn from_line_rejects_empty_input() {
        assert!(Command::from_line("   ").is_none());
    }
}
