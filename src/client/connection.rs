//! Connection lifecycle
//!
//! Owns the TCP stream and the strict request/reply exchange: every `send`
//! writes one command and reads exactly one reply. The protocol allows no
//! interleaving on a single stream, so a connection never has more than one
//! request in flight; concurrent callers pool connections externally.

use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use crate::config::Config;
use crate::error::{CarmineError, Result};
use crate::protocol::{read_reply, write_command, Command, Reply, ReplyShape};

/// Buffered read/write handles over one TCP stream
struct Wire {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Wire {
    /// Wrap a connected stream in buffered halves
    ///
    /// Disables Nagle's algorithm; request/reply round-trips are latency
    /// bound.
    fn new(stream: TcpStream) -> Result<Self> {
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
        })
    }

    fn set_timeouts(&self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.reader.get_ref();
        let write_stream = self.writer.get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }
}

/// A client connection to one server
///
/// Lifecycle: configured (no stream) → connected → disconnected. `connect`
/// is reconnect-safe and replaces any prior stream; `disconnect` is a no-op
/// when already disconnected. No command may be sent while disconnected.
pub struct Connection {
    config: Config,
    wire: Option<Wire>,
}

impl Connection {
    /// Create a configured, unconnected client
    pub fn new(config: Config) -> Self {
        Self { config, wire: None }
    }

    /// Adopt an externally established stream
    ///
    /// The connection is live immediately and no AUTH handshake is
    /// performed; callers hand over streams they have already
    /// authenticated (pool integration). Dropping the connection closes
    /// the adopted handles; shutdown failure is never fatal.
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let mut config = Config::default();
        if let Ok(peer) = stream.peer_addr() {
            config.host = peer.ip().to_string();
            config.port = peer.port();
        }

        Ok(Self {
            config,
            wire: Some(Wire::new(stream)?),
        })
    }

    /// Whether the connection is currently live
    pub fn is_connected(&self) -> bool {
        self.wire.is_some()
    }

    /// Open the stream to the configured address and authenticate
    ///
    /// Replaces any prior stream. A non-empty configured password triggers
    /// the AUTH handshake; anything but a status "OK" reply leaves the
    /// connection not-live and fails with
    /// [`CarmineError::Authentication`].
    pub fn connect(&mut self) -> Result<()> {
        let addr = self.config.addr();
        tracing::debug!("Connecting to {}", addr);

        // Reconnect replaces the prior stream
        self.wire = None;

        let stream = TcpStream::connect(&addr)?;
        let wire = Wire::new(stream)?;
        wire.set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)?;
        self.wire = Some(wire);

        if !self.config.password.is_empty() {
            self.auth()?;
        }

        tracing::debug!("Connected to {}", addr);
        Ok(())
    }

    /// Release the stream; safe to call when already disconnected
    pub fn disconnect(&mut self) {
        if let Some(wire) = self.wire.take() {
            tracing::debug!("Disconnecting from {}", self.config.addr());
            // Close failure is not actionable at this point
            let _ = wire.writer.get_ref().shutdown(Shutdown::Both);
        }
    }

    /// Send one command and read exactly one reply
    ///
    /// Transport failure marks the connection not-live before the error
    /// propagates; the caller reconnects explicitly.
    pub fn send(&mut self, command: &Command) -> Result<Reply> {
        let wire = self.wire.as_mut().ok_or_else(|| {
            CarmineError::Connection("not connected".to_string())
        })?;

        tracing::trace!("Sending command: {}", command.name());

        let reply = write_command(&mut wire.writer, command)
            .and_then(|_| read_reply(&mut wire.reader));

        match reply {
            Err(CarmineError::Io(e)) => {
                // Unrecoverable: a half-written request or half-read reply
                // leaves the stream out of sync
                self.wire = None;
                Err(CarmineError::Io(e))
            }
            other => other,
        }
    }

    /// AUTH handshake; any reply but status "OK" is a rejection
    fn auth(&mut self) -> Result<()> {
        let command = Command::new("AUTH").arg(self.config.password.clone());

        let outcome = match self.send(&command) {
            Ok(Reply::Status(s)) if s == "OK" => Ok(()),
            Ok(Reply::Error(msg)) => Err(CarmineError::Authentication(msg)),
            Ok(other) => Err(CarmineError::Authentication(format!(
                "unexpected {} reply to AUTH",
                other.kind()
            ))),
            Err(e) => Err(CarmineError::Authentication(e.to_string())),
        };

        if outcome.is_err() {
            self.wire = None;
        }
        outcome
    }

    /// Build → send → decode, shared by the typed command surface
    pub(crate) fn request(
        &mut self,
        command: &Command,
        shape: ReplyShape,
    ) -> Result<crate::protocol::Value> {
        let reply = self.send(command)?;
        crate::protocol::decode(reply, shape)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}
