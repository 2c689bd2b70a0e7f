//! Protocol codec
//!
//! Encoding of requests and parsing of replies.
//!
//! ## Request Wire Format
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<arg bytes>\r\n     (repeated argc times)
//! ```
//!
//! ## Reply Wire Format
//! One reply per request, discriminated by its leading marker byte:
//! `+` status, `-` error, `:` integer, `$` bulk, `*` array.

use std::io::{BufRead, Write};

use bytes::Bytes;

use crate::error::{CarmineError, Result};
use super::{Command, Reply};

/// Maximum declared bulk payload size (16 MB)
pub const MAX_BULK_SIZE: i64 = 16 * 1024 * 1024;

/// Maximum declared array element count
pub const MAX_ARRAY_LEN: i64 = 1024 * 1024;

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a command into the request wire format
pub fn encode_command(command: &Command) -> Vec<u8> {
    let parts = command.parts();

    let mut message = Vec::with_capacity(16 + parts.iter().map(|p| p.len() + 16).sum::<usize>());
    message.extend_from_slice(format!("*{}\r\n", parts.len()).as_bytes());
    for part in parts {
        message.extend_from_slice(format!("${}\r\n", part.len()).as_bytes());
        message.extend_from_slice(part);
        message.extend_from_slice(b"\r\n");
    }

    message
}

/// Encode and write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Reply Parsing
// =============================================================================

/// Read exactly one reply from a stream
///
/// Blocks until a complete reply is received or an error occurs. Transport
/// failure surfaces as `CarmineError::Io`; malformed input as
/// `CarmineError::Protocol`.
pub fn read_reply<R: BufRead>(reader: &mut R) -> Result<Reply> {
    let line = read_line(reader)?;

    let (marker, rest) = match line.split_first() {
        Some(split) => split,
        None => return Err(CarmineError::Protocol("empty reply line".to_string())),
    };

    match marker {
        b'+' => Ok(Reply::Status(String::from_utf8_lossy(rest).into_owned())),
        b'-' => Ok(Reply::Error(String::from_utf8_lossy(rest).into_owned())),
        b':' => Ok(Reply::Integer(parse_int(rest)?)),
        b'$' => read_bulk(reader, parse_int(rest)?),
        b'*' => read_array(reader, parse_int(rest)?),
        _ => Err(CarmineError::Protocol(format!(
            "unknown reply marker: 0x{:02x}",
            marker
        ))),
    }
}

/// Read the body of a bulk reply whose length line was already consumed
fn read_bulk<R: BufRead>(reader: &mut R, len: i64) -> Result<Reply> {
    if len == -1 {
        // nil bulk: key absent
        return Ok(Reply::Bulk(None));
    }
    if len < 0 || len > MAX_BULK_SIZE {
        return Err(CarmineError::Protocol(format!(
            "bulk length out of range: {} (max {})",
            len, MAX_BULK_SIZE
        )));
    }

    let mut payload = vec![0u8; len as usize + 2];
    reader.read_exact(&mut payload)?;

    if &payload[len as usize..] != b"\r\n" {
        return Err(CarmineError::Protocol(
            "bulk payload missing CRLF terminator".to_string(),
        ));
    }
    payload.truncate(len as usize);

    Ok(Reply::Bulk(Some(Bytes::from(payload))))
}

/// Read the elements of an array reply whose count line was already consumed
fn read_array<R: BufRead>(reader: &mut R, count: i64) -> Result<Reply> {
    if count == -1 {
        // nil array: distinct from an empty one
        return Ok(Reply::Array(None));
    }
    if count < 0 || count > MAX_ARRAY_LEN {
        return Err(CarmineError::Protocol(format!(
            "array length out of range: {} (max {})",
            count, MAX_ARRAY_LEN
        )));
    }

    let mut items = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        items.push(read_reply(reader)?);
    }

    Ok(Reply::Array(Some(items)))
}

/// Read one CRLF-terminated line, returning its contents without the CRLF
fn read_line<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut line = Vec::with_capacity(32);
    let n = reader.read_until(b'\n', &mut line)?;

    if n == 0 {
        return Err(CarmineError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed mid-reply",
        )));
    }
    if !line.ends_with(b"\r\n") {
        return Err(CarmineError::Protocol(
            "reply line missing CRLF terminator".to_string(),
        ));
    }

    line.truncate(line.len() - 2);
    Ok(line)
}

/// Parse a signed decimal integer from a reply line fragment
fn parse_int(bytes: &[u8]) -> Result<i64> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| CarmineError::Protocol("non-UTF-8 integer field".to_string()))?;
    text.trim()
        .parse::<i64>()
        .map_err(|_| CarmineError::Protocol(format!("invalid integer field: {:?}", text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn encode_renders_length_prefixed_frame() {
        let cmd = Command::new("GET").arg("mykey");
        let bytes = encode_command(&cmd);
        assert_eq!(bytes, b"*2\r\n$3\r\nGET\r\n$5\r\nmykey\r\n");
    }

    #[test]
    fn encode_handles_empty_argument() {
        let cmd = Command::new("SET").arg("k").arg("");
        let bytes = encode_command(&cmd);
        assert_eq!(bytes, b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$0\r\n\r\n");
    }

    #[test]
    fn parse_status_reply() {
        let mut input = Cursor::new(b"+OK\r\n".to_vec());
        assert_eq!(read_reply(&mut input).unwrap(), Reply::Status("OK".into()));
    }

    #[test]
    fn parse_nil_bulk_reply() {
        let mut input = Cursor::new(b"$-1\r\n".to_vec());
        assert_eq!(read_reply(&mut input).unwrap(), Reply::Bulk(None));
    }

    #[test]
    fn parse_rejects_unknown_marker() {
        let mut input = Cursor::new(b"?what\r\n".to_vec());
        assert!(matches!(
            read_reply(&mut input),
            Err(CarmineError::Protocol(_))
        ));
    }

    #[test]
    fn parse_rejects_oversized_bulk_declaration() {
        let mut input = Cursor::new(format!("${}\r\n", MAX_BULK_SIZE + 1).into_bytes());
        assert!(matches!(
            read_reply(&mut input),
            Err(CarmineError::Protocol(_))
        ));
    }

    #[test]
    fn truncated_reply_is_an_io_error() {
        let mut input = Cursor::new(b"$5\r\nab".to_vec());
        assert!(matches!(read_reply(&mut input), Err(CarmineError::Io(_))));
    }
}
