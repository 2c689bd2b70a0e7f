//! Codec Tests
//!
//! Tests for request framing and reply parsing.

use std::io::Cursor;

use bytes::Bytes;
use carmine::protocol::{encode_command, read_reply, write_command, Command, Reply};
use carmine::CarmineError;

fn parse(input: &[u8]) -> Reply {
    let mut cursor = Cursor::new(input.to_vec());
    read_reply(&mut cursor).unwrap()
}

// =============================================================================
// Request Framing Tests
// =============================================================================

#[test]
fn test_encode_get() {
    let cmd = Command::new("GET").arg("hello");
    assert_eq!(encode_command(&cmd), b"*2\r\n$3\r\nGET\r\n$5\r\nhello\r\n");
}

#[test]
fn test_encode_set_with_empty_value() {
    let cmd = Command::new("SET").arg("k").arg("");
    assert_eq!(
        encode_command(&cmd),
        b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$0\r\n\r\n"
    );
}

#[test]
fn test_encode_binary_argument() {
    // Length-prefixed framing must carry arbitrary bytes, CR/LF included
    let payload: Vec<u8> = vec![0x00, 0x0d, 0x0a, 0xff];
    let cmd = Command::new("SET").arg("bin").arg(&payload);

    let mut expected = b"*3\r\n$3\r\nSET\r\n$3\r\nbin\r\n$4\r\n".to_vec();
    expected.extend_from_slice(&payload);
    expected.extend_from_slice(b"\r\n");
    assert_eq!(encode_command(&cmd), expected);
}

#[test]
fn test_write_command_flushes_full_frame() {
    let cmd = Command::new("PING");
    let mut out = Vec::new();
    write_command(&mut out, &cmd).unwrap();
    assert_eq!(out, b"*1\r\n$4\r\nPING\r\n");
}

// =============================================================================
// Reply Parsing Tests
// =============================================================================

#[test]
fn test_parse_status() {
    assert_eq!(parse(b"+OK\r\n"), Reply::Status("OK".into()));
}

#[test]
fn test_parse_error() {
    assert_eq!(
        parse(b"-ERR unknown command\r\n"),
        Reply::Error("ERR unknown command".into())
    );
}

#[test]
fn test_parse_integer() {
    assert_eq!(parse(b":-42\r\n"), Reply::Integer(-42));
}

#[test]
fn test_parse_bulk() {
    assert_eq!(
        parse(b"$6\r\nfoobar\r\n"),
        Reply::Bulk(Some(Bytes::from_static(b"foobar")))
    );
}

#[test]
fn test_parse_empty_bulk() {
    assert_eq!(parse(b"$0\r\n\r\n"), Reply::Bulk(Some(Bytes::new())));
}

#[test]
fn test_parse_nil_bulk() {
    assert_eq!(parse(b"$-1\r\n"), Reply::Bulk(None));
}

#[test]
fn test_parse_bulk_with_embedded_crlf() {
    assert_eq!(
        parse(b"$4\r\na\r\nb\r\n"),
        Reply::Bulk(Some(Bytes::from_static(b"a\r\nb")))
    );
}

#[test]
fn test_parse_array() {
    let reply = parse(b"*2\r\n$3\r\nfoo\r\n:7\r\n");
    assert_eq!(
        reply,
        Reply::Array(Some(vec![
            Reply::Bulk(Some(Bytes::from_static(b"foo"))),
            Reply::Integer(7),
        ]))
    );
}

#[test]
fn test_parse_empty_array_distinct_from_nil_array() {
    assert_eq!(parse(b"*0\r\n"), Reply::Array(Some(vec![])));
    assert_eq!(parse(b"*-1\r\n"), Reply::Array(None));
}

#[test]
fn test_parse_nested_scan_reply() {
    // ZSCAN replies nest the page array inside the cursor pair
    let reply = parse(b"*2\r\n$2\r\n17\r\n*2\r\n$5\r\nalice\r\n$1\r\n3\r\n");
    match reply {
        Reply::Array(Some(items)) => {
            assert_eq!(items.len(), 2);
            assert_eq!(items[0], Reply::Bulk(Some(Bytes::from_static(b"17"))));
            assert!(matches!(items[1], Reply::Array(Some(ref inner)) if inner.len() == 2));
        }
        other => panic!("expected array reply, got {:?}", other),
    }
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[test]
fn test_unknown_marker_is_protocol_error() {
    let mut cursor = Cursor::new(b"!oops\r\n".to_vec());
    assert!(matches!(
        read_reply(&mut cursor),
        Err(CarmineError::Protocol(_))
    ));
}

#[test]
fn test_non_numeric_integer_is_protocol_error() {
    let mut cursor = Cursor::new(b":seven\r\n".to_vec());
    assert!(matches!(
        read_reply(&mut cursor),
        Err(CarmineError::Protocol(_))
    ));
}

#[test]
fn test_missing_crlf_is_protocol_error() {
    let mut cursor = Cursor::new(b"+OK\n".to_vec());
    assert!(matches!(
        read_reply(&mut cursor),
        Err(CarmineError::Protocol(_))
    ));
}

#[test]
fn test_truncated_stream_is_io_error() {
    let mut cursor = Cursor::new(b"*2\r\n:1\r\n".to_vec());
    assert!(matches!(read_reply(&mut cursor), Err(CarmineError::Io(_))));
}

#[test]
fn test_bulk_length_mismatch_is_protocol_error() {
    // Declared length 3 but the terminator lands mid-payload
    let mut cursor = Cursor::new(b"$3\r\nab\r\nc".to_vec());
    assert!(matches!(
        read_reply(&mut cursor),
        Err(CarmineError::Protocol(_))
    ));
}
