//! Protocol Module
//!
//! Implements the RESP wire protocol used between client and server.
//!
//! ## Request Format
//!
//! Every request is an array of bulk strings, command name first:
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<arg bytes>\r\n     (repeated argc times)
//! ```
//!
//! ## Reply Format
//!
//! Exactly one reply per request, discriminated by its leading byte:
//! - `+status\r\n`              status (e.g. `+OK\r\n`)
//! - `-error message\r\n`       error
//! - `:integer\r\n`             signed 64-bit integer
//! - `$len\r\nbytes\r\n`        bulk string, `$-1\r\n` for nil
//! - `*count\r\n<replies>`      array of nested replies, `*-1\r\n` for nil
//!
//! Nested arrays carry SCAN cursor pages and zset member/score pairs.

mod reply;
mod command;
mod codec;
mod decode;

pub use reply::Reply;
pub use command::Command;
pub use codec::{encode_command, read_reply, write_command};
pub use decode::{decode, ReplyShape, Value};
