//! Reply decoder
//!
//! Maps a raw [`Reply`] to a typed result. Dispatch is data-driven: each
//! typed operation names the [`ReplyShape`] it expects and one total
//! `decode` function applies the rules, so the error taxonomy stays
//! consistent across the whole command surface.
//!
//! Two rules hold for every shape:
//! - an error reply always becomes `CarmineError::Server`
//! - an unexpected reply variant is `CarmineError::Protocol`, never a
//!   silent default
//!
//! Absence decodes to a sentinel success value: nil bulk becomes the empty
//! string, nil array becomes an empty list or map.

use std::collections::HashMap;

use crate::error::{CarmineError, Result};
use super::Reply;

/// The result family a typed operation expects its reply to decode into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// Status "OK" only (SET, MSET, AUTH)
    Ok,
    /// Integer as a flag, or status "OK"; nonzero is true (EXISTS, EXPIRE)
    Bool,
    /// Plain signed integer (DEL, TTL, ZADD)
    Int,
    /// Bulk string parsed as a float (INCRBYFLOAT)
    Float,
    /// Bulk or status text; nil bulk is the empty-string sentinel (GET, TYPE)
    Text,
    /// Ordered sequence of strings; nil array is empty (KEYS, ZRANGE, MGET)
    List,
    /// Flattened key/value pairs into a map; nil array is empty (HGETALL)
    Map,
}

/// A decoded reply value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
    Map(HashMap<String, String>),
}

/// Decode a reply against the shape an operation expects
pub fn decode(reply: Reply, shape: ReplyShape) -> Result<Value> {
    // Error replies short-circuit identically for every shape
    if let Reply::Error(msg) = reply {
        return Err(CarmineError::Server(msg));
    }

    match shape {
        ReplyShape::Ok => match reply {
            Reply::Status(s) if s == "OK" => Ok(Value::Unit),
            Reply::Status(s) => Err(unexpected_status(&s)),
            other => Err(unexpected(&other, "status")),
        },

        ReplyShape::Bool => match reply {
            Reply::Integer(n) => Ok(Value::Bool(n != 0)),
            Reply::Status(s) if s == "OK" => Ok(Value::Bool(true)),
            Reply::Status(s) => Err(unexpected_status(&s)),
            other => Err(unexpected(&other, "integer or status")),
        },

        ReplyShape::Int => match reply {
            Reply::Integer(n) => Ok(Value::Int(n)),
            other => Err(unexpected(&other, "integer")),
        },

        ReplyShape::Float => match reply {
            Reply::Bulk(Some(bytes)) => {
                let text = String::from_utf8_lossy(&bytes);
                text.parse::<f64>().map(Value::Float).map_err(|_| {
                    CarmineError::Protocol(format!("non-numeric float reply: {:?}", text))
                })
            }
            other => Err(unexpected(&other, "bulk")),
        },

        ReplyShape::Text => match reply {
            Reply::Bulk(Some(bytes)) => Ok(Value::Text(to_string(&bytes))),
            // nil bulk: absent key, reported as "" rather than a failure
            Reply::Bulk(None) => Ok(Value::Text(String::new())),
            Reply::Status(s) => Ok(Value::Text(s)),
            other => Err(unexpected(&other, "bulk or status")),
        },

        ReplyShape::List => match reply {
            Reply::Array(Some(items)) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(flatten_item(item)?);
                }
                Ok(Value::List(values))
            }
            Reply::Array(None) => Ok(Value::List(Vec::new())),
            // the raw escape hatch accepts a lone bulk as a one-element list
            Reply::Bulk(Some(bytes)) => Ok(Value::List(vec![to_string(&bytes)])),
            Reply::Bulk(None) => Ok(Value::List(Vec::new())),
            other => Err(unexpected(&other, "array or bulk")),
        },

        ReplyShape::Map => match reply {
            Reply::Array(Some(items)) => {
                if items.len() % 2 != 0 {
                    return Err(CarmineError::Protocol(format!(
                        "map reply has odd element count: {}",
                        items.len()
                    )));
                }
                let mut map = HashMap::with_capacity(items.len() / 2);
                let mut iter = items.into_iter();
                while let (Some(k), Some(v)) = (iter.next(), iter.next()) {
                    map.insert(flatten_item(k)?, flatten_item(v)?);
                }
                Ok(Value::Map(map))
            }
            Reply::Array(None) => Ok(Value::Map(HashMap::new())),
            other => Err(unexpected(&other, "array")),
        },
    }
}

/// Render one array element as a string
///
/// Servers mix bulk and integer elements inside array replies (e.g. SORT
/// with BY hash patterns); nested arrays never decode into flat lists.
fn flatten_item(item: Reply) -> Result<String> {
    match item {
        Reply::Bulk(Some(bytes)) => Ok(to_string(&bytes)),
        Reply::Bulk(None) => Ok(String::new()),
        Reply::Integer(n) => Ok(n.to_string()),
        Reply::Status(s) => Ok(s),
        Reply::Error(msg) => Err(CarmineError::Server(msg)),
        Reply::Array(_) => Err(CarmineError::Protocol(
            "nested array inside flat reply".to_string(),
        )),
    }
}

fn to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn unexpected(reply: &Reply, wanted: &str) -> CarmineError {
    CarmineError::Protocol(format!(
        "unexpected {} reply where {} was expected",
        reply.kind(),
        wanted
    ))
}

fn unexpected_status(status: &str) -> CarmineError {
    CarmineError::Protocol(format!("unexpected status reply: {:?}", status))
}

// =============================================================================
// Typed Extractors
// =============================================================================

impl Value {
    pub fn into_bool(self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(b),
            other => Err(internal_mismatch(&other, "bool")),
        }
    }

    pub fn into_int(self) -> Result<i64> {
        match self {
            Value::Int(n) => Ok(n),
            other => Err(internal_mismatch(&other, "int")),
        }
    }

    pub fn into_float(self) -> Result<f64> {
        match self {
            Value::Float(f) => Ok(f),
            other => Err(internal_mismatch(&other, "float")),
        }
    }

    pub fn into_text(self) -> Result<String> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(internal_mismatch(&other, "text")),
        }
    }

    pub fn into_list(self) -> Result<Vec<String>> {
        match self {
            Value::List(v) => Ok(v),
            other => Err(internal_mismatch(&other, "list")),
        }
    }

    pub fn into_map(self) -> Result<HashMap<String, String>> {
        match self {
            Value::Map(m) => Ok(m),
            other => Err(internal_mismatch(&other, "map")),
        }
    }
}

fn internal_mismatch(value: &Value, wanted: &str) -> CarmineError {
    CarmineError::Protocol(format!(
        "decoded {:?} where {} was expected",
        value, wanted
    ))
}
