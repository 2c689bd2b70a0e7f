//! Typed command surface
//!
//! One method per server command, composing build → send → decode. Every
//! method distinguishes absence from failure: a missing key yields a
//! documented sentinel inside `Ok` (empty string, empty collection, zero
//! count, `false`), while genuine failures come back as `Err`.

use std::collections::HashMap;

use crate::error::{CarmineError, Result};
use crate::protocol::{decode, Command, Reply, ReplyShape};
use super::Connection;

// =============================================================================
// Generic Key Commands
// =============================================================================

impl Connection {
    /// Delete a key; returns the number of keys removed (0 when absent)
    pub fn del(&mut self, key: &str) -> Result<i64> {
        self.request(&Command::new("DEL").arg(key), ReplyShape::Int)?
            .into_int()
    }

    /// Whether the key exists
    pub fn exists(&mut self, key: &str) -> Result<bool> {
        self.request(&Command::new("EXISTS").arg(key), ReplyShape::Bool)?
            .into_bool()
    }

    /// Set a relative expiry in seconds; false when the key does not exist
    pub fn expire(&mut self, key: &str, seconds: i64) -> Result<bool> {
        let cmd = Command::new("EXPIRE").arg(key).arg(seconds.to_string());
        self.request(&cmd, ReplyShape::Bool)?.into_bool()
    }

    /// Set an absolute expiry as a unix timestamp; false when the key does
    /// not exist
    pub fn expireat(&mut self, key: &str, timestamp: i64) -> Result<bool> {
        let cmd = Command::new("EXPIREAT").arg(key).arg(timestamp.to_string());
        self.request(&cmd, ReplyShape::Bool)?.into_bool()
    }

    /// All keys matching a glob pattern
    pub fn keys(&mut self, pattern: &str) -> Result<Vec<String>> {
        self.request(&Command::new("KEYS").arg(pattern), ReplyShape::List)?
            .into_list()
    }

    /// Remaining time to live in seconds
    ///
    /// -2 when the key is absent, -1 when it carries no expiry. Transport
    /// and decode failures are `Err`, so the wire's own sentinels pass
    /// through unambiguously.
    pub fn ttl(&mut self, key: &str) -> Result<i64> {
        self.request(&Command::new("TTL").arg(key), ReplyShape::Int)?
            .into_int()
    }

    /// Storage type of the key: one of
    /// `none | string | list | set | zset | hash`
    ///
    /// `"none"` signals absence, not an error.
    pub fn key_type(&mut self, key: &str) -> Result<String> {
        self.request(&Command::new("TYPE").arg(key), ReplyShape::Text)?
            .into_text()
    }
}

// =============================================================================
// String Commands
// =============================================================================

impl Connection {
    /// Set a key to a value, overwriting any previous value
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let cmd = Command::new("SET").arg(key).arg(value);
        self.request(&cmd, ReplyShape::Ok).map(|_| ())
    }

    /// Value of the key; `""` when the key is absent
    pub fn get(&mut self, key: &str) -> Result<String> {
        self.request(&Command::new("GET").arg(key), ReplyShape::Text)?
            .into_text()
    }

    /// Set several keys at once
    ///
    /// `keys` and `values` must have equal length; a mismatch is a
    /// [`CarmineError::Contract`] rejected before any wire traffic.
    pub fn mset(&mut self, keys: &[&str], values: &[&str]) -> Result<()> {
        if keys.len() != values.len() {
            return Err(CarmineError::Contract(format!(
                "mset requires equal key/value counts, got {} keys and {} values",
                keys.len(),
                values.len()
            )));
        }

        let mut cmd = Command::new("MSET");
        for (key, value) in keys.iter().zip(values) {
            cmd = cmd.arg(key).arg(value);
        }
        self.request(&cmd, ReplyShape::Ok).map(|_| ())
    }

    /// Get several keys at once
    ///
    /// The result always has exactly one entry per requested key, `""` for
    /// each key that is absent.
    pub fn mget(&mut self, keys: &[&str]) -> Result<Vec<String>> {
        let cmd = Command::new("MGET").args(keys);
        let values = self.request(&cmd, ReplyShape::List)?.into_list()?;

        if values.len() != keys.len() {
            return Err(CarmineError::Protocol(format!(
                "MGET returned {} values for {} keys",
                values.len(),
                keys.len()
            )));
        }
        Ok(values)
    }

    /// Increment by one, creating the key at 0 first; returns the new value
    ///
    /// A non-numeric existing value surfaces as the server's error.
    pub fn incr(&mut self, key: &str) -> Result<i64> {
        self.request(&Command::new("INCR").arg(key), ReplyShape::Int)?
            .into_int()
    }

    /// Increment by a signed delta; returns the new value
    pub fn incrby(&mut self, key: &str, delta: i64) -> Result<i64> {
        let cmd = Command::new("INCRBY").arg(key).arg(delta.to_string());
        self.request(&cmd, ReplyShape::Int)?.into_int()
    }

    /// Increment by a float delta; returns the new value
    pub fn incrbyfloat(&mut self, key: &str, delta: f64) -> Result<f64> {
        let cmd = Command::new("INCRBYFLOAT").arg(key).arg(delta.to_string());
        self.request(&cmd, ReplyShape::Float)?.into_float()
    }

    /// Decrement by one; returns the new value
    pub fn decr(&mut self, key: &str) -> Result<i64> {
        self.request(&Command::new("DECR").arg(key), ReplyShape::Int)?
            .into_int()
    }

    /// Decrement by a signed delta; returns the new value
    pub fn decrby(&mut self, key: &str, delta: i64) -> Result<i64> {
        let cmd = Command::new("DECRBY").arg(key).arg(delta.to_string());
        self.request(&cmd, ReplyShape::Int)?.into_int()
    }
}

// =============================================================================
// Sorted Set Commands
// =============================================================================

impl Connection {
    /// Add members with scores; returns the count of newly inserted members
    /// (updates to existing members are not counted)
    pub fn zadd(&mut self, key: &str, members: &HashMap<String, String>) -> Result<i64> {
        let mut cmd = Command::new("ZADD").arg(key);
        for (member, score) in members {
            cmd = cmd.arg(score).arg(member);
        }
        self.request(&cmd, ReplyShape::Int)?.into_int()
    }

    /// Number of members in the sorted set (0 when absent)
    pub fn zcard(&mut self, key: &str) -> Result<i64> {
        self.request(&Command::new("ZCARD").arg(key), ReplyShape::Int)?
            .into_int()
    }

    /// Number of members with score in `[min, max]`
    pub fn zcount(&mut self, key: &str, min: f64, max: f64) -> Result<i64> {
        let cmd = Command::new("ZCOUNT")
            .arg(key)
            .arg(min.to_string())
            .arg(max.to_string());
        self.request(&cmd, ReplyShape::Int)?.into_int()
    }

    /// Add a delta to a member's score; returns the new score as text
    pub fn zincrby(&mut self, key: &str, delta: f64, member: &str) -> Result<String> {
        let cmd = Command::new("ZINCRBY")
            .arg(key)
            .arg(delta.to_string())
            .arg(member);
        self.request(&cmd, ReplyShape::Text)?.into_text()
    }

    /// Members in rank interval `[start, stop]`, scores ascending
    ///
    /// `stop = -1` means the last member. With `with_scores` the result
    /// alternates member, score, member, score in server order, so its
    /// length is twice the member count.
    pub fn zrange(
        &mut self,
        key: &str,
        start: i64,
        stop: i64,
        with_scores: bool,
    ) -> Result<Vec<String>> {
        self.range_command("ZRANGE", key, start, stop, with_scores)
    }

    /// Members in rank interval `[start, stop]`, scores descending
    pub fn zrevrange(
        &mut self,
        key: &str,
        start: i64,
        stop: i64,
        with_scores: bool,
    ) -> Result<Vec<String>> {
        self.range_command("ZREVRANGE", key, start, stop, with_scores)
    }

    /// Remove members in rank interval `[start, stop]`; returns the count
    /// removed
    pub fn zremrangebyrank(&mut self, key: &str, start: i64, stop: i64) -> Result<i64> {
        let cmd = Command::new("ZREMRANGEBYRANK")
            .arg(key)
            .arg(start.to_string())
            .arg(stop.to_string());
        self.request(&cmd, ReplyShape::Int)?.into_int()
    }

    /// Remove members with score in `[min, max]`; returns the count removed
    pub fn zremrangebyscore(&mut self, key: &str, min: f64, max: f64) -> Result<i64> {
        let cmd = Command::new("ZREMRANGEBYSCORE")
            .arg(key)
            .arg(min.to_string())
            .arg(max.to_string());
        self.request(&cmd, ReplyShape::Int)?.into_int()
    }

    /// Score of a member as text; `""` when the member or key is absent
    pub fn zscore(&mut self, key: &str, member: &str) -> Result<String> {
        let cmd = Command::new("ZSCORE").arg(key).arg(member);
        self.request(&cmd, ReplyShape::Text)?.into_text()
    }

    /// Iterate the sorted set one page at a time
    ///
    /// Returns `(next_cursor, values)` where values alternate member and
    /// score. The iteration is complete when the returned cursor is 0;
    /// callers loop until then. A negative `count` requests the full set:
    /// the iteration runs internally to exhaustion and the returned cursor
    /// is always 0.
    pub fn zscan(
        &mut self,
        key: &str,
        cursor: u64,
        pattern: &str,
        count: i64,
    ) -> Result<(u64, Vec<String>)> {
        if count >= 0 {
            return self.zscan_page(key, cursor, pattern, Some(count));
        }

        let mut cursor = cursor;
        let mut values = Vec::new();
        loop {
            let (next, mut page) = self.zscan_page(key, cursor, pattern, None)?;
            values.append(&mut page);
            if next == 0 {
                return Ok((0, values));
            }
            cursor = next;
        }
    }

    fn zscan_page(
        &mut self,
        key: &str,
        cursor: u64,
        pattern: &str,
        count: Option<i64>,
    ) -> Result<(u64, Vec<String>)> {
        let mut cmd = Command::new("ZSCAN").arg(key).arg(cursor.to_string());
        if !pattern.is_empty() {
            cmd = cmd.arg("MATCH").arg(pattern);
        }
        if let Some(count) = count {
            cmd = cmd.arg("COUNT").arg(count.to_string());
        }

        scan_page(self.send(&cmd)?)
    }

    fn range_command(
        &mut self,
        name: &str,
        key: &str,
        start: i64,
        stop: i64,
        with_scores: bool,
    ) -> Result<Vec<String>> {
        let mut cmd = Command::new(name)
            .arg(key)
            .arg(start.to_string())
            .arg(stop.to_string());
        if with_scores {
            cmd = cmd.arg("WITHSCORES");
        }
        self.request(&cmd, ReplyShape::List)?.into_list()
    }
}

// =============================================================================
// Hash and List Commands
// =============================================================================

impl Connection {
    /// All field/value pairs of a hash; empty map when the key is absent
    pub fn hgetall(&mut self, key: &str) -> Result<HashMap<String, String>> {
        self.request(&Command::new("HGETALL").arg(key), ReplyShape::Map)?
            .into_map()
    }

    /// List elements in index interval `[start, end]`; `end = -1` means the
    /// last element inclusive
    pub fn lrange(&mut self, key: &str, start: i64, end: i64) -> Result<Vec<String>> {
        let cmd = Command::new("LRANGE")
            .arg(key)
            .arg(start.to_string())
            .arg(end.to_string());
        self.request(&cmd, ReplyShape::List)?.into_list()
    }
}

// =============================================================================
// Raw Escape Hatch
// =============================================================================

impl Connection {
    /// Run an arbitrary command line, discarding any payload
    ///
    /// Status and array/bulk replies report success; an integer reply
    /// reports `n != 0`. Failure taxonomy is identical to the typed
    /// commands.
    pub fn exec(&mut self, cmd: &str) -> Result<bool> {
        let command = parse_line(cmd)?;
        match self.send(&command)? {
            Reply::Error(msg) => Err(CarmineError::Server(msg)),
            Reply::Integer(n) => Ok(n != 0),
            Reply::Status(_) | Reply::Bulk(_) | Reply::Array(_) => Ok(true),
        }
    }

    /// Run an arbitrary command line and collect its values
    ///
    /// Array and bulk replies flatten into strings; a status or integer
    /// reply becomes a one-element result.
    pub fn exec_values(&mut self, cmd: &str) -> Result<Vec<String>> {
        let command = parse_line(cmd)?;
        match self.send(&command)? {
            Reply::Status(s) => Ok(vec![s]),
            Reply::Integer(n) => Ok(vec![n.to_string()]),
            reply => decode(reply, ReplyShape::List)?.into_list(),
        }
    }
}

/// Parse a raw command line; an empty line is a caller error
fn parse_line(cmd: &str) -> Result<Command> {
    Command::from_line(cmd)
        .ok_or_else(|| CarmineError::Contract("empty command line".to_string()))
}

/// Interpret a SCAN-family reply: a two-element array of cursor and page
fn scan_page(reply: Reply) -> Result<(u64, Vec<String>)> {
    let items = match reply {
        Reply::Error(msg) => return Err(CarmineError::Server(msg)),
        Reply::Array(Some(items)) => items,
        other => {
            return Err(CarmineError::Protocol(format!(
                "unexpected {} reply where scan page was expected",
                other.kind()
            )))
        }
    };

    let mut iter = items.into_iter();
    let (cursor_item, values_item) = match (iter.next(), iter.next(), iter.next()) {
        (Some(cursor), Some(values), None) => (cursor, values),
        _ => {
            return Err(CarmineError::Protocol(
                "scan reply must have exactly two elements".to_string(),
            ))
        }
    };

    let cursor_text = match cursor_item {
        Reply::Bulk(Some(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
        Reply::Integer(n) => n.to_string(),
        other => {
            return Err(CarmineError::Protocol(format!(
                "unexpected {} reply as scan cursor",
                other.kind()
            )))
        }
    };
    let cursor = cursor_text.parse::<u64>().map_err(|_| {
        CarmineError::Protocol(format!("invalid scan cursor: {:?}", cursor_text))
    })?;

    let values = decode(values_item, ReplyShape::List)?.into_list()?;
    Ok((cursor, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use bytes::Bytes;

    fn bulk(text: &str) -> Reply {
        Reply::Bulk(Some(Bytes::copy_from_slice(text.as_bytes())))
    }

    #[test]
    fn mset_length_mismatch_is_rejected_before_the_wire() {
        // Disconnected on purpose: a Connection error would mean the check
        // ran after the send attempt
        let mut conn = Connection::new(Config::default());
        let result = conn.mset(&["a", "b"], &["1"]);
        assert!(matches!(result, Err(CarmineError::Contract(_))));
    }

    #[test]
    fn empty_exec_line_is_a_contract_error() {
        let mut conn = Connection::new(Config::default());
        assert!(matches!(conn.exec("  "), Err(CarmineError::Contract(_))));
        assert!(matches!(
            conn.exec_values(""),
            Err(CarmineError::Contract(_))
        ));
    }

    #[test]
    fn scan_page_splits_cursor_and_values() {
        let reply = Reply::Array(Some(vec![
            bulk("42"),
            Reply::Array(Some(vec![bulk("alice"), bulk("1")])),
        ]));
        let (cursor, values) = scan_page(reply).unwrap();
        assert_eq!(cursor, 42);
        assert_eq!(values, vec!["alice".to_string(), "1".to_string()]);
    }

    #[test]
    fn scan_page_rejects_wrong_arity() {
        let reply = Reply::Array(Some(vec![bulk("0")]));
        assert!(matches!(scan_page(reply), Err(CarmineError::Protocol(_))));
    }

    #[test]
    fn scan_page_rejects_non_numeric_cursor() {
        let reply = Reply::Array(Some(vec![
            bulk("not-a-cursor"),
            Reply::Array(Some(vec![])),
        ]));
        assert!(matches!(scan_page(reply), Err(CarmineError::Protocol(_))));
    }
}
