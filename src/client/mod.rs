//! Client Module
//!
//! Connection lifecycle and the typed command surface.
//!
//! ## Architecture
//! - One TCP connection, one outstanding request at a time
//! - Typed commands compose build → send → decode
//! - Pooling for concurrent callers lives outside this crate

mod connection;
mod commands;

pub use connection::Connection;
