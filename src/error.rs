//! Error types for carmine
//!
//! Provides a unified error type for all operations.
//!
//! Absence is never an error: a missing key surfaces as a sentinel in the
//! success value (empty string, empty map, count of 0) per the command
//! documentation. The variants below cover genuine failures only.

use thiserror::Error;

/// Result type alias using CarmineError
pub type Result<T> = std::result::Result<T, CarmineError>;

/// Unified error type for carmine operations
#[derive(Debug, Error)]
pub enum CarmineError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// The reply could not be parsed, or its shape does not match what the
    /// attempted operation expects (e.g. an integer where an array is due).
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Handshake Errors
    // -------------------------------------------------------------------------
    #[error("Authentication failed: {0}")]
    Authentication(String),

    // -------------------------------------------------------------------------
    // Server Errors
    // -------------------------------------------------------------------------
    /// The server answered with an error reply; carries the server's message.
    #[error("Server error: {0}")]
    Server(String),

    // -------------------------------------------------------------------------
    // Caller Contract Errors
    // -------------------------------------------------------------------------
    /// A caller precondition failed (e.g. mismatched key/value counts).
    /// Rejected before any wire traffic.
    #[error("Contract violation: {0}")]
    Contract(String),
}
