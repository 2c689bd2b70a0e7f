//! # carmine
//!
//! A typed Redis client over RESP with:
//! - Explicit connect/auth/disconnect lifecycle
//! - Strongly-typed command surface (strings, sorted sets, hashes, lists)
//! - Absence-aware decoding (missing key is a sentinel, never an error)
//! - A raw escape hatch for arbitrary commands
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Typed Command Surface                      │
//! │        (del / set / get / zadd / hgetall / exec ...)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Connection                              │
//! │        (one request in flight, one reply per request)        │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!     ┌─────────────┐                    ┌─────────────┐
//!     │   Command   │                    │    Reply    │
//!     │  (encode)   │                    │ (parse+map) │
//!     └─────────────┘                    └─────────────┘
//! ```
//!
//! One connection carries exactly one outstanding request at a time; callers
//! that need concurrency pool multiple connections externally.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CarmineError, Result};
pub use config::Config;
pub use client::Connection;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of carmine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
