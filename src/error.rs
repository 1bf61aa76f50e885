//! Error types for the STT unification layer
//!
//! Nothing here escapes `UnifiedMessageRouter::handle_message` — the router is
//! the absorption boundary. These variants exist so adapters and the resolver
//! can report *why* a message was unusable before the router logs and drops it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error types for STT message processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SttError {
    /// Message did not match the provider's expected shape
    MalformedMessage(String),
    /// A required field was missing or had the wrong type
    MissingField(String),
    /// Downstream persistence sink rejected a segment
    PersistenceFailed(String),
    /// Session not found in the registry
    SessionNotFound(String),
    /// Generic error
    Other(String),
}

impl fmt::Display for SttError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SttError::MalformedMessage(msg) => write!(f, "Malformed provider message: {}", msg),
            SttError::MissingField(msg) => write!(f, "Missing field: {}", msg),
            SttError::PersistenceFailed(msg) => write!(f, "Failed to persist segment: {}", msg),
            SttError::SessionNotFound(msg) => write!(f, "Session not found: {}", msg),
            SttError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SttError {}
