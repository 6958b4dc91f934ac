//! Errors surfaced by the bridge.
//!
//! Every failure has a protocol-level view (`code` + `reason`) matching the
//! payload of an `ERROR` envelope, so callers can treat host-reported and
//! page-side failures uniformly.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error code carried by an `ERROR` payload. Hosts send numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(String),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Number(n) => write!(f, "{n}"),
            ErrorCode::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ErrorCode {
    fn from(n: i64) -> Self {
        ErrorCode::Number(n)
    }
}

/// Canonical `ERROR` payload: `{code, reason}`.
///
/// Some hosts send `description` instead of `reason`; both are accepted on
/// input and `reason` is always written on output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeError {
    pub code: ErrorCode,
    #[serde(alias = "description", default)]
    pub reason: String,
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reason, self.code)
    }
}

#[derive(Debug, Error)]
pub enum BridgeError {
    /// No host transport is present.
    #[error("bridge not available")]
    Unavailable,

    /// The host answered the right id with an unexpected type.
    #[error("bad type: {actual}. Expecting {expected}")]
    BadType { actual: String, expected: String },

    /// The host answered with an `ERROR` envelope.
    #[error("native error: {0}")]
    Native(NativeError),

    #[error("request timeout")]
    Timeout,

    /// The host delivered something that is not an envelope.
    #[error("Problem parsing webview message: {raw}")]
    MalformedMessage {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// A single-flight guarded call is already in progress.
    #[error("{0} is locked: only one can be in progress")]
    Locked(&'static str),

    /// The response payload did not match the expected shape.
    #[error("unexpected payload for {kind}: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The listener registry went away before the request settled.
    #[error("bridge closed before a response arrived")]
    Closed,

    #[error("config error: {0}")]
    Config(String),
}

impl BridgeError {
    /// Protocol-level code: 408 for timeouts, 423 for lock contention, the
    /// host's own code for native errors, 500 otherwise.
    pub fn code(&self) -> ErrorCode {
        match self {
            BridgeError::Native(e) => e.code.clone(),
            BridgeError::Timeout => ErrorCode::Number(408),
            BridgeError::Locked(_) => ErrorCode::Number(423),
            _ => ErrorCode::Number(500),
        }
    }

    pub fn reason(&self) -> String {
        match self {
            BridgeError::Native(e) => e.reason.clone(),
            other => other.to_string(),
        }
    }

    /// The `{code, reason}` payload an `ERROR` envelope would carry.
    pub fn to_payload(&self) -> NativeError {
        NativeError {
            code: self.code(),
            reason: self.reason(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
