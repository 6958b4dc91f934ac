use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved type of error responses.
pub const ERROR_TYPE: &str = "ERROR";

/// The `{type, id, payload?}` unit exchanged in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Envelope {
    pub fn new(kind: impl Into<String>, id: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            payload,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ERROR_TYPE
    }

    /// Parse one inbound message.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// An outbound call before it gets an id.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub kind: String,
    pub id: Option<String>,
    pub payload: Option<Value>,
}

impl Request {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            payload: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}
