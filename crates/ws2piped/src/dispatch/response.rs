//! Outbound response envelope.
//!
//! Every inbound message is answered by exactly one envelope. Successful
//! outcomes carry `response`, failures carry `error`; the unused field is
//! omitted from the JSON.

use serde::Serialize;

/// Envelope sent when serialising a [`Response`] fails.
pub(crate) const SERIALISATION_FALLBACK: &str =
    r#"{"status":"ERROR","error":"failed to serialise response"}"#;

/// Outcome tag of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    /// The message was handled.
    #[serde(rename = "OK")]
    Ok,
    /// The message was rejected or the pipe failed.
    #[serde(rename = "ERROR")]
    Error,
}

/// Response envelope returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Response {
    /// Builds the envelope for an outcome: `text` becomes `response` on
    /// success and `error` on failure.
    pub fn from_outcome(success: bool, text: impl Into<String>) -> Self {
        let text = text.into();
        if success {
            Self {
                status: Status::Ok,
                response: Some(text),
                error: None,
            }
        } else {
            Self {
                status: Status::Error,
                response: None,
                error: Some(text),
            }
        }
    }

    /// Creates a successful response.
    pub fn ok(text: impl Into<String>) -> Self {
        Self::from_outcome(true, text)
    }

    /// Creates an error response.
    pub fn error(text: impl Into<String>) -> Self {
        Self::from_outcome(false, text)
    }

    /// Outcome tag.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Text returned on success.
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    /// Text returned on failure.
    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Serialises the envelope as a single JSON object.
    ///
    /// # Errors
    ///
    /// Returns the serialiser error; callers fall back to a fixed envelope.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
