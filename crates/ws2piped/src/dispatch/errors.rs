//! Error types for message decoding, validation and routing.
//!
//! Every variant renders as the text placed in the `error` field of an
//! `ERROR` response, so the display strings are part of the wire contract.

use thiserror::Error;

use crate::session::PipeError;

/// Errors surfaced while turning an inbound text message into a response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Text could not be decoded into the message shape.
    #[error("wrong format")]
    MalformedMessage {
        /// Decoder error, absent when the JSON was valid but not an object.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A field every message of this kind needs was absent.
    #[error("{field} is missing")]
    MissingField {
        /// Wire name of the absent field.
        field: &'static str,
    },

    /// A field needed by one specific message kind was absent.
    #[error("{field} must be set for {required_for}")]
    RequiredField {
        /// Wire name of the absent field.
        field: &'static str,
        /// Enum value that requires the field.
        required_for: &'static str,
    },

    /// An enum field carried a value outside its vocabulary.
    #[error("unknown {field}: {value}")]
    UnknownValue {
        /// Wire name of the field.
        field: &'static str,
        /// Value received from the client.
        value: String,
    },

    /// A pipe message arrived while no pipe was open.
    #[error("NO PIPE CONNECTION")]
    NoPipeConnection,

    /// Opening, writing or reading the pipe failed.
    #[error(transparent)]
    Pipe(#[from] PipeError),
}

impl DispatchError {
    /// Creates a malformed message error from a decoder error.
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedMessage {
            source: Some(source),
        }
    }

    /// Creates a malformed message error without an underlying cause.
    pub fn malformed() -> Self {
        Self::MalformedMessage { source: None }
    }

    /// Creates a missing field error.
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Creates an error for a field required by `required_for`.
    pub fn required_for(field: &'static str, required_for: &'static str) -> Self {
        Self::RequiredField {
            field,
            required_for,
        }
    }

    /// Creates an unknown value error.
    pub fn unknown_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            field,
            value: value.into(),
        }
    }

    /// Returns true for errors raised before the message reached the pipe.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Pipe(_))
    }
}
