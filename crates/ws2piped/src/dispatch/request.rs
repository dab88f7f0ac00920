//! Inbound message decoding and validation.
//!
//! Messages arrive as JSON objects whose fields are all optional on the wire.
//! Decoding only checks the shape; [`InboundMessage::validate`] then applies
//! the field rules in a fixed order and yields a [`Command`].

use serde::Deserialize;
use serde_json::Value;

use super::errors::DispatchError;

/// Raw message shape as sent by clients. Unknown keys are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    /// `GATEWAY_MESSAGE` or `PIPE_MESSAGE`.
    pub message_type: Option<String>,
    /// `CONNECT` or `DISCONNECT`; only read for gateway messages.
    pub command: Option<String>,
    /// Path opened by `CONNECT`.
    pub pipe_name: Option<String>,
    /// Text written to the pipe by `PIPE_MESSAGE`.
    pub message: Option<String>,
}

/// Validated request, ready for routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the open pipe with the one at `pipe_name`.
    Connect {
        /// Path of the pipe to open.
        pipe_name: String,
    },
    /// Close the open pipe, if any.
    Disconnect,
    /// Write `payload` to the open pipe and drain its answer.
    PipeWrite {
        /// Text written verbatim as UTF-8 bytes.
        payload: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageType {
    Gateway,
    Pipe,
}

impl MessageType {
    fn parse(value: &str) -> Result<Self, DispatchError> {
        match value {
            "GATEWAY_MESSAGE" => Ok(Self::Gateway),
            "PIPE_MESSAGE" => Ok(Self::Pipe),
            _ => Err(DispatchError::unknown_value("messageType", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GatewayCommand {
    Connect,
    Disconnect,
}

impl GatewayCommand {
    fn parse(value: &str) -> Result<Self, DispatchError> {
        match value {
            "CONNECT" => Ok(Self::Connect),
            "DISCONNECT" => Ok(Self::Disconnect),
            _ => Err(DispatchError::unknown_value("command", value)),
        }
    }
}

impl InboundMessage {
    /// Decodes a text frame into the raw message shape.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::MalformedMessage` for empty input, invalid
    /// JSON, a top-level value that is not an object, or a field holding a
    /// non-string value.
    pub fn decode(text: &str) -> Result<Self, DispatchError> {
        let value: Value = serde_json::from_str(text).map_err(DispatchError::from_json_error)?;
        if !value.is_object() {
            return Err(DispatchError::malformed());
        }
        Self::deserialize(value).map_err(DispatchError::from_json_error)
    }

    /// Checks the fields in order: `messageType`, then `command`, then
    /// `pipeName` for gateway messages, or `message` for pipe messages.
    ///
    /// # Errors
    ///
    /// Returns `MissingField`, `RequiredField` or `UnknownValue` naming the
    /// first field that fails.
    pub fn validate(self) -> Result<Command, DispatchError> {
        let message_type = self
            .message_type
            .ok_or_else(|| DispatchError::missing("messageType"))?;
        match MessageType::parse(&message_type)? {
            MessageType::Gateway => {
                let command = self
                    .command
                    .ok_or_else(|| DispatchError::missing("command"))?;
                match GatewayCommand::parse(&command)? {
                    GatewayCommand::Connect => {
                        let pipe_name = self
                            .pipe_name
                            .ok_or_else(|| DispatchError::required_for("pipeName", "CONNECT"))?;
                        Ok(Command::Connect { pipe_name })
                    }
                    GatewayCommand::Disconnect => Ok(Command::Disconnect),
                }
            }
            MessageType::Pipe => {
                let payload = self
                    .message
                    .ok_or_else(|| DispatchError::required_for("message", "PIPE_MESSAGE"))?;
                Ok(Command::PipeWrite { payload })
            }
        }
    }

    /// Decodes and validates in one step.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`Self::decode`] and [`Self::validate`].
    pub fn parse_command(text: &str) -> Result<Command, DispatchError> {
        Self::decode(text)?.validate()
    }
}
