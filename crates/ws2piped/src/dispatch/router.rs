//! Routing of validated commands onto the shared pipe session.
//!
//! The router owns the only [`PipeSession`] in the process behind one mutex.
//! Each message is handled to completion while the lock is held, so a
//! `CONNECT` can never swap the pipe out from under a write that is still
//! draining its answer, and two writes never interleave on the pipe.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::session::{Drained, PipeSession};

use super::errors::DispatchError;
use super::request::{Command, InboundMessage};
use super::response::Response;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Text returned when the pipe answered a write with nothing at all.
pub const EMPTY_DRAIN_RESPONSE: &str = "OK";

/// Dispatches client messages against the process-wide pipe session.
#[derive(Debug)]
pub struct MessageRouter {
    session: Mutex<PipeSession>,
}

impl MessageRouter {
    /// Creates a router that takes ownership of `session`.
    pub fn new(session: PipeSession) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    /// Handles one inbound text message and builds its response.
    ///
    /// Decode, validation and pipe failures all become `ERROR` responses;
    /// nothing escapes the message boundary.
    pub fn handle_text(&self, text: &str) -> Response {
        let outcome = InboundMessage::parse_command(text).and_then(|command| self.dispatch(command));
        match outcome {
            Ok(response) => Response::ok(response),
            Err(error) => {
                if error.is_rejection() {
                    debug!(target: DISPATCH_TARGET, %error, "message rejected");
                } else {
                    warn!(target: DISPATCH_TARGET, %error, "pipe operation failed");
                }
                Response::error(error.to_string())
            }
        }
    }

    /// Applies a validated command to the session.
    ///
    /// Returns the text placed in the `response` field on success.
    ///
    /// # Errors
    ///
    /// Returns `NoPipeConnection` for writes while disconnected and wraps
    /// pipe failures in `DispatchError::Pipe`.
    pub fn dispatch(&self, command: Command) -> Result<String, DispatchError> {
        let mut session = self.lock_session();
        match command {
            Command::Connect { pipe_name } => {
                debug!(target: DISPATCH_TARGET, pipe = %pipe_name, "connect requested");
                session.open(&pipe_name)?;
                Ok(String::new())
            }
            Command::Disconnect => {
                debug!(target: DISPATCH_TARGET, "disconnect requested");
                session.close();
                Ok(String::new())
            }
            Command::PipeWrite { payload } => {
                if !session.is_connected() {
                    return Err(DispatchError::NoPipeConnection);
                }
                debug!(
                    target: DISPATCH_TARGET,
                    bytes = payload.len(),
                    "forwarding pipe message"
                );
                match session.write_then_read(&payload)? {
                    Drained::Empty => Ok(EMPTY_DRAIN_RESPONSE.to_owned()),
                    Drained::Content(text) => Ok(text),
                }
            }
        }
    }

    /// Returns true while a pipe is open.
    pub fn is_connected(&self) -> bool {
        self.lock_session().is_connected()
    }

    /// Closes the open pipe, if any. Used when the gateway stops.
    pub fn shutdown(&self) {
        self.lock_session().close();
    }

    fn lock_session(&self) -> MutexGuard<'_, PipeSession> {
        self.session.lock().unwrap_or_else(|poisoned| {
            warn!(
                target: DISPATCH_TARGET,
                "pipe session lock poisoned; recovering session state"
            );
            self.session.clear_poison();
            poisoned.into_inner()
        })
    }
}
