//! Ownership of the single pipe handle shared by every client connection.
//!
//! A [`PipeSession`] holds at most one open pipe. Opening a new pipe always
//! closes the previous handle first, so two handles are never alive at once.
//! Writes are answered through the drain-read protocol: one byte is read to
//! wake the stream, the remaining readable length is queried, and exactly
//! that many further bytes are read.

mod drain;
mod errors;
mod handle;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use self::drain::Drained;
pub use self::errors::PipeError;
pub use self::handle::{FilePipe, FilePipeOpener, PipeHandle, PipeOpener};

/// Tracing target for pipe session events.
pub(crate) const SESSION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::session");

/// Process-wide record of which pipe, if any, is currently open.
pub struct PipeSession {
    opener: Box<dyn PipeOpener>,
    active: Option<ActivePipe>,
}

struct ActivePipe {
    path: PathBuf,
    handle: Box<dyn PipeHandle>,
}

impl PipeSession {
    /// Creates a disconnected session that opens pipes through `opener`.
    pub fn new(opener: impl PipeOpener + 'static) -> Self {
        Self {
            opener: Box::new(opener),
            active: None,
        }
    }

    /// Returns true while a pipe handle is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.active.is_some()
    }

    /// Path of the currently open pipe.
    #[must_use]
    pub fn pipe_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|active| active.path.as_path())
    }

    /// Replaces the current handle with a freshly opened `pipe_name`.
    ///
    /// Any existing handle is closed before the new path is opened.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Open`] when the path cannot be opened for reading
    /// and writing. The session is left without a handle in that case.
    pub fn open(&mut self, pipe_name: &str) -> Result<(), PipeError> {
        self.close();

        let path = PathBuf::from(pipe_name);
        let handle = self
            .opener
            .open(&path)
            .map_err(|source| PipeError::open(pipe_name, source))?;
        info!(
            target: SESSION_TARGET,
            pipe = %path.display(),
            "pipe opened"
        );
        self.active = Some(ActivePipe { path, handle });
        Ok(())
    }

    /// Closes the current handle, if any.
    ///
    /// The session never reports close failures: the handle is considered
    /// gone whatever the underlying close call returns.
    pub fn close(&mut self) {
        let Some(ActivePipe { path, handle }) = self.active.take() else {
            return;
        };
        match handle.close() {
            Ok(()) => {
                info!(
                    target: SESSION_TARGET,
                    pipe = %path.display(),
                    "pipe closed"
                );
            }
            Err(error) => {
                warn!(
                    target: SESSION_TARGET,
                    pipe = %path.display(),
                    %error,
                    "pipe close failed; discarding handle"
                );
            }
        }
    }

    /// Writes `payload` to the open pipe and drains the pipe's answer.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::NotConnected`] when no pipe is open,
    /// [`PipeError::Write`] when the payload cannot be written, and
    /// [`PipeError::Read`] or [`PipeError::ShortRead`] when the answer cannot
    /// be drained. The handle stays open after write or read failures.
    pub fn write_then_read(&mut self, payload: &str) -> Result<Drained, PipeError> {
        let active = self.active.as_mut().ok_or(PipeError::NotConnected)?;
        debug!(
            target: SESSION_TARGET,
            pipe = %active.path.display(),
            bytes = payload.len(),
            "writing pipe payload"
        );
        drain::write_payload(active.handle.as_mut(), payload.as_bytes())
            .map_err(|source| PipeError::write(payload, source))?;
        drain::drain_response(active.handle.as_mut(), payload)
    }
}

impl std::fmt::Debug for PipeSession {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("PipeSession")
            .field("pipe", &self.pipe_path())
            .finish_non_exhaustive()
    }
}
