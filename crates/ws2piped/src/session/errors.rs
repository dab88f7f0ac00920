//! Error types for pipe session operations.

use std::io;

use thiserror::Error;

/// Failures raised while opening, writing or draining the pipe.
///
/// The display text of each variant is what clients receive in the `error`
/// field of an ERROR response.
#[derive(Debug, Error)]
pub enum PipeError {
    /// The pipe path could not be opened for reading and writing.
    #[error("error while opening pipe '{path}': {source}")]
    Open {
        /// Path supplied by the client.
        path: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The payload could not be written to the pipe.
    #[error("error while writing command: {payload}: {source}")]
    Write {
        /// Payload that triggered the failure.
        payload: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// Reading the pipe's answer failed.
    #[error("error while reading response for command: {payload}: {source}")]
    Read {
        /// Payload whose answer was being read.
        payload: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The pipe delivered fewer bytes than it reported as readable.
    #[error(
        "error while reading response for command: {payload}: expected {expected} bytes, \
         received {received}"
    )]
    ShortRead {
        /// Payload whose answer was being read.
        payload: String,
        /// Bytes the pipe reported after the first byte.
        expected: usize,
        /// Bytes actually read after the first byte.
        received: usize,
    },
    /// A pipe operation was requested while no pipe is open.
    #[error("no pipe is open")]
    NotConnected,
}

impl PipeError {
    /// Creates an open error for `path`.
    pub fn open(path: impl Into<String>, source: io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Creates a write error for `payload`.
    pub fn write(payload: impl Into<String>, source: io::Error) -> Self {
        Self::Write {
            payload: payload.into(),
            source,
        }
    }

    /// Creates a read error for `payload`.
    pub fn read(payload: impl Into<String>, source: io::Error) -> Self {
        Self::Read {
            payload: payload.into(),
            source,
        }
    }

    /// Creates a short read error for `payload`.
    pub fn short_read(payload: impl Into<String>, expected: usize, received: usize) -> Self {
        Self::ShortRead {
            payload: payload.into(),
            expected,
            received,
        }
    }
}
