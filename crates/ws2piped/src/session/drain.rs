//! Write and drain-read protocol for pipe round trips.
//!
//! Pipes of this kind only report an accurate readable length once the stream
//! has been advanced by a read, so the answer is retrieved in two phases: a
//! single byte, then the reported remainder in one pass.

use std::io::{self, Read, Write};

use tracing::debug;

use super::SESSION_TARGET;
use super::errors::PipeError;
use super::handle::PipeHandle;

/// Outcome of draining the pipe after a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drained {
    /// The pipe hit end-of-stream before producing a byte.
    Empty,
    /// Text produced by the pipe, decoded as UTF-8.
    Content(String),
}

pub(super) fn write_payload(handle: &mut dyn PipeHandle, payload: &[u8]) -> io::Result<()> {
    handle.write_all(payload)?;
    handle.flush()
}

pub(super) fn drain_response(
    handle: &mut dyn PipeHandle,
    payload: &str,
) -> Result<Drained, PipeError> {
    let Some(first) = read_first_byte(handle).map_err(|source| PipeError::read(payload, source))?
    else {
        debug!(target: SESSION_TARGET, "pipe reached end of stream without content");
        return Ok(Drained::Empty);
    };

    let reported = handle
        .remaining_len()
        .map_err(|source| PipeError::read(payload, source))?;
    let remaining = usize::try_from(reported).map_err(|_| {
        PipeError::read(
            payload,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("pipe reported {reported} readable bytes"),
            ),
        )
    })?;

    let mut buffer = Vec::with_capacity(remaining.saturating_add(1));
    buffer.push(first);
    buffer.resize(remaining.saturating_add(1), 0);

    let received =
        fill_from(handle, &mut buffer[1..]).map_err(|source| PipeError::read(payload, source))?;
    if received < remaining {
        return Err(PipeError::short_read(payload, remaining, received));
    }

    debug!(
        target: SESSION_TARGET,
        bytes = buffer.len(),
        "drained pipe response"
    );
    Ok(Drained::Content(String::from_utf8_lossy(&buffer).into_owned()))
}

fn read_first_byte(handle: &mut dyn PipeHandle) -> io::Result<Option<u8>> {
    let mut byte = [0_u8; 1];
    loop {
        match handle.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => {
                let [first] = byte;
                return Ok(Some(first));
            }
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
}

/// Reads until `buffer` is full or the stream ends, returning the byte count.
fn fill_from(handle: &mut dyn PipeHandle, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match handle.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
    Ok(filled)
}
