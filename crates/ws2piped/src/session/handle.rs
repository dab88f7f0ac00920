//! Pipe handle abstractions and the file-backed implementation.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use std::time::Duration;

#[cfg(unix)]
use std::os::fd::{AsRawFd, IntoRawFd};
#[cfg(unix)]
use std::os::unix::fs::FileTypeExt;

/// Open byte stream used by the pipe session.
pub trait PipeHandle: Read + Write + Send {
    /// Number of bytes still readable from the stream.
    ///
    /// Only queried after the first byte of an answer has been consumed; some
    /// pipe primitives report nothing meaningful before that.
    fn remaining_len(&mut self) -> io::Result<u64>;

    /// Releases the handle, reporting failures from the underlying close.
    fn close(self: Box<Self>) -> io::Result<()>;
}

/// Opens pipe handles by path.
pub trait PipeOpener: Send + Sync {
    /// Opens `path` for reading and writing.
    fn open(&self, path: &Path) -> io::Result<Box<dyn PipeHandle>>;
}

/// Opener producing [`FilePipe`] handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilePipeOpener {
    timeout: Option<Duration>,
}

impl FilePipeOpener {
    /// Creates an opener whose handles wait at most `timeout` for readiness.
    ///
    /// `None` keeps every read and write fully blocking.
    #[must_use]
    pub const fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl PipeOpener for FilePipeOpener {
    fn open(&self, path: &Path) -> io::Result<Box<dyn PipeHandle>> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Box::new(FilePipe::new(file, self.timeout)))
    }
}

/// Pipe handle backed by a file descriptor opened read+write.
///
/// On Unix, FIFOs report their readable length through `FIONREAD`; regular
/// files report the bytes between the current position and the end of file.
#[derive(Debug)]
pub struct FilePipe {
    file: File,
    timeout: Option<Duration>,
}

#[cfg(unix)]
#[derive(Debug, Clone, Copy)]
enum Readiness {
    Readable,
    Writable,
}

impl FilePipe {
    /// Wraps an already opened file.
    #[must_use]
    pub const fn new(file: File, timeout: Option<Duration>) -> Self {
        Self { file, timeout }
    }

    #[cfg(unix)]
    fn wait_for(&self, readiness: Readiness) -> io::Result<()> {
        let Some(timeout) = self.timeout else {
            return Ok(());
        };
        let events = match readiness {
            Readiness::Readable => libc::POLLIN,
            Readiness::Writable => libc::POLLOUT,
        };
        let millis = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);
        let mut poll_fd = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events,
            revents: 0,
        };
        loop {
            // SAFETY: `poll_fd` is a valid, exclusively borrowed pollfd and the
            // descriptor stays open for the duration of the call.
            let ready = unsafe { libc::poll(&raw mut poll_fd, 1, millis) };
            match ready {
                0 => {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("pipe was not ready within {} ms", timeout.as_millis()),
                    ));
                }
                count if count > 0 => return Ok(()),
                _ => {
                    let error = io::Error::last_os_error();
                    if error.kind() != io::ErrorKind::Interrupted {
                        return Err(error);
                    }
                }
            }
        }
    }

    #[cfg(unix)]
    fn fifo_available(&self) -> io::Result<u64> {
        let mut available: libc::c_int = 0;
        // SAFETY: FIONREAD writes a single c_int through the provided pointer.
        let result =
            unsafe { libc::ioctl(self.file.as_raw_fd(), libc::FIONREAD, &raw mut available) };
        if result < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(u64::try_from(available).unwrap_or(0))
    }
}

impl Read for FilePipe {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        #[cfg(unix)]
        self.wait_for(Readiness::Readable)?;
        self.file.read(buf)
    }
}

impl Write for FilePipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        #[cfg(unix)]
        self.wait_for(Readiness::Writable)?;
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl PipeHandle for FilePipe {
    fn remaining_len(&mut self) -> io::Result<u64> {
        let metadata = self.file.metadata()?;
        #[cfg(unix)]
        {
            if metadata.file_type().is_fifo() {
                return self.fifo_available();
            }
        }
        let position = self.file.stream_position()?;
        Ok(metadata.len().saturating_sub(position))
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        let Self { file, .. } = *self;
        #[cfg(unix)]
        {
            let fd = file.into_raw_fd();
            // SAFETY: `fd` was just released from its owning `File`, so this is
            // the only close of the descriptor.
            if unsafe { libc::close(fd) } < 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        }
        #[cfg(not(unix))]
        {
            drop(file);
            Ok(())
        }
    }
}
