//! Scripted pipe doubles that record every open, write and close.

use std::collections::{HashSet, VecDeque};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use crate::session::{PipeHandle, PipeOpener};

/// How scripted pipes answer writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PipeBehaviour {
    /// Answer every write with the bytes just written.
    Echo,
    /// Answer every write with a fixed reply.
    Reply(String),
    /// Never answer; reads hit end-of-stream immediately.
    Silent,
    /// Echo, but report `extra` more readable bytes than actually exist.
    Overreport(usize),
    /// Fail every write with a broken pipe error.
    FailWrites,
    /// Echo, but fail when the handle is closed.
    FailClose,
}

#[derive(Debug)]
struct LedgerState {
    behaviour: PipeBehaviour,
    rejected: HashSet<PathBuf>,
    opened: Vec<PathBuf>,
    closed: Vec<PathBuf>,
    live: usize,
    max_live: usize,
    written: Vec<u8>,
}

/// Shared record of the pipe activity observed by [`ScriptedOpener`].
#[derive(Debug, Clone)]
pub(crate) struct PipeLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl Default for PipeLedger {
    fn default() -> Self {
        Self::with_behaviour(PipeBehaviour::Echo)
    }
}

impl PipeLedger {
    pub(crate) fn with_behaviour(behaviour: PipeBehaviour) -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                behaviour,
                rejected: HashSet::new(),
                opened: Vec::new(),
                closed: Vec::new(),
                live: 0,
                max_live: 0,
                written: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().expect("pipe ledger mutex poisoned")
    }

    /// Changes how pipes opened from now on (and already open) answer.
    pub(crate) fn set_behaviour(&self, behaviour: PipeBehaviour) {
        self.lock().behaviour = behaviour;
    }

    /// Makes opening `path` fail with `NotFound`.
    pub(crate) fn reject(&self, path: impl Into<PathBuf>) {
        self.lock().rejected.insert(path.into());
    }

    pub(crate) fn opened(&self) -> Vec<PathBuf> {
        self.lock().opened.clone()
    }

    pub(crate) fn closed(&self) -> Vec<PathBuf> {
        self.lock().closed.clone()
    }

    pub(crate) fn live(&self) -> usize {
        self.lock().live
    }

    pub(crate) fn max_live(&self) -> usize {
        self.lock().max_live
    }

    pub(crate) fn written(&self) -> Vec<u8> {
        self.lock().written.clone()
    }

    fn behaviour(&self) -> PipeBehaviour {
        self.lock().behaviour.clone()
    }
}

/// Opener producing [`ScriptedPipe`] handles bound to a shared ledger.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedOpener {
    ledger: PipeLedger,
}

impl ScriptedOpener {
    pub(crate) fn new(ledger: PipeLedger) -> Self {
        Self { ledger }
    }
}

impl PipeOpener for ScriptedOpener {
    fn open(&self, path: &Path) -> io::Result<Box<dyn PipeHandle>> {
        let mut state = self.ledger.lock();
        if state.rejected.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            ));
        }
        state.opened.push(path.to_path_buf());
        state.live += 1;
        state.max_live = state.max_live.max(state.live);
        drop(state);

        Ok(Box::new(ScriptedPipe {
            path: path.to_path_buf(),
            ledger: self.ledger.clone(),
            pending: VecDeque::new(),
        }))
    }
}

/// In-memory pipe answering writes according to the ledger's behaviour.
#[derive(Debug)]
pub(crate) struct ScriptedPipe {
    path: PathBuf,
    ledger: PipeLedger,
    pending: VecDeque<u8>,
}

impl Read for ScriptedPipe {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut count = 0;
        for slot in buf.iter_mut() {
            let Some(byte) = self.pending.pop_front() else {
                break;
            };
            *slot = byte;
            count += 1;
        }
        Ok(count)
    }
}

impl Write for ScriptedPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let behaviour = self.ledger.behaviour();
        if behaviour == PipeBehaviour::FailWrites {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed by peer"));
        }
        for byte in buf {
            self.ledger.lock().written.push(*byte);
            // Give concurrent writers a chance to interleave if nothing
            // serialises them.
            thread::yield_now();
            if matches!(
                behaviour,
                PipeBehaviour::Echo | PipeBehaviour::Overreport(_) | PipeBehaviour::FailClose
            ) {
                self.pending.push_back(*byte);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let PipeBehaviour::Reply(reply) = self.ledger.behaviour() {
            self.pending.extend(reply.as_bytes());
        }
        Ok(())
    }
}

impl PipeHandle for ScriptedPipe {
    fn remaining_len(&mut self) -> io::Result<u64> {
        let extra = match self.ledger.behaviour() {
            PipeBehaviour::Overreport(extra) => extra,
            _ => 0,
        };
        Ok(u64::try_from(self.pending.len() + extra).expect("length fits in u64"))
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        self.ledger.lock().closed.push(self.path.clone());
        if self.ledger.behaviour() == PipeBehaviour::FailClose {
            return Err(io::Error::other("close interrupted"));
        }
        Ok(())
    }
}

impl Drop for ScriptedPipe {
    fn drop(&mut self) {
        if let Ok(mut state) = self.ledger.state.lock() {
            state.live = state.live.saturating_sub(1);
        }
    }
}
