//! Shutdown signal released by the test instead of the operating system.

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::process::{ShutdownError, ShutdownSignal};

/// Blocks [`ShutdownSignal::wait`] until a trigger handle sends.
#[derive(Debug)]
pub(crate) struct TriggeredShutdown {
    sender: Sender<()>,
    receiver: Mutex<Receiver<()>>,
}

impl TriggeredShutdown {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// Returns a handle that releases the waiting gateway.
    pub(crate) fn trigger_handle(&self) -> Sender<()> {
        self.sender.clone()
    }
}

impl ShutdownSignal for TriggeredShutdown {
    fn wait(&self) -> Result<(), ShutdownError> {
        let receiver = self.receiver.lock().expect("shutdown receiver poisoned");
        let _ = receiver.recv();
        Ok(())
    }
}
