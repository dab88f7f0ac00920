//! WebSocket gateway for a local named pipe.
//!
//! The daemon lets networked clients drive a process that only speaks
//! through a pipe. Clients connect over WebSocket and send JSON messages that
//! open a pipe, write to it, or close it; each message is answered with one
//! JSON envelope carrying either the pipe's answer or an error.
//!
//! One [`PipeSession`] is shared by every connection. The [`MessageRouter`]
//! guards it with a single mutex, so a write and the read of its answer
//! always complete before any other client touches the pipe.
//!
//! Startup follows the usual sequence: configuration is loaded through
//! [`ws2pipe_config`], structured telemetry is installed, the listener is
//! bound, and the gateway runs until a termination signal arrives. Health
//! reporting hooks emit structured events at each stage.

mod args;
mod bootstrap;
pub mod dispatch;
mod health;
mod process;
pub mod session;
mod telemetry;
mod transport;

pub use args::{ArgumentError, normalise_arguments};
pub use bootstrap::{
    BootstrapError, ConfigLoader, Gateway, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use dispatch::{Command, DispatchError, MessageRouter, Response, Status};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_gateway};
pub use session::{Drained, FilePipeOpener, PipeError, PipeSession};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
