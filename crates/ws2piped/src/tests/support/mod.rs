//! Shared doubles for the gateway test suites.

mod config_loader;
pub(crate) mod pipes;
mod reporter;
mod shutdown;

pub(crate) use config_loader::{FailingConfigLoader, TestConfigLoader};
pub(crate) use reporter::{HealthEvent, RecordingHealthReporter};
pub(crate) use shutdown::TriggeredShutdown;
