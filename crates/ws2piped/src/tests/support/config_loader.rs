//! Test configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use ws2pipe_config::Config;

use crate::bootstrap::ConfigLoader;

/// Loader binding the gateway to an ephemeral loopback port.
#[derive(Debug, Clone, Default)]
pub(crate) struct TestConfigLoader {
    pipe_timeout_ms: Option<u64>,
}

impl TestConfigLoader {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Bounds pipe waits in the loaded configuration.
    #[must_use]
    pub(crate) fn with_pipe_timeout(millis: u64) -> Self {
        Self {
            pipe_timeout_ms: Some(millis),
        }
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            listen_host: "127.0.0.1".to_owned(),
            port: 0,
            log_filter: "ws2piped=debug".to_owned(),
            pipe_timeout_ms: self.pipe_timeout_ms,
            ..Config::default()
        })
    }
}

/// Loader that intentionally fails by passing an out-of-range port.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("ws2piped"),
            OsString::from("--port"),
            OsString::from("70000"),
        ];
        Config::load_from_iter(args)
    }
}
