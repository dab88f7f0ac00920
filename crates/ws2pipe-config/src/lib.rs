//! Shared configuration for the ws2pipe gateway.
//!
//! Configuration is layered by [`ortho_config`]: built-in defaults, then an
//! optional configuration file (`--config-path` or `WS2PIPE_CONFIG_PATH`),
//! then `WS2PIPE_*` environment variables, then command-line flags. The
//! daemon binary additionally accepts a lone numeric argument as the listen
//! port before handing its arguments to the loader.

mod defaults;
mod logging;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LISTEN_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT, default_listen_host,
    default_log_filter, default_log_filter_string, default_log_format, default_port,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "WS2PIPE")]
pub struct Config {
    /// Host name or address the WebSocket listener binds to.
    #[serde(default = "default_listen_host")]
    pub listen_host: String,
    /// TCP port the WebSocket listener binds to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// `tracing` filter expression applied to daemon telemetry.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for daemon telemetry.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Upper bound in milliseconds for a single blocking pipe read or write.
    ///
    /// Unset (or zero) keeps pipe I/O fully blocking.
    #[serde(default)]
    pub pipe_timeout_ms: Option<u64>,
}

impl Config {
    /// Host and port the listener binds to.
    #[must_use]
    pub fn listen_address(&self) -> (&str, u16) {
        (self.listen_host.as_str(), self.port)
    }

    /// Configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Configured log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Timeout applied to each blocking pipe wait, when one is configured.
    #[must_use]
    pub fn pipe_timeout(&self) -> Option<Duration> {
        self.pipe_timeout_ms
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_host: default_listen_host(),
            port: DEFAULT_PORT,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            pipe_timeout_ms: None,
        }
    }
}
