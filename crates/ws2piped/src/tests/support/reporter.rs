//! Test double for [`HealthReporter`] that records structured events for assertions.

use std::net::SocketAddr;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use crate::bootstrap::BootstrapError;
use crate::health::HealthReporter;

use ws2pipe_config::Config;

/// Structured health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HealthEvent {
    /// Bootstrap started.
    BootstrapStarting,
    /// Bootstrap completed successfully.
    BootstrapSucceeded,
    /// Bootstrap failed with an error description.
    BootstrapFailed(String),
    /// Listener accepted connections on the address.
    GatewayListening(SocketAddr),
    /// Listener stopped and the pipe was released.
    GatewayStopped,
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub(crate) fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }

    /// Waits up to two seconds for the listener to report its address.
    pub(crate) fn wait_for_listening(&self) -> Option<SocketAddr> {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            let address = self.events().into_iter().find_map(|event| match event {
                HealthEvent::GatewayListening(address) => Some(address),
                _ => None,
            });
            if address.is_some() {
                return address;
            }
            thread::sleep(Duration::from_millis(10));
        }
        None
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn gateway_listening(&self, address: SocketAddr) {
        self.record(HealthEvent::GatewayListening(address));
    }

    fn gateway_stopped(&self) {
        self.record(HealthEvent::GatewayStopped);
    }
}
