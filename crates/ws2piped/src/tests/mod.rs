//! Test suites for the gateway daemon.

pub(crate) mod support;
