//! Sequences gateway startup, runs the listener and tears it down on
//! shutdown.

use std::env;
use std::sync::Arc;

use tracing::info;

use crate::args::normalise_arguments;
use crate::bootstrap::{ConfigLoader, StaticConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::dispatch::GatewayConnectionHandler;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::session::FilePipeOpener;
use crate::transport::SocketListener;

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Collaborators required to launch the gateway.
pub(crate) struct LaunchPlan<L, S> {
    pub(crate) loader: L,
    pub(crate) reporter: Arc<dyn HealthReporter>,
    pub(crate) shutdown: S,
}

/// Runs the gateway using the process arguments and production
/// collaborators, returning once a termination signal has been handled.
pub fn run_gateway() -> Result<(), LaunchError> {
    let args = normalise_arguments(env::args_os())?;
    let plan = LaunchPlan {
        loader: SystemConfigLoader::new(args),
        reporter: Arc::new(StructuredHealthReporter::new()),
        shutdown: SystemShutdownSignal::new(),
    };
    run_gateway_with(plan)
}

/// Runs the gateway with injected collaborators.
pub(crate) fn run_gateway_with<L, S>(plan: LaunchPlan<L, S>) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    S: ShutdownSignal,
{
    let LaunchPlan {
        loader,
        reporter,
        shutdown,
    } = plan;

    let config = loader.load()?;
    let opener = FilePipeOpener::new(config.pipe_timeout());
    let static_loader = StaticConfigLoader::new(config.clone());
    let gateway = bootstrap_with(&static_loader, Arc::clone(&reporter), opener)?;

    let (host, port) = config.listen_address();
    let listener = SocketListener::bind(host, port)?;
    let address = listener.local_addr();
    let router = gateway.router();
    let handler = Arc::new(GatewayConnectionHandler::new(Arc::clone(&router)));
    let listener_handle = listener.start(handler)?;
    reporter.gateway_listening(address);

    shutdown.wait()?;
    info!(target: PROCESS_TARGET, "stopping gateway");
    listener_handle.shutdown();
    listener_handle.join()?;
    router.shutdown();
    reporter.gateway_stopped();
    info!(
        target: PROCESS_TARGET,
        "shutdown sequence completed"
    );
    Ok(())
}
