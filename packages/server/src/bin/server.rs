//! Chathub server.
//!
//! Serves the HTTP API, the realtime WebSocket endpoint and (when `ADMIN_TOKEN`
//! is set) the admin control plane. Configuration comes from the environment.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chathub-server
//! ADMIN_TOKEN=secret cargo run --bin chathub-server -- --console
//! ```

use std::{process::ExitCode, sync::Arc};

use chathub_server::{
    config::Config,
    control::{
        ProcessSupervisor, SupervisorError, SupervisorExit, control_channel, restart_process,
    },
    domain::ChatStore,
    infrastructure::repository::InMemoryChatStore,
    ui::shutdown_signal,
};
use chathub_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chathub-server")]
#[command(about = "Chat server with per-room WebSocket fan-out and admin control plane", long_about = None)]
struct Args {
    /// Run the operator console on stdin (same as CONTROL_CONSOLE=1)
    #[arg(long)]
    console: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    config.console |= args.console;
    tracing::debug!("Loaded configuration: {:?}", config);

    // The runtime is built by hand so it is fully shut down before a restart replaces the process.
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let shutdown_timeout = config.shutdown_timeout;
    let outcome = runtime.block_on(run(config));
    runtime.shutdown_timeout(shutdown_timeout);

    match outcome {
        Ok(SupervisorExit::Stopped) => {
            tracing::info!("Server stopped");
            ExitCode::SUCCESS
        }
        Ok(SupervisorExit::RestartRequested) => ExitCode::from(restart_process()),
        Err(e) => {
            tracing::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<SupervisorExit, SupervisorError> {
    // Initialize dependencies in order:
    // 1. Storage
    // 2. Control channel
    // 3. Supervisor (listeners, registry, use cases)
    let store: Arc<dyn ChatStore> = Arc::new(InMemoryChatStore::new());
    let (control, signals) = control_channel();
    let supervisor = ProcessSupervisor::bind(config, store, control).await?;

    supervisor.run(signals, shutdown_signal()).await
}
