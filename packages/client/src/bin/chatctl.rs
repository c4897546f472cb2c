//! Command-line client of the Chathub admin control plane.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatctl -- --token <T> status
//! ADMIN_TOKEN=<T> cargo run --bin chatctl -- --addr http://127.0.0.1:9099 restart
//! ```
//!
//! Exit codes: 0 on a 2xx answer, 1 on a transport error or a non-success
//! status, 2 on a usage error.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use chathub_client::{AdminClient, AdminCommand, CtlError};
use chathub_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "chatctl")]
#[command(about = "Control a running Chathub server through its admin API", long_about = None)]
struct Args {
    /// Admin base URL
    #[arg(short = 'a', long, default_value = "http://127.0.0.1:9099")]
    addr: String,

    /// Admin bearer token
    #[arg(short = 't', long, env = "ADMIN_TOKEN", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Show process status
    Status,
    /// Stop the server gracefully
    Stop,
    /// Restart the server in place
    Restart,
}

impl From<Command> for AdminCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Status => AdminCommand::Status,
            Command::Stop => AdminCommand::Stop,
            Command::Restart => AdminCommand::Restart,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    // clap exits with 2 on usage errors
    let args = Args::parse();

    let client = match AdminClient::new(&args.addr, args.token) {
        Ok(client) => client,
        Err(e @ CtlError::InvalidAddr(_)) => {
            eprintln!("chatctl: {e}");
            return ExitCode::from(2);
        }
        Err(e) => {
            eprintln!("chatctl: {e}");
            return ExitCode::FAILURE;
        }
    };

    match client.execute(args.command.into()).await {
        Ok(body) => {
            print!("{body}");
            ExitCode::SUCCESS
        }
        Err(CtlError::Status { status, body }) => {
            eprintln!("chatctl: server returned {status}");
            eprint!("{body}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("chatctl: {e}");
            ExitCode::FAILURE
        }
    }
}
