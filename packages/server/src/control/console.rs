//! Operator console on stdin.
//!
//! Lines are read on a dedicated OS thread in the terminal's normal (cooked)
//! mode, so the process can exit at any time without leaving the terminal in a
//! bad state. The command loop runs on the runtime and ends as soon as the
//! shutdown token is cancelled. Commands go through the same [`ControlChannel`]
//! as the admin endpoint.

use std::{
    io::{self, BufRead, Write},
    thread,
};

use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use super::{ControlChannel, StatusReporter};

pub const HELP: &str = "commands: status | stop | restart | help";

const PROMPT: &str = "chathub> ";

/// Execute one console line. Returns the text to print, if any.
pub fn handle_command(
    line: &str,
    control: &ControlChannel,
    status: &StatusReporter,
) -> Option<String> {
    let command = line.trim();
    let reply = match command {
        "" => return None,
        "help" => HELP.to_string(),
        "status" => match serde_json::to_string_pretty(&status.snapshot()) {
            Ok(json) => json,
            Err(e) => format!("failed to render status: {}", e),
        },
        "stop" => {
            control.request_stop();
            "stop requested".to_string()
        }
        "restart" => {
            control.request_restart();
            "restart requested".to_string()
        }
        other => format!("unknown command: {}", other),
    };
    Some(reply)
}

/// Forward lines of `input` to the returned receiver until EOF or a read error.
///
/// The reader thread is detached: a blocking read cannot be interrupted, and it
/// dies with the process.
fn spawn_line_reader<R>(input: R) -> mpsc::Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);
    let spawned = thread::Builder::new()
        .name("console-stdin".to_string())
        .spawn(move || {
            for line in input.lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Console read error: {}", e);
                        break;
                    }
                }
            }
        });
    if let Err(e) = spawned {
        tracing::error!("Failed to start console reader: {}", e);
    }
    rx
}

/// Command loop. Returns on EOF, after a `stop` or `restart` command, or once
/// `shutdown` is cancelled.
async fn run_console<W: Write>(
    mut lines: mpsc::Receiver<String>,
    control: ControlChannel,
    status: StatusReporter,
    shutdown: CancellationToken,
    mut out: W,
) {
    writeln!(out, "control console: type 'help'").ok();

    loop {
        write!(out, "{}", PROMPT).ok();
        out.flush().ok();

        let line = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            line = lines.recv() => line,
        };
        let Some(line) = line else {
            tracing::info!("Console closed (EOF)");
            break;
        };

        if let Some(reply) = handle_command(&line, &control, &status) {
            writeln!(out, "{}", reply).ok();
        }
        // The process is going down: stop reading commands.
        if matches!(line.trim(), "stop" | "restart") {
            break;
        }
    }
}

/// Start the console on stdin/stdout.
pub fn spawn_console(
    control: ControlChannel,
    status: StatusReporter,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let lines = spawn_line_reader(io::BufReader::new(io::stdin()));
    tokio::spawn(run_console(lines, control, status, shutdown, io::stdout()))
}
