//! Self-replacement on restart.

use std::{env, ffi::OsString, io, path::PathBuf};

use thiserror::Error;

/// Exit status asking an external supervisor to start the process again
pub const RESTART_EXIT_CODE: u8 = 75;

#[derive(Debug, Error)]
pub enum ReexecError {
    #[error("failed to resolve current executable: {0}")]
    CurrentExe(#[source] io::Error),

    #[error("failed to exec {path}: {source}")]
    Exec {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("in-place process replacement is not supported on this platform")]
    Unsupported,
}

/// Replace the current process image with the same executable and arguments.
///
/// The environment is inherited. On success this never returns.
pub fn reexec_self() -> ReexecError {
    let exe = match env::current_exe() {
        Ok(exe) => exe,
        Err(e) => return ReexecError::CurrentExe(e),
    };
    let args: Vec<OsString> = env::args_os().skip(1).collect();
    tracing::info!("Restarting process: {} with args: {:?}", exe.display(), args);
    exec(exe, args)
}

#[cfg(unix)]
fn exec(exe: PathBuf, args: Vec<OsString>) -> ReexecError {
    use std::os::unix::process::CommandExt;

    let source = std::process::Command::new(&exe).args(&args).exec();
    ReexecError::Exec { path: exe, source }
}

#[cfg(not(unix))]
fn exec(_exe: PathBuf, _args: Vec<OsString>) -> ReexecError {
    ReexecError::Unsupported
}

/// Restart the process in place. Returns only if that was not possible, with the exit code to use.
pub fn restart_process() -> u8 {
    match reexec_self() {
        ReexecError::Unsupported => {
            tracing::info!(
                "Process replacement unsupported, exiting with status {} for the supervisor to restart",
                RESTART_EXIT_CODE
            );
            RESTART_EXIT_CODE
        }
        e => {
            tracing::error!("Restart failed: {}", e);
            1
        }
    }
}
