//! Process control plane: signal bus, status, console, supervisor and restart.

pub mod channel;
pub mod console;
pub mod reexec;
pub mod status;
pub mod supervisor;

pub use channel::{ControlChannel, ControlSignal, ControlSignals, control_channel};
pub use reexec::{RESTART_EXIT_CODE, restart_process};
pub use status::{ProcessStatus, StatusReporter};
pub use supervisor::{ProcessSupervisor, SupervisorError, SupervisorExit};
