//! UI 層: the HTTP API, realtime and admin listeners.

pub mod error;
pub mod handler;
pub mod router;
pub mod session;
pub mod signal;
pub mod state;

pub use router::{admin_router, app_router, realtime_router};
pub use signal::shutdown_signal;
pub use state::{AdminState, AppState, RealtimeState};
