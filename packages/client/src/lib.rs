//! chatctl: client of the Chathub admin control plane.

pub mod error;
pub mod runner;

pub use error::CtlError;
pub use runner::{AdminClient, AdminCommand, REQUEST_TIMEOUT};
