//! Error types for chatctl.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CtlError {
    /// The admin address could not be used as a base URL
    #[error("invalid admin address '{0}'")]
    InvalidAddr(String),

    /// Connection refused, timeout or another transport failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server returned {status}: {}", body.trim_end())]
    Status { status: u16, body: String },
}
