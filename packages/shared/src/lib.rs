//! Utilities shared by the Chathub server and the `chatctl` client.

pub mod logger;
pub mod time;
