//! Chathub server library.
//!
//! Room/message HTTP API, per-room WebSocket fan-out and an authenticated admin
//! control plane with graceful stop and in-place restart.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// process
pub mod config;
pub mod control;
