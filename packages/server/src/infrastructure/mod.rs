//! Infrastructure layer: wire DTOs, storage implementations and the realtime hub.

pub mod dto;
pub mod hub;
pub mod repository;
