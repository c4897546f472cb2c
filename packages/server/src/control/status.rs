//! Process status reported by the admin endpoint and the console.

use std::{net::SocketAddr, time::Instant};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Snapshot of the running process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStatus {
    pub pid: u32,
    pub uptime_sec: u64,
    pub started_at: String,
    pub app_http: String,
    pub app_ws: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<String>,
    pub version: String,
    pub os: String,
    pub arch: String,
}

/// Computes [`ProcessStatus`] on demand from the process start time and bound addresses
#[derive(Debug, Clone)]
pub struct StatusReporter {
    started: Instant,
    started_at: String,
    app_http: SocketAddr,
    app_ws: SocketAddr,
    admin: Option<SocketAddr>,
}

impl StatusReporter {
    pub fn new(app_http: SocketAddr, app_ws: SocketAddr, admin: Option<SocketAddr>) -> Self {
        Self {
            started: Instant::now(),
            started_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            app_http,
            app_ws,
            admin,
        }
    }

    pub fn snapshot(&self) -> ProcessStatus {
        ProcessStatus {
            pid: std::process::id(),
            uptime_sec: self.started.elapsed().as_secs(),
            started_at: self.started_at.clone(),
            app_http: self.app_http.to_string(),
            app_ws: self.app_ws.to_string(),
            admin: self.admin.map(|addr| addr.to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}
