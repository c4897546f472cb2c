//! Server configuration.
//!
//! Loaded once at startup from environment variables. Absent or blank values
//! fall back to defaults; values that are present but unparseable are fatal.
//! The admin token is held as a [`SecretString`] and redacted in Debug output.

use std::{collections::HashMap, env, fmt, net::SocketAddr, time::Duration};

use secrecy::SecretString;
use thiserror::Error;

/// Default HTTP API bind address
pub const DEFAULT_APP_ADDR: &str = "0.0.0.0:8080";

/// Default realtime (WebSocket) bind address
pub const DEFAULT_APP_WS_ADDR: &str = "0.0.0.0:8081";

/// Default admin bind address (loopback only)
pub const DEFAULT_ADMIN_ADDR: &str = "127.0.0.1:9099";

/// Default graceful shutdown deadline in seconds
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

pub struct Config {
    /// HTTP API listener
    pub app_addr: SocketAddr,

    /// Realtime listener
    pub ws_addr: SocketAddr,

    /// Admin listener, started only when `admin_token` is set
    pub admin_addr: SocketAddr,

    /// Bearer secret of the admin surface. `None` disables it.
    pub admin_token: Option<SecretString>,

    /// Run the stdin operator console
    pub console: bool,

    /// Deadline for draining servers and sessions on shutdown
    pub shutdown_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("app_addr", &self.app_addr)
            .field("ws_addr", &self.ws_addr)
            .field("admin_addr", &self.admin_addr)
            .field(
                "admin_token",
                &self.admin_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("console", &self.console)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: '{value}' is not a socket address")]
    InvalidAddress { name: &'static str, value: String },

    #[error("invalid {name}: '{value}' is not a port number")]
    InvalidPort { name: &'static str, value: String },

    #[error("invalid {name}: '{value}' is not a boolean")]
    InvalidBool { name: &'static str, value: String },

    #[error("invalid {name}: '{value}' is not a positive number of seconds")]
    InvalidTimeout { name: &'static str, value: String },
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let app_addr = listen_addr(
            get("APP_ADDR"),
            get("APP_PORT"),
            "APP_ADDR",
            "APP_PORT",
            DEFAULT_APP_ADDR,
        )?;
        let ws_addr = listen_addr(
            get("APP_WS_ADDR"),
            get("APP_WS_PORT"),
            "APP_WS_ADDR",
            "APP_WS_PORT",
            DEFAULT_APP_WS_ADDR,
        )?;
        let admin_addr =
            parse_addr("ADMIN_ADDR", get("ADMIN_ADDR").unwrap_or(DEFAULT_ADMIN_ADDR))?;

        let admin_token = get("ADMIN_TOKEN").map(|token| SecretString::from(token.to_string()));

        let console = match get("CONTROL_CONSOLE") {
            None => false,
            Some(value) => parse_bool(value).ok_or_else(|| ConfigError::InvalidBool {
                name: "CONTROL_CONSOLE",
                value: value.to_string(),
            })?,
        };

        let shutdown_timeout = match get("SHUTDOWN_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            Some(value) => value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    name: "SHUTDOWN_TIMEOUT_SECS",
                    value: value.to_string(),
                })?,
        };

        Ok(Self {
            app_addr,
            ws_addr,
            admin_addr,
            admin_token,
            console,
            shutdown_timeout,
        })
    }
}

/// `*_ADDR` wins; otherwise `*_PORT` on all interfaces; otherwise the default.
fn listen_addr(
    addr: Option<&str>,
    port: Option<&str>,
    addr_name: &'static str,
    port_name: &'static str,
    default: &str,
) -> Result<SocketAddr, ConfigError> {
    if let Some(addr) = addr {
        return parse_addr(addr_name, addr);
    }
    if let Some(port) = port {
        let port: u16 = port.parse().map_err(|_| ConfigError::InvalidPort {
            name: port_name,
            value: port.to_string(),
        })?;
        return Ok(SocketAddr::from(([0, 0, 0, 0], port)));
    }
    parse_addr(addr_name, default)
}

fn parse_addr(name: &'static str, value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidAddress {
        name,
        value: value.to_string(),
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
