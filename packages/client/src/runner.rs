//! Admin requests issued by chatctl.

use std::time::Duration;

use reqwest::{Client, Method};

use super::error::CtlError;

/// Per-request deadline
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    Status,
    Stop,
    Restart,
}

impl AdminCommand {
    fn method(self) -> Method {
        match self {
            AdminCommand::Status => Method::GET,
            AdminCommand::Stop | AdminCommand::Restart => Method::POST,
        }
    }

    fn path(self) -> &'static str {
        match self {
            AdminCommand::Status => "/admin/status",
            AdminCommand::Stop => "/admin/stop",
            AdminCommand::Restart => "/admin/restart",
        }
    }
}

pub struct AdminClient {
    http: Client,
    base: String,
    token: String,
}

impl AdminClient {
    /// `addr` is `http://host:port`; a bare `host:port` gets `http://` prepended.
    pub fn new(addr: &str, token: impl Into<String>) -> Result<Self, CtlError> {
        let addr = addr.trim().trim_end_matches('/');
        if addr.is_empty() {
            return Err(CtlError::InvalidAddr(addr.to_string()));
        }
        let base = if addr.starts_with("http://") || addr.starts_with("https://") {
            addr.to_string()
        } else {
            format!("http://{addr}")
        };
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base,
            token: token.into(),
        })
    }

    /// Send `command` and return the response body on a 2xx answer.
    pub async fn execute(&self, command: AdminCommand) -> Result<String, CtlError> {
        let url = format!("{}{}", self.base, command.path());
        tracing::debug!("{} {}", command.method(), url);

        let response = self
            .http
            .request(command.method(), &url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() >= 300 {
            return Err(CtlError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
