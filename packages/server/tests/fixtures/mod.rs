//! In-process test server.
//!
//! Runs the real supervisor on ephemeral loopback ports inside the test runtime
//! and stops it when dropped.

#![allow(dead_code)]

use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use chathub_server::{
    config::Config,
    control::{ControlChannel, ProcessSupervisor, SupervisorError, SupervisorExit, control_channel},
    infrastructure::repository::InMemoryChatStore,
};
use futures_util::StreamExt;
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

pub const ADMIN_TOKEN: &str = "test-token";

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Helper struct to manage the server lifecycle
pub struct TestServer {
    pub app_addr: SocketAddr,
    pub ws_addr: SocketAddr,
    pub admin_addr: SocketAddr,
    control: ControlChannel,
    handle: Option<JoinHandle<Result<SupervisorExit, SupervisorError>>>,
}

impl TestServer {
    /// Start a server with the admin surface enabled
    pub async fn start() -> Self {
        let vars: HashMap<String, String> = [
            ("APP_ADDR", "127.0.0.1:0"),
            ("APP_WS_ADDR", "127.0.0.1:0"),
            ("ADMIN_ADDR", "127.0.0.1:0"),
            ("ADMIN_TOKEN", ADMIN_TOKEN),
            ("SHUTDOWN_TIMEOUT_SECS", "3"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let config = Config::from_vars(&vars).expect("test config is valid");

        let (control, signals) = control_channel();
        let supervisor = ProcessSupervisor::bind(
            config,
            Arc::new(InMemoryChatStore::new()),
            control.clone(),
        )
        .await
        .expect("Failed to bind test server");

        let app_addr = supervisor.app_addr();
        let ws_addr = supervisor.ws_addr();
        let admin_addr = supervisor.admin_addr().expect("admin enabled");
        let handle = tokio::spawn(supervisor.run(signals, std::future::pending::<()>()));

        TestServer {
            app_addr,
            ws_addr,
            admin_addr,
            control,
            handle: Some(handle),
        }
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.app_addr, path)
    }

    pub fn admin_url(&self, path: &str) -> String {
        format!("http://{}{}", self.admin_addr, path)
    }

    pub fn ws_url(&self, room_id: &str) -> String {
        format!("ws://{}/ws?roomId={}", self.ws_addr, room_id)
    }

    pub fn control(&self) -> &ControlChannel {
        &self.control
    }

    /// Wait for the supervisor to finish
    pub async fn exit(mut self) -> Result<SupervisorExit, SupervisorError> {
        let handle = self.handle.take().expect("server still running");
        tokio::time::timeout(Duration::from_secs(10), handle)
            .await
            .expect("server did not shut down in time")
            .expect("supervisor task panicked")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.control.request_stop();
        }
    }
}

/// Create a room through the HTTP API and return its id
pub async fn create_room(server: &TestServer, name: &str) -> i64 {
    let response = reqwest::Client::new()
        .post(server.http_url("/v1/rooms"))
        .json(&serde_json::json!({ "name": name }))
        .send()
        .await
        .expect("create room request");
    assert_eq!(response.status(), 201);
    let room: serde_json::Value = response.json().await.expect("room json");
    room["id"].as_i64().expect("room id")
}

pub async fn connect(server: &TestServer, room_id: i64) -> WsClient {
    let (ws, _response) = tokio_tungstenite::connect_async(server.ws_url(&room_id.to_string()))
        .await
        .expect("WebSocket connect");
    ws
}

/// Read frames until one contains `needle`; false on close or timeout
pub async fn recv_containing(ws: &mut WsClient, needle: &str) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        match tokio::time::timeout_at(deadline, ws.next()).await {
            Ok(Some(Ok(Message::Text(text)))) if text.as_str().contains(needle) => return true,
            Ok(Some(Ok(Message::Close(_)))) | Ok(Some(Err(_))) | Ok(None) | Err(_) => {
                return false;
            }
            Ok(Some(Ok(_))) => continue,
        }
    }
}

/// True if no text frame arrives within `window`
pub async fn stays_silent(ws: &mut WsClient, window: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + window;
    loop {
        match tokio::time::timeout_at(deadline, ws.next()).await {
            Err(_) => return true,
            Ok(Some(Ok(Message::Text(_)))) => return false,
            Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => continue,
            Ok(_) => return true,
        }
    }
}

/// True once the server closes the connection (within 5 s)
pub async fn expect_closed(ws: &mut WsClient) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        match tokio::time::timeout_at(deadline, ws.next()).await {
            Err(_) => return false,
            Ok(None) | Ok(Some(Err(_))) | Ok(Some(Ok(Message::Close(_)))) => return true,
            Ok(Some(Ok(_))) => continue,
        }
    }
}
