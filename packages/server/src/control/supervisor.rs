//! Process supervisor.
//!
//! Owns the listeners and decides when the process ends:
//!
//! 1. `bind` opens every listener up front (a bind failure is fatal).
//! 2. `run` serves until an OS signal, a control signal or a server failure.
//! 3. Shutdown cancels the root token, then waits for the servers and live
//!    sessions up to the configured deadline and aborts whatever is left.

use std::{future::Future, io, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use thiserror::Error;
use tokio::{net::TcpListener, task::JoinSet};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use super::{ControlChannel, ControlSignal, ControlSignals, StatusReporter, console};
use crate::{
    config::Config,
    domain::ChatStore,
    infrastructure::hub::ConnectionRegistry,
    ui::{AdminState, AppState, RealtimeState, admin_router, app_router, realtime_router},
};

/// How a supervised run ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorExit {
    /// OS signal or stop request: terminate
    Stopped,
    /// Restart request: replace the process once the runtime is down
    RestartRequested,
}

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("failed to bind {name} listener on {addr}: {source}")]
    Bind {
        name: &'static str,
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("{name} server failed: {source}")]
    Server {
        name: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{name} server stopped unexpectedly")]
    ServerExited { name: &'static str },

    #[error("server task panicked: {0}")]
    Task(String),
}

struct Bound {
    listener: TcpListener,
    addr: SocketAddr,
}

async fn bind_listener(name: &'static str, addr: SocketAddr) -> Result<Bound, SupervisorError> {
    let bind_error = |source| SupervisorError::Bind { name, addr, source };
    let listener = TcpListener::bind(addr).await.map_err(bind_error)?;
    let addr = listener.local_addr().map_err(bind_error)?;
    tracing::info!("{} listening on {}", name, addr);
    Ok(Bound { listener, addr })
}

pub struct ProcessSupervisor {
    app: Bound,
    ws: Bound,
    admin: Option<(Bound, Arc<AdminState>)>,
    app_state: Arc<AppState>,
    realtime_state: Arc<RealtimeState>,
    control: ControlChannel,
    status: StatusReporter,
    console: bool,
    shutdown: CancellationToken,
    shutdown_timeout: Duration,
}

impl ProcessSupervisor {
    /// Bind every listener and wire the shared state.
    pub async fn bind(
        config: Config,
        store: Arc<dyn ChatStore>,
        control: ControlChannel,
    ) -> Result<Self, SupervisorError> {
        let app = bind_listener("http", config.app_addr).await?;
        let ws = bind_listener("realtime", config.ws_addr).await?;
        let admin_bound = match &config.admin_token {
            Some(_) => Some(bind_listener("admin", config.admin_addr).await?),
            None => {
                tracing::info!("ADMIN_TOKEN is not set, admin endpoint disabled");
                None
            }
        };

        let status =
            StatusReporter::new(app.addr, ws.addr, admin_bound.as_ref().map(|b| b.addr));
        let shutdown = CancellationToken::new();
        let registry = Arc::new(ConnectionRegistry::new());

        let app_state = Arc::new(AppState::new(store, registry.clone()));
        let realtime_state = Arc::new(RealtimeState {
            registry,
            send_message_usecase: app_state.send_message_usecase.clone(),
            sessions: TaskTracker::new(),
            shutdown: shutdown.clone(),
        });
        let admin = match (admin_bound, config.admin_token) {
            (Some(bound), Some(token)) => Some((
                bound,
                Arc::new(AdminState {
                    token,
                    control: control.clone(),
                    status: status.clone(),
                }),
            )),
            _ => None,
        };

        Ok(Self {
            app,
            ws,
            admin,
            app_state,
            realtime_state,
            control,
            status,
            console: config.console,
            shutdown,
            shutdown_timeout: config.shutdown_timeout,
        })
    }

    pub fn app_addr(&self) -> SocketAddr {
        self.app.addr
    }

    pub fn ws_addr(&self) -> SocketAddr {
        self.ws.addr
    }

    pub fn admin_addr(&self) -> Option<SocketAddr> {
        self.admin.as_ref().map(|(bound, _)| bound.addr)
    }

    pub fn status(&self) -> &StatusReporter {
        &self.status
    }

    /// Serve until `os_signal` resolves, a control signal arrives or a server fails.
    pub async fn run<F>(
        self,
        mut signals: ControlSignals,
        os_signal: F,
    ) -> Result<SupervisorExit, SupervisorError>
    where
        F: Future<Output = ()>,
    {
        let shutdown = self.shutdown.clone();
        let sessions = self.realtime_state.sessions.clone();

        let mut servers = JoinSet::new();
        servers.spawn(serve(
            "http",
            self.app.listener,
            app_router(self.app_state),
            shutdown.clone(),
        ));
        servers.spawn(serve(
            "realtime",
            self.ws.listener,
            realtime_router(self.realtime_state),
            shutdown.clone(),
        ));
        if let Some((bound, state)) = self.admin {
            servers.spawn(serve(
                "admin",
                bound.listener,
                admin_router(state),
                shutdown.clone(),
            ));
        }
        let console = self.console.then(|| {
            console::spawn_console(self.control.clone(), self.status.clone(), shutdown.clone())
        });

        let outcome = tokio::select! {
            _ = os_signal => Ok(SupervisorExit::Stopped),
            signal = signals.recv() => match signal {
                Some(ControlSignal::RestartRequested) => {
                    tracing::info!("Restart requested, starting graceful shutdown...");
                    Ok(SupervisorExit::RestartRequested)
                }
                Some(ControlSignal::StopRequested) | None => {
                    tracing::info!("Stop requested, starting graceful shutdown...");
                    Ok(SupervisorExit::Stopped)
                }
            },
            Some(joined) = servers.join_next() => {
                let err = server_failure(joined);
                tracing::error!("{}, shutting down", err);
                Err(err)
            }
        };

        shutdown.cancel();
        sessions.close();

        let deadline = self.shutdown_timeout;
        let drained = tokio::time::timeout(deadline, async {
            while let Some(joined) = servers.join_next().await {
                if let Err(e) = flatten(joined) {
                    tracing::warn!("Error while shutting down: {}", e);
                }
            }
            sessions.wait().await;
            if let Some(console) = console {
                console.await.ok();
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                "Graceful shutdown exceeded {:?}; aborting {} server(s), {} session(s) still open",
                deadline,
                servers.len(),
                sessions.len()
            );
            servers.abort_all();
        } else {
            tracing::info!("Shutdown complete");
        }

        outcome
    }
}

async fn serve(
    name: &'static str,
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> Result<&'static str, SupervisorError> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await
        .map_err(|source| SupervisorError::Server { name, source })?;
    if !shutdown.is_cancelled() {
        return Err(SupervisorError::ServerExited { name });
    }
    tracing::info!("{} server stopped", name);
    Ok(name)
}

type Joined = Result<Result<&'static str, SupervisorError>, tokio::task::JoinError>;

fn flatten(joined: Joined) -> Result<&'static str, SupervisorError> {
    joined.map_err(|e| SupervisorError::Task(e.to_string()))?
}

/// A server finishing before shutdown is always a failure
fn server_failure(joined: Joined) -> SupervisorError {
    match flatten(joined) {
        Ok(name) => SupervisorError::ServerExited { name },
        Err(e) => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::{control::control_channel, infrastructure::repository::InMemoryChatStore};

    fn config(pairs: &[(&str, &str)]) -> Config {
        let mut vars: HashMap<String, String> = [
            ("APP_ADDR", "127.0.0.1:0"),
            ("APP_WS_ADDR", "127.0.0.1:0"),
            ("ADMIN_ADDR", "127.0.0.1:0"),
            ("SHUTDOWN_TIMEOUT_SECS", "2"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in pairs {
            vars.insert(k.to_string(), v.to_string());
        }
        Config::from_vars(&vars).unwrap()
    }

    #[tokio::test]
    async fn test_admin_listener_disabled_without_token() {
        // テスト項目: ADMIN_TOKEN が無い場合は admin listener を開かない
        // given (前提条件):
        let (control, _signals) = control_channel();

        // when (操作):
        let supervisor =
            ProcessSupervisor::bind(config(&[]), Arc::new(InMemoryChatStore::new()), control)
                .await
                .unwrap();

        // then (期待する結果):
        assert!(supervisor.admin_addr().is_none());
        assert_ne!(supervisor.app_addr().port(), 0);
        assert_ne!(supervisor.ws_addr().port(), 0);
        assert!(supervisor.status().snapshot().admin.is_none());
    }

    #[tokio::test]
    async fn test_bind_failure_is_fatal() {
        // テスト項目: 使用中のポートへの bind はエラーになる
        // given (前提条件):
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port().to_string();
        let (control, _signals) = control_channel();

        // when (操作):
        let result = ProcessSupervisor::bind(
            config(&[("APP_ADDR", &format!("127.0.0.1:{port}"))]),
            Arc::new(InMemoryChatStore::new()),
            control,
        )
        .await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(SupervisorError::Bind { name: "http", .. })
        ));
    }

    #[tokio::test]
    async fn test_stop_request_ends_run() {
        // テスト項目: StopRequested で run が Stopped を返す
        // given (前提条件):
        let (control, signals) = control_channel();
        let supervisor = ProcessSupervisor::bind(
            config(&[("ADMIN_TOKEN", "t")]),
            Arc::new(InMemoryChatStore::new()),
            control.clone(),
        )
        .await
        .unwrap();

        // when (操作):
        control.request_stop();
        let exit = supervisor
            .run(signals, std::future::pending::<()>())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(exit, SupervisorExit::Stopped);
    }

    #[tokio::test]
    async fn test_restart_request_ends_run() {
        // テスト項目: RestartRequested で run が RestartRequested を返す
        // given (前提条件):
        let (control, signals) = control_channel();
        let supervisor = ProcessSupervisor::bind(
            config(&[]),
            Arc::new(InMemoryChatStore::new()),
            control.clone(),
        )
        .await
        .unwrap();

        // when (操作):
        control.request_restart();
        let exit = supervisor
            .run(signals, std::future::pending::<()>())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(exit, SupervisorExit::RestartRequested);
    }

    #[tokio::test]
    async fn test_os_signal_ends_run() {
        // テスト項目: OS シグナル相当の future が完了すると Stopped で終わる
        // given (前提条件):
        let (control, signals) = control_channel();
        let supervisor =
            ProcessSupervisor::bind(config(&[]), Arc::new(InMemoryChatStore::new()), control)
                .await
                .unwrap();

        // when (操作):
        let exit = supervisor.run(signals, async {}).await.unwrap();

        // then (期待する結果):
        assert_eq!(exit, SupervisorExit::Stopped);
    }
}
