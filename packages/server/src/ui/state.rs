//! Shared state of the three routers.

use std::sync::Arc;

use secrecy::SecretString;
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use crate::{
    control::{ControlChannel, StatusReporter},
    domain::ChatStore,
    infrastructure::hub::ConnectionRegistry,
    usecase::{
        CheckReadinessUseCase, CreateRoomUseCase, ListMessagesUseCase, ListRoomsUseCase,
        SendMessageUseCase,
    },
};

/// State of the HTTP API listener
pub struct AppState {
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub list_rooms_usecase: Arc<ListRoomsUseCase>,
    /// Also shared with the realtime listener
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub list_messages_usecase: Arc<ListMessagesUseCase>,
    pub check_readiness_usecase: Arc<CheckReadinessUseCase>,
}

impl AppState {
    pub fn new(store: Arc<dyn ChatStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            create_room_usecase: Arc::new(CreateRoomUseCase::new(store.clone())),
            list_rooms_usecase: Arc::new(ListRoomsUseCase::new(store.clone())),
            send_message_usecase: Arc::new(SendMessageUseCase::new(store.clone(), registry)),
            list_messages_usecase: Arc::new(ListMessagesUseCase::new(store.clone())),
            check_readiness_usecase: Arc::new(CheckReadinessUseCase::new(store)),
        }
    }
}

/// State of the realtime (WebSocket) listener
pub struct RealtimeState {
    pub registry: Arc<ConnectionRegistry>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// Live sessions, awaited during shutdown
    pub sessions: TaskTracker,
    /// Cancelled when the process begins shutting down
    pub shutdown: CancellationToken,
}

/// State of the admin listener
pub struct AdminState {
    pub token: SecretString,
    pub control: ControlChannel,
    pub status: StatusReporter,
}
