//! UseCase 層
//!
//! Each use case wraps one storage interaction with a bounded timeout so a
//! stalled backend surfaces as an error instead of a hung request or session.

pub mod check_readiness;
pub mod create_room;
pub mod error;
pub mod list_messages;
pub mod list_rooms;
pub mod send_message;

#[cfg(test)]
pub(crate) mod test_support;

use std::{future::Future, time::Duration};

pub use check_readiness::CheckReadinessUseCase;
pub use create_room::CreateRoomUseCase;
pub use error::UseCaseError;
pub use list_messages::ListMessagesUseCase;
pub use list_rooms::ListRoomsUseCase;
pub use send_message::SendMessageUseCase;

use crate::domain::RepositoryError;

/// Deadline for a single storage call on the HTTP and realtime paths
pub const STORAGE_TIMEOUT: Duration = Duration::from_secs(3);

/// Deadline for the readiness ping
pub const READINESS_TIMEOUT: Duration = Duration::from_secs(2);

async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, UseCaseError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result.map_err(UseCaseError::from),
        Err(_) => Err(UseCaseError::Timeout(deadline)),
    }
}
