//! UseCase: readiness check (storage ping)

use std::{sync::Arc, time::Duration};

use crate::domain::ChatStore;

use super::{READINESS_TIMEOUT, UseCaseError, with_deadline};

pub struct CheckReadinessUseCase {
    store: Arc<dyn ChatStore>,
    timeout: Duration,
}

impl CheckReadinessUseCase {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self {
            store,
            timeout: READINESS_TIMEOUT,
        }
    }

    /// Override the ping deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn execute(&self) -> Result<(), UseCaseError> {
        with_deadline(self.timeout, self.store.ping()).await
    }
}
