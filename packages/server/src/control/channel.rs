//! In-process control signal bus.
//!
//! Two single-slot queues, one per signal kind. Requests never block: a request
//! made while the same kind is already pending is coalesced into it, and one
//! made while the consumer is busy stays queued until it is received.

use tokio::sync::mpsc::{self, error::TrySendError};

/// Signal consumed by the process supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    StopRequested,
    RestartRequested,
}

/// Sending half: cloned into the admin endpoint and the console
#[derive(Debug, Clone)]
pub struct ControlChannel {
    stop: mpsc::Sender<()>,
    restart: mpsc::Sender<()>,
}

/// Receiving half, owned by the supervisor
#[derive(Debug)]
pub struct ControlSignals {
    stop: mpsc::Receiver<()>,
    restart: mpsc::Receiver<()>,
}

/// Create a connected control channel pair
pub fn control_channel() -> (ControlChannel, ControlSignals) {
    let (stop_tx, stop_rx) = mpsc::channel(1);
    let (restart_tx, restart_rx) = mpsc::channel(1);
    (
        ControlChannel {
            stop: stop_tx,
            restart: restart_tx,
        },
        ControlSignals {
            stop: stop_rx,
            restart: restart_rx,
        },
    )
}

impl ControlChannel {
    /// Request a graceful stop. Returns `false` if one was already pending.
    pub fn request_stop(&self) -> bool {
        enqueue(&self.stop, ControlSignal::StopRequested)
    }

    /// Request a graceful restart. Returns `false` if one was already pending.
    pub fn request_restart(&self) -> bool {
        enqueue(&self.restart, ControlSignal::RestartRequested)
    }
}

fn enqueue(slot: &mpsc::Sender<()>, signal: ControlSignal) -> bool {
    match slot.try_send(()) {
        Ok(()) => {
            tracing::info!("{:?} enqueued", signal);
            true
        }
        Err(TrySendError::Full(())) => {
            tracing::debug!("{:?} already pending, coalesced", signal);
            false
        }
        Err(TrySendError::Closed(())) => {
            tracing::warn!("{:?} dropped: control consumer is gone", signal);
            false
        }
    }
}

impl ControlSignals {
    /// Wait for the next signal
    ///
    /// Stop wins when both kinds are pending. Returns `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<ControlSignal> {
        tokio::select! {
            biased;
            Some(()) = self.stop.recv() => Some(ControlSignal::StopRequested),
            Some(()) = self.restart.recv() => Some(ControlSignal::RestartRequested),
            else => None,
        }
    }

    /// Take a pending signal without waiting
    pub fn try_recv(&mut self) -> Option<ControlSignal> {
        if self.stop.try_recv().is_ok() {
            return Some(ControlSignal::StopRequested);
        }
        if self.restart.try_recv().is_ok() {
            return Some(ControlSignal::RestartRequested);
        }
        None
    }
}
