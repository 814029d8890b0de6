use tokio::sync::{mpsc, oneshot};

use relink_act_types::CombatData;

use super::{MeterCommand, ServiceError};
use crate::dispatch::{Dispatcher, Handler, HandlerError, MessageKind, MessagePayload};

// ─────────────────────────────────────────────────────────────────────────────
// Meter Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to communicate with a running [`MeterService`](super::MeterService)
#[derive(Debug, Clone)]
pub struct MeterHandle {
    pub(super) cmd_tx: mpsc::Sender<MeterCommand>,
}

impl MeterHandle {
    /// Register a handler. Snapshot handlers start the publish ticks.
    pub async fn subscribe(&self, kind: MessageKind, handler: Handler) -> Result<(), ServiceError> {
        self.send(MeterCommand::Subscribe { kind, handler }).await
    }

    /// Register a typed handler and return it for a later unsubscribe.
    pub async fn on<T, F>(&self, f: F) -> Result<Handler, ServiceError>
    where
        T: MessagePayload + 'static,
        F: Fn(&T) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let handler = Dispatcher::on(f);
        self.subscribe(T::KIND, Handler::clone(&handler)).await?;
        Ok(handler)
    }

    /// Returns whether the handler was registered.
    pub async fn unsubscribe(&self, kind: MessageKind, handler: &Handler) -> Result<bool, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(MeterCommand::Unsubscribe {
            kind,
            handler: Handler::clone(handler),
            reply,
        })
        .await?;
        rx.await.map_err(|_| ServiceError::Stopped)
    }

    /// Metrics for the active combat, computed now
    pub async fn current_combat(&self) -> Result<Option<CombatData>, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(MeterCommand::CurrentCombat(reply)).await?;
        rx.await.map_err(|_| ServiceError::Stopped)
    }

    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        self.send(MeterCommand::Shutdown).await
    }

    pub fn is_running(&self) -> bool {
        !self.cmd_tx.is_closed()
    }

    async fn send(&self, cmd: MeterCommand) -> Result<(), ServiceError> {
        self.cmd_tx.send(cmd).await.map_err(|_| ServiceError::Stopped)
    }
}
