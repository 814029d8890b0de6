use relink_act_types::{CombatData, MeterConfig};

use crate::dispatch::{Dispatcher, Handler, HandlerError, Message, MessageKind, MessagePayload};
use crate::ledger::Ledger;
use crate::metrics::derive_combat_data;
use crate::scheduler::{PublishScheduler, TickTransition};
use crate::wire::{Event, NormalizeError, decode_payload};

/// Ledger, dispatcher and scheduler wired together.
///
/// Owned by a single task. Payloads and ticks may arrive in any order.
#[derive(Debug)]
pub struct CombatMeter {
    ledger: Ledger,
    dispatcher: Dispatcher,
    scheduler: PublishScheduler,
}

impl Default for CombatMeter {
    fn default() -> Self {
        Self::new(&MeterConfig::default())
    }
}

impl CombatMeter {
    pub fn new(config: &MeterConfig) -> Self {
        Self {
            ledger: Ledger::new(config.max_combats),
            dispatcher: Dispatcher::new(),
            scheduler: PublishScheduler::new(config.update_interval_ms),
        }
    }

    /// Decode one text payload and ingest it.
    pub fn handle_payload(&mut self, text: &str) -> Result<(), NormalizeError> {
        let event = decode_payload(text)?;
        self.ingest(event);
        Ok(())
    }

    /// Update the ledger, then forward the event to raw-kind handlers.
    pub fn ingest(&mut self, event: Event) {
        tracing::trace!(timestamp_ms = event.timestamp_ms(), "ingesting event");
        self.ledger.apply(&event);
        self.dispatcher.publish(&Message::from(event));
    }

    pub fn subscribe(&mut self, kind: MessageKind, handler: Handler) -> TickTransition {
        self.dispatcher.subscribe(kind, handler);
        if kind == MessageKind::CombatData {
            self.scheduler.add_subscriber()
        } else {
            TickTransition::Unchanged
        }
    }

    /// Register a typed handler. Returns it for a later [`CombatMeter::unsubscribe`].
    pub fn on<T, F>(&mut self, f: F) -> (Handler, TickTransition)
    where
        T: MessagePayload + 'static,
        F: Fn(&T) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let handler = Dispatcher::on(f);
        let transition = self.subscribe(T::KIND, Handler::clone(&handler));
        (handler, transition)
    }

    /// Returns `None` when the handler was not registered under `kind`.
    pub fn unsubscribe(&mut self, kind: MessageKind, handler: &Handler) -> Option<TickTransition> {
        if !self.dispatcher.unsubscribe(kind, handler) {
            return None;
        }
        if kind == MessageKind::CombatData {
            Some(self.scheduler.remove_subscriber())
        } else {
            Some(TickTransition::Unchanged)
        }
    }

    /// Run one scheduler tick. Returns whether a snapshot was published.
    pub fn tick(&mut self, now_ms: i64, connected: bool) -> bool {
        match self.scheduler.on_tick(now_ms, connected, &self.ledger) {
            Some(snapshot) => {
                self.dispatcher.publish(&Message::CombatData(snapshot));
                true
            }
            None => false,
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_ticking()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Metrics for the active combat, ignoring publish throttling.
    pub fn current_combat(&self) -> Option<CombatData> {
        self.ledger.active_epoch().map(derive_combat_data)
    }
}
