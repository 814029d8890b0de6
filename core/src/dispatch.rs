//! Typed publish/subscribe registry
//!
//! Handlers are registered per [`MessageKind`] and invoked synchronously in
//! registration order. A failing handler is logged and never stops the rest
//! of the batch.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use relink_act_types::CombatData;

use crate::wire::{Damage, EnterArea, Event, LoadParty};

/// Error returned by a consumer handler
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Shared handler. Identity (for unsubscribe) is the `Arc` allocation.
///
/// Handlers report failure by returning `Err`; only those are isolated from
/// the rest of a publish. A handler must not panic: it runs inside the meter
/// task, and release builds abort on panic.
pub type Handler = Arc<dyn Fn(&Message) -> Result<(), HandlerError> + Send + Sync>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Message) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Damage,
    EnterArea,
    LoadParty,
    CombatData,
}

impl MessageKind {
    pub const ALL: [MessageKind; 4] = [
        MessageKind::Damage,
        MessageKind::EnterArea,
        MessageKind::LoadParty,
        MessageKind::CombatData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Damage => "damage",
            MessageKind::EnterArea => "enter_area",
            MessageKind::LoadParty => "load_party",
            MessageKind::CombatData => "combat_data",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything delivered through the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Damage(Damage),
    EnterArea(EnterArea),
    LoadParty(LoadParty),
    CombatData(CombatData),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Damage(_) => MessageKind::Damage,
            Message::EnterArea(_) => MessageKind::EnterArea,
            Message::LoadParty(_) => MessageKind::LoadParty,
            Message::CombatData(_) => MessageKind::CombatData,
        }
    }
}

impl From<Event> for Message {
    fn from(event: Event) -> Self {
        match event {
            Event::Damage(damage) => Message::Damage(damage),
            Event::EnterArea(enter) => Message::EnterArea(enter),
            Event::LoadParty(party) => Message::LoadParty(party),
        }
    }
}

impl From<CombatData> for Message {
    fn from(data: CombatData) -> Self {
        Message::CombatData(data)
    }
}

/// Payload types that can be subscribed to directly with [`Dispatcher::on`].
pub trait MessagePayload: Sized {
    const KIND: MessageKind;

    fn from_message(message: &Message) -> Option<&Self>;
}

macro_rules! message_payload {
    ($ty:ty, $variant:ident) => {
        impl MessagePayload for $ty {
            const KIND: MessageKind = MessageKind::$variant;

            fn from_message(message: &Message) -> Option<&Self> {
                match message {
                    Message::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

message_payload!(Damage, Damage);
message_payload!(EnterArea, EnterArea);
message_payload!(LoadParty, LoadParty);
message_payload!(CombatData, CombatData);

#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<MessageKind, Vec<Handler>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in MessageKind::ALL {
            map.entry(&kind, &self.handler_count(kind));
        }
        map.finish()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a handler that only sees payloads of type `T`.
    ///
    /// Returns the handler so it can be registered under `T::KIND` and later
    /// passed back to [`Dispatcher::unsubscribe`].
    pub fn on<T, F>(f: F) -> Handler
    where
        T: MessagePayload + 'static,
        F: Fn(&T) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        handler(move |message| match T::from_message(message) {
            Some(payload) => f(payload),
            None => Ok(()),
        })
    }

    pub fn subscribe(&mut self, kind: MessageKind, handler: Handler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Remove the first registration of `handler` under `kind`.
    ///
    /// Returns `false` when it was not registered.
    pub fn unsubscribe(&mut self, kind: MessageKind, handler: &Handler) -> bool {
        let Some(list) = self.handlers.get_mut(&kind) else {
            return false;
        };
        let Some(pos) = list.iter().position(|h| same_handler(h, handler)) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.handlers.remove(&kind);
        }
        true
    }

    /// Deliver `message` to every handler of its kind. Returns the number of
    /// handlers that failed.
    pub fn publish(&self, message: &Message) -> usize {
        let kind = message.kind();
        let Some(list) = self.handlers.get(&kind) else {
            return 0;
        };

        let mut failures = 0;
        for (position, handler) in list.iter().enumerate() {
            if let Err(e) = handler(message) {
                failures += 1;
                tracing::warn!(%kind, position, error = %e, "handler failed");
            }
        }
        failures
    }

    pub fn handler_count(&self, kind: MessageKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}

fn same_handler(a: &Handler, b: &Handler) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
