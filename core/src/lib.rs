pub mod context;
pub mod dispatch;
pub mod ledger;
pub mod meter;
pub mod metrics;
pub mod mock;
pub mod scheduler;
pub mod service;
pub mod wire;

// Re-exports for convenience
pub use context::{ConfigError, MeterConfigExt};
pub use dispatch::{Dispatcher, Handler, HandlerError, Message, MessageKind, MessagePayload, handler};
pub use ledger::{Actor, CombatEpoch, DamageOutcome, Ledger};
pub use meter::CombatMeter;
pub use metrics::derive_combat_data;
pub use mock::MockCombatData;
pub use scheduler::{PublishScheduler, TickTransition};
pub use service::{MeterHandle, MeterService, ServiceError};
pub use wire::{Event, NormalizeError, decode_payload};

pub use relink_act_types::{
    ActionRecord, ActorRef, ActorStats, CombatData, CombatDuration, MeterConfig,
};
