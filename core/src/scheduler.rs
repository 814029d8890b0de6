//! Snapshot publication pacing
//!
//! The scheduler decides, per tick, whether a fresh [`CombatData`] snapshot
//! should go out. It also ref-counts snapshot subscribers so the caller knows
//! when to start and stop its tick source.

use relink_act_types::{CombatData, DEFAULT_UPDATE_INTERVAL_MS};

use crate::ledger::Ledger;
use crate::metrics::derive_combat_data;

/// Slack added to the last damage time before a snapshot counts as stale
pub const STALENESS_GRACE_MS: i64 = 1000;

/// Change in tick subscription caused by a subscriber count change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickTransition {
    Started,
    Stopped,
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct PublishScheduler {
    interval_ms: i64,
    last_tick_ms: Option<i64>,
    last_published_ms: i64,
    subscribers: usize,
}

impl Default for PublishScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_INTERVAL_MS)
    }
}

impl PublishScheduler {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: i64::try_from(interval_ms).unwrap_or(i64::MAX),
            last_tick_ms: None,
            last_published_ms: 0,
            subscribers: 0,
        }
    }

    pub fn add_subscriber(&mut self) -> TickTransition {
        self.subscribers += 1;
        if self.subscribers == 1 {
            self.last_tick_ms = None;
            TickTransition::Started
        } else {
            TickTransition::Unchanged
        }
    }

    /// Saturates at zero, so a double unsubscribe stops ticking only once.
    pub fn remove_subscriber(&mut self) -> TickTransition {
        match self.subscribers {
            0 => TickTransition::Unchanged,
            1 => {
                self.subscribers = 0;
                TickTransition::Stopped
            }
            _ => {
                self.subscribers -= 1;
                TickTransition::Unchanged
            }
        }
    }

    pub fn subscribers(&self) -> usize {
        self.subscribers
    }

    pub fn is_ticking(&self) -> bool {
        self.subscribers > 0
    }

    pub fn last_published_ms(&self) -> i64 {
        self.last_published_ms
    }

    /// Run one tick at `now_ms`.
    ///
    /// Returns the snapshot to deliver, if any. At most one snapshot is
    /// produced per call.
    pub fn on_tick(&mut self, now_ms: i64, connected: bool, ledger: &Ledger) -> Option<CombatData> {
        if !connected || self.subscribers == 0 {
            return None;
        }
        if let Some(last_tick) = self.last_tick_ms
            && now_ms.saturating_sub(last_tick) <= self.interval_ms
        {
            return None;
        }
        self.last_tick_ms = Some(now_ms);

        let last_damage_ms = ledger.last_damage_timestamp_ms();
        if last_damage_ms.saturating_add(STALENESS_GRACE_MS) <= self.last_published_ms {
            tracing::trace!(last_damage_ms, last_published_ms = self.last_published_ms, "snapshot stale");
            return None;
        }

        let snapshot = ledger.active_epoch().map(derive_combat_data);
        self.last_published_ms = last_damage_ms;
        snapshot
    }
}
