//! Combat session ledger
//!
//! Owns the bounded history of combats and applies the ingestion policy:
//! which damage events count, which combat they belong to and which actor
//! they are attributed to.

mod epoch;


pub use epoch::{Actor, CombatEpoch};

use std::collections::VecDeque;

use relink_act_types::{ActionRecord, DEFAULT_MAX_COMBATS};

use crate::wire::{Damage, Event};

/// Target global id of a known instrumentation artifact; damage against it is not tracked
pub const IGNORED_TARGET_ID: u32 = 0x22a350f;
/// Party index of damage attributed to a combat-chain effect rather than an actor
pub const UNATTRIBUTED_PARTY_INDEX: i32 = -1;
/// Action id recorded for follow-up (chain) damage
pub const FOLLOW_UP_ACTION_ID: i64 = -3;

/// What the ledger did with a damage event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Recorded { new_actor: bool },
    /// Dropped: target is the ignored instrumentation artifact
    IgnoredTarget,
    /// Dropped: source has no trackable actor
    Unattributed,
}

/// Smallest usable capacity; a just-created combat must survive its own eviction pass
pub const MIN_CAPACITY: usize = 2;

/// Bounded, oldest-first history of combats.
///
/// Eviction runs after each new combat and drops the oldest while the history
/// has reached `capacity`, so at most `capacity - 1` combats are retained.
#[derive(Debug, Clone)]
pub struct Ledger {
    epochs: VecDeque<CombatEpoch>,
    capacity: usize,
    epoch_count: u64,
    last_damage_timestamp_ms: i64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMBATS)
    }
}

impl Ledger {
    /// Create a ledger bounded by `capacity` (raised to [`MIN_CAPACITY`]).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            epochs: VecDeque::with_capacity(capacity),
            capacity,
            epoch_count: 0,
            last_damage_timestamp_ms: 0,
        }
    }

    /// Route a normalized event to the matching ingestion operation.
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::Damage(damage) => {
                self.on_damage(damage);
            }
            Event::EnterArea(enter) => {
                self.on_area_transition(enter.timestamp_ms);
            }
            Event::LoadParty(_) => {}
        }
    }

    /// Start a new combat. Returns its sequence number.
    ///
    /// The previous combat is closed whether or not it recorded any damage.
    pub fn on_area_transition(&mut self, timestamp_ms: i64) -> u64 {
        self.push_new_epoch(timestamp_ms)
    }

    /// Apply one damage event.
    ///
    /// Filtered events are dropped without touching any state.
    pub fn on_damage(&mut self, damage: &Damage) -> DamageOutcome {
        if damage.target.global_id == IGNORED_TARGET_ID {
            return DamageOutcome::IgnoredTarget;
        }
        if damage.source.party_index == UNATTRIBUTED_PARTY_INDEX {
            return DamageOutcome::Unattributed;
        }

        let action_id = if damage.is_follow_up() {
            FOLLOW_UP_ACTION_ID
        } else {
            damage.action_id
        };
        let action = ActionRecord {
            timestamp_ms: damage.timestamp_ms,
            amount: damage.amount,
            source: damage.source.clone(),
            target: damage.target.clone(),
            action_id,
        };

        let epoch = self.obtain_epoch(damage.timestamp_ms);
        let new_actor = epoch.record(action);
        if new_actor {
            tracing::debug!(
                combat = epoch.title(),
                index = damage.source.index,
                party_index = damage.source.party_index,
                "actor joined combat"
            );
        }

        self.last_damage_timestamp_ms = damage.timestamp_ms;
        DamageOutcome::Recorded { new_actor }
    }

    /// The newest combat that has recorded damage.
    ///
    /// Combats opened by an area transition stay inactive until their first hit.
    pub fn active_epoch(&self) -> Option<&CombatEpoch> {
        self.epochs
            .iter()
            .rev()
            .find(|epoch| epoch.party_total_damage() > 0)
    }

    /// The newest combat, with or without damage
    pub fn latest_epoch(&self) -> Option<&CombatEpoch> {
        self.epochs.back()
    }

    /// Retained combats, oldest first
    pub fn epochs(&self) -> impl Iterator<Item = &CombatEpoch> {
        self.epochs.iter()
    }

    pub fn epoch_by_title(&self, title: &str) -> Option<&CombatEpoch> {
        self.epochs.iter().find(|epoch| epoch.title() == title)
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of combats started since the ledger was created
    pub fn epoch_count(&self) -> u64 {
        self.epoch_count
    }

    /// Timestamp of the most recently accepted damage event (0 before any)
    pub fn last_damage_timestamp_ms(&self) -> i64 {
        self.last_damage_timestamp_ms
    }

    /// Drop all combats. The sequence counter keeps counting.
    pub fn clear(&mut self) {
        self.epochs.clear();
        self.last_damage_timestamp_ms = 0;
    }

    // --- Epoch Management ---

    fn obtain_epoch(&mut self, timestamp_ms: i64) -> &mut CombatEpoch {
        if self.epochs.is_empty() {
            self.push_new_epoch(timestamp_ms);
        }
        let newest = self.epochs.len() - 1;
        &mut self.epochs[newest]
    }

    fn push_new_epoch(&mut self, start_timestamp_ms: i64) -> u64 {
        self.epoch_count += 1;
        let number = self.epoch_count;
        self.epochs
            .push_back(CombatEpoch::new(number, start_timestamp_ms));
        self.trim_old_epochs();
        tracing::debug!(number, start_timestamp_ms, "combat started");
        number
    }

    fn trim_old_epochs(&mut self) {
        while self.epochs.len() >= self.capacity {
            if let Some(evicted) = self.epochs.pop_front() {
                tracing::debug!(combat = evicted.title(), "combat evicted from history");
            }
        }
    }
}
