//! Derived combat statistics
//!
//! Everything here is computed from one [`CombatEpoch`] at call time and never
//! writes back to the ledger.

use relink_act_types::formatting::format_mmss;
use relink_act_types::{ActorStats, CombatData, CombatDuration};

use crate::ledger::{Actor, CombatEpoch};

/// Length of the trailing window, anchored at the combat's last event
pub const TRAILING_WINDOW_MS: i64 = 60_000;
const TRAILING_WINDOW_SECS: u64 = 60;

/// Build the snapshot published to subscribers.
pub fn derive_combat_data(epoch: &CombatEpoch) -> CombatData {
    let duration = combat_duration(epoch);
    let seconds = duration.seconds;
    let party_damage = epoch.party_total_damage();
    let last_timestamp_ms = epoch.last_timestamp_ms();

    let actors: Vec<ActorStats> = epoch
        .actors()
        .iter()
        .map(|actor| actor_stats(actor, party_damage, seconds, last_timestamp_ms))
        .collect();

    // Sum of the individually rounded values, not a rounded party window
    let party_trailing_dps = actors
        .iter()
        .fold(0u64, |total, a| total.saturating_add(a.trailing_dps));

    CombatData {
        title: epoch.title().to_string(),
        duration,
        party_damage,
        party_dps: per_second(party_damage, seconds),
        party_trailing_dps,
        actors,
    }
}

pub fn combat_duration(epoch: &CombatEpoch) -> CombatDuration {
    let ms = epoch.duration_ms().max(0);
    let seconds = (ms / 1000) as u64;
    CombatDuration {
        ms,
        seconds,
        minutes: seconds / 60,
        mmss: format_mmss(seconds),
    }
}

/// Damage an actor dealt within the trailing window ending at `last_timestamp_ms`.
pub fn trailing_damage(actor: &Actor, last_timestamp_ms: i64) -> u64 {
    actor
        .actions()
        .iter()
        .filter(|action| action.timestamp_ms.saturating_add(TRAILING_WINDOW_MS) >= last_timestamp_ms)
        .fold(0u64, |total, action| total.saturating_add(action.amount))
}

/// Share of `total` in `party_total`, in percent. 0 when nothing was dealt.
pub fn share_percent(total: u64, party_total: u64) -> f64 {
    if party_total == 0 {
        return 0.0;
    }
    total as f64 / party_total as f64 * 100.0
}

/// Whole-combat rate. A combat shorter than one second reports the raw total.
pub fn per_second(total: u64, seconds: u64) -> u64 {
    if seconds == 0 {
        total
    } else {
        rounded_div(total, seconds)
    }
}

/// Trailing-window rate, dividing by the window length or the combat length
/// when the combat is shorter than the window.
pub fn trailing_per_second(trailing: u64, seconds: u64) -> u64 {
    let divisor = if seconds == 0 {
        1
    } else {
        seconds.min(TRAILING_WINDOW_SECS)
    };
    rounded_div(trailing, divisor)
}

fn actor_stats(actor: &Actor, party_damage: u64, seconds: u64, last_timestamp_ms: i64) -> ActorStats {
    let damage = actor.total_damage();
    let trailing = trailing_damage(actor, last_timestamp_ms);
    ActorStats {
        actor: actor.actor_ref().clone(),
        hex_id: actor.actor_ref().hex_id(),
        damage,
        dps: per_second(damage, seconds),
        share_percent: share_percent(damage, party_damage),
        trailing_damage: trailing,
        trailing_dps: trailing_per_second(trailing, seconds),
        actions: actor.actions().to_vec(),
    }
}

#[inline]
fn rounded_div(value: u64, divisor: u64) -> u64 {
    (value as f64 / divisor as f64).round() as u64
}
