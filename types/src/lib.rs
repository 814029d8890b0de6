//! Shared combat model and configuration types for relink-act
//!
//! This crate contains the serializable types that are shared between the
//! meter core (relink-act-core) and anything consuming its snapshots
//! (the CLI, overlays, dashboards).

use serde::{Deserialize, Serialize};

pub mod formatting;

// ─────────────────────────────────────────────────────────────────────────────
// Combat Model
// ─────────────────────────────────────────────────────────────────────────────

/// Identifies a combat participant.
///
/// `index` is the only field used for equality inside a combat: two events
/// carrying the same index refer to the same actor even if the other fields
/// differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRef {
    /// Category string (player, enemy, summon, ...)
    pub kind: String,
    /// Stable slot index, the per-combat identity key
    pub index: i32,
    /// 32-bit numeric identity
    pub global_id: u32,
    /// Party slot; negative values are sources without a party slot
    pub party_index: i32,
}

impl ActorRef {
    pub fn new(kind: impl Into<String>, index: i32, global_id: u32, party_index: i32) -> Self {
        Self {
            kind: kind.into(),
            index,
            global_id,
            party_index,
        }
    }

    /// Display form of `global_id`
    pub fn hex_id(&self) -> String {
        formatting::format_hex_id(self.global_id)
    }
}

/// One damage application, owned by the actor that dealt it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    pub timestamp_ms: i64,
    pub amount: u64,
    pub source: ActorRef,
    pub target: ActorRef,
    /// Action id after reclassification (follow-up damage uses a sentinel)
    pub action_id: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Derived Snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Elapsed time of a combat, measured between its first and last observed event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatDuration {
    pub ms: i64,
    pub seconds: u64,
    pub minutes: u64,
    /// Zero-padded `MM:SS`
    #[serde(rename = "MMSS")]
    pub mmss: String,
}

/// Per-actor statistics inside a [`CombatData`] snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorStats {
    #[serde(rename = "ref")]
    pub actor: ActorRef,
    pub hex_id: String,
    pub damage: u64,
    pub dps: u64,
    /// Share of the party total in percent (0 when the party total is 0)
    pub share_percent: f64,
    /// Damage inside the trailing 60 second window
    pub trailing_damage: u64,
    pub trailing_dps: u64,
    pub actions: Vec<ActionRecord>,
}

/// Presentation-ready statistics for one combat.
///
/// This is what snapshot subscribers receive on every publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatData {
    pub title: String,
    pub duration: CombatDuration,
    pub party_damage: u64,
    pub party_dps: u64,
    /// Sum of every actor's trailing DPS
    pub party_trailing_dps: u64,
    pub actors: Vec<ActorStats>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 24399;
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 3000;
pub const DEFAULT_MAX_COMBATS: usize = 10;

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_update_interval_ms() -> u64 {
    DEFAULT_UPDATE_INTERVAL_MS
}

fn default_reconnect_delay_ms() -> u64 {
    DEFAULT_RECONNECT_DELAY_MS
}

fn default_max_combats() -> usize {
    DEFAULT_MAX_COMBATS
}

/// Meter configuration. Every field is optional in a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterConfig {
    /// Host of the instrumentation WebSocket endpoint
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Minimum time between two published snapshots
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
    /// Delay before reconnecting after the connection closes
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// Maximum number of combats retained in history
    #[serde(default = "default_max_combats")]
    pub max_combats: usize,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            update_interval_ms: default_update_interval_ms(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            max_combats: default_max_combats(),
        }
    }
}

impl MeterConfig {
    /// WebSocket URL of the instrumentation endpoint
    pub fn endpoint_url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MeterConfig::default();
        assert_eq!(config.port, 24399);
        assert_eq!(config.update_interval_ms, 1000);
        assert_eq!(config.reconnect_delay_ms, 3000);
        assert_eq!(config.max_combats, 10);
        assert_eq!(config.endpoint_url(), "ws://localhost:24399");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: MeterConfig = toml::from_str("port = 30000\nmax_combats = 3\n").unwrap();
        assert_eq!(config.port, 30000);
        assert_eq!(config.max_combats, 3);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.update_interval_ms, 1000);
        assert_eq!(config.reconnect_delay_ms, 3000);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: MeterConfig = toml::from_str("").unwrap();
        assert_eq!(config, MeterConfig::default());
    }

    #[test]
    fn test_snapshot_field_names() {
        let actor = ActorRef::new("player", 1, 5, 0);
        let data = CombatData {
            title: "#1".to_string(),
            duration: CombatDuration {
                ms: 1500,
                seconds: 1,
                minutes: 0,
                mmss: "00:01".to_string(),
            },
            party_damage: 100,
            party_dps: 100,
            party_trailing_dps: 100,
            actors: vec![ActorStats {
                hex_id: actor.hex_id(),
                actor: actor.clone(),
                damage: 100,
                dps: 100,
                share_percent: 100.0,
                trailing_damage: 100,
                trailing_dps: 100,
                actions: vec![ActionRecord {
                    timestamp_ms: 1000,
                    amount: 100,
                    source: actor.clone(),
                    target: ActorRef::new("enemy", 99, 1, -1),
                    action_id: 7,
                }],
            }],
        };

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["duration"]["MMSS"], "00:01");
        assert_eq!(json["partyTrailingDps"], 100);
        assert_eq!(json["actors"][0]["ref"]["partyIndex"], 0);
        assert_eq!(json["actors"][0]["hexId"], "50000000");
        assert_eq!(json["actors"][0]["sharePercent"], 100.0);
        assert_eq!(json["actors"][0]["actions"][0]["actionId"], 7);
        assert_eq!(json["actors"][0]["actions"][0]["target"]["globalId"], 1);
    }
}
