//! Payloads exactly as the instrumentation source sends them.
//!
//! Field names follow the wire spelling; [`normalize`](super::normalize)
//! maps them onto the internal model.

use serde::Deserialize;

/// Actor info tuple: `[kind, index, global_id, party_index]`
pub type RawActorInfo = (String, i32, u32, i32);

#[derive(Debug, Clone, Deserialize)]
pub struct RawDamageData {
    pub action_id: i64,
    pub damage: u64,
    pub flags: u64,
    pub source: RawActorInfo,
    pub target: RawActorInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWeapon {
    pub weapon_id: i64,
    pub skill1: i64,
    pub skill1_lv: i64,
    pub skill2: i64,
    pub skill2_lv: i64,
    pub skill3: i64,
    pub skill3_lv: i64,
    pub bless_item: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSigil {
    pub first_trait_id: i64,
    pub first_trait_level: i64,
    pub second_trait_id: i64,
    pub second_trait_level: i64,
    pub sigil_id: i64,
    pub sigil_level: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPartyMember {
    pub weapon: RawWeapon,
    pub sigils: Vec<RawSigil>,
    pub is_online: i64,
    pub c_name: String,
    pub d_name: String,
    pub common_info: RawActorInfo,
}

/// One inbound payload, discriminated by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawEvent {
    Damage {
        time_ms: i64,
        data: RawDamageData,
    },
    EnterArea {
        time_ms: i64,
    },
    LoadParty {
        time_ms: i64,
        /// Empty party slots arrive as `null`
        data: Vec<Option<RawPartyMember>>,
    },
    #[serde(other)]
    Unknown,
}

/// Just the discriminant, read back when a payload hits [`RawEvent::Unknown`]
#[derive(Debug, Deserialize)]
pub(super) struct RawDiscriminant {
    #[serde(rename = "type")]
    pub kind: String,
}
