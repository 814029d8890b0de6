use relink_act_types::ActorRef;
use serde::Serialize;

/// Bit in `Damage::flags` marking follow-up (chain) damage
pub const FOLLOW_UP_FLAG: u64 = 1 << 15;

/// Normalized inbound event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    Damage(Damage),
    EnterArea(EnterArea),
    LoadParty(LoadParty),
}

impl Event {
    pub fn timestamp_ms(&self) -> i64 {
        match self {
            Event::Damage(damage) => damage.timestamp_ms,
            Event::EnterArea(enter) => enter.timestamp_ms,
            Event::LoadParty(party) => party.timestamp_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Damage {
    pub timestamp_ms: i64,
    /// Action id as sent on the wire (before follow-up reclassification)
    pub action_id: i64,
    pub amount: u64,
    pub flags: u64,
    pub source: ActorRef,
    pub target: ActorRef,
}

impl Damage {
    pub fn is_follow_up(&self) -> bool {
        self.flags & FOLLOW_UP_FLAG != 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterArea {
    pub timestamp_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadParty {
    pub timestamp_ms: i64,
    /// Occupied party slots, in wire order
    pub members: Vec<PartyMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMember {
    pub weapon: Weapon,
    pub sigils: Vec<Sigil>,
    pub is_online: i64,
    pub character_name: String,
    pub display_name: String,
    pub common_info: ActorRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    pub weapon_id: i64,
    pub skill1: i64,
    pub skill1_level: i64,
    pub skill2: i64,
    pub skill2_level: i64,
    pub skill3: i64,
    pub skill3_level: i64,
    pub bless_item: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sigil {
    pub first_trait_id: i64,
    pub first_trait_level: i64,
    pub second_trait_id: i64,
    pub second_trait_level: i64,
    pub sigil_id: i64,
    pub sigil_level: i64,
}
