use relink_act_types::ActorRef;

use super::raw::{RawActorInfo, RawDiscriminant, RawEvent, RawPartyMember, RawSigil, RawWeapon};
use super::{Damage, EnterArea, Event, LoadParty, NormalizeError, PartyMember, Sigil, Weapon};

#[cfg(test)]
mod tests;

/// Decode one text payload and normalize it.
///
/// Malformed JSON (or a payload without a `type`) is a [`NormalizeError::Decode`];
/// a well-formed payload with an unknown `type` is
/// [`NormalizeError::UnrecognizedEventKind`].
pub fn decode_payload(text: &str) -> Result<Event, NormalizeError> {
    match serde_json::from_str::<RawEvent>(text)? {
        RawEvent::Unknown => {
            let RawDiscriminant { kind } = serde_json::from_str(text)?;
            Err(NormalizeError::UnrecognizedEventKind { kind })
        }
        raw => normalize(raw),
    }
}

/// Map a raw wire event onto the internal model.
pub fn normalize(raw: RawEvent) -> Result<Event, NormalizeError> {
    match raw {
        RawEvent::Damage { time_ms, data } => Ok(Event::Damage(Damage {
            timestamp_ms: time_ms,
            action_id: data.action_id,
            amount: data.damage,
            flags: data.flags,
            source: actor_ref(data.source),
            target: actor_ref(data.target),
        })),
        RawEvent::EnterArea { time_ms } => Ok(Event::EnterArea(EnterArea {
            timestamp_ms: time_ms,
        })),
        RawEvent::LoadParty { time_ms, data } => Ok(Event::LoadParty(LoadParty {
            timestamp_ms: time_ms,
            members: data.into_iter().flatten().map(party_member).collect(),
        })),
        RawEvent::Unknown => Err(NormalizeError::UnrecognizedEventKind {
            kind: String::from("unknown"),
        }),
    }
}

fn actor_ref((kind, index, global_id, party_index): RawActorInfo) -> ActorRef {
    ActorRef {
        kind,
        index,
        global_id,
        party_index,
    }
}

fn party_member(raw: RawPartyMember) -> PartyMember {
    PartyMember {
        weapon: weapon(raw.weapon),
        sigils: raw.sigils.into_iter().map(sigil).collect(),
        is_online: raw.is_online,
        character_name: raw.c_name,
        display_name: raw.d_name,
        common_info: actor_ref(raw.common_info),
    }
}

fn weapon(raw: RawWeapon) -> Weapon {
    Weapon {
        weapon_id: raw.weapon_id,
        skill1: raw.skill1,
        skill1_level: raw.skill1_lv,
        skill2: raw.skill2,
        skill2_level: raw.skill2_lv,
        skill3: raw.skill3,
        skill3_level: raw.skill3_lv,
        bless_item: raw.bless_item,
    }
}

fn sigil(raw: RawSigil) -> Sigil {
    Sigil {
        first_trait_id: raw.first_trait_id,
        first_trait_level: raw.first_trait_level,
        second_trait_id: raw.second_trait_id,
        second_trait_level: raw.second_trait_level,
        sigil_id: raw.sigil_id,
        sigil_level: raw.sigil_level,
    }
}
