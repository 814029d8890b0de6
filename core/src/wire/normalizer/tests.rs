use super::*;

const DAMAGE_PAYLOAD: &str = r#"{
    "type": "damage",
    "time_ms": 1000,
    "data": {
        "action_id": 7,
        "damage": 100,
        "flags": 0,
        "source": ["Pl1000", 1, 5, 0],
        "target": ["Em2000", 99, 1, -1]
    }
}"#;

fn party_payload() -> String {
    r#"{
        "type": "load_party",
        "time_ms": 500,
        "data": [
            {
                "weapon": {
                    "weapon_id": 11, "skill1": 1, "skill1_lv": 15, "skill2": 2,
                    "skill2_lv": 10, "skill3": 3, "skill3_lv": 5, "bless_item": 9
                },
                "sigils": [{
                    "first_trait_id": 100, "first_trait_level": 15,
                    "second_trait_id": 200, "second_trait_level": 15,
                    "sigil_id": 300, "sigil_level": 15
                }],
                "is_online": 1,
                "c_name": "Gran",
                "d_name": "Captain",
                "common_info": ["Pl0100", 0, 48879, 0]
            },
            null,
            null,
            null
        ]
    }"#
    .to_string()
}

// decode_payload
#[test]
fn test_decode_damage() {
    let event = decode_payload(DAMAGE_PAYLOAD).unwrap();
    let Event::Damage(damage) = event else {
        panic!("expected damage event, got {:?}", event);
    };

    assert_eq!(damage.timestamp_ms, 1000);
    assert_eq!(damage.action_id, 7);
    assert_eq!(damage.amount, 100);
    assert_eq!(damage.flags, 0);
    assert_eq!(damage.source, ActorRef::new("Pl1000", 1, 5, 0));
    assert_eq!(damage.target, ActorRef::new("Em2000", 99, 1, -1));
    assert!(!damage.is_follow_up());
}

#[test]
fn test_decode_follow_up_flag() {
    let payload = DAMAGE_PAYLOAD.replace("\"flags\": 0", "\"flags\": 32768");
    let Event::Damage(damage) = decode_payload(&payload).unwrap() else {
        panic!("expected damage event");
    };
    assert!(damage.is_follow_up());
    // Reclassification belongs to the ledger; the normalizer keeps the wire id
    assert_eq!(damage.action_id, 7);
}

#[test]
fn test_decode_enter_area() {
    let event = decode_payload(r#"{"type": "enter_area", "time_ms": 42}"#).unwrap();
    assert_eq!(event, Event::EnterArea(EnterArea { timestamp_ms: 42 }));
    assert_eq!(event.timestamp_ms(), 42);
}

#[test]
fn test_decode_load_party_renames_and_drops_empty_slots() {
    let Event::LoadParty(party) = decode_payload(&party_payload()).unwrap() else {
        panic!("expected load party event");
    };

    assert_eq!(party.timestamp_ms, 500);
    assert_eq!(party.members.len(), 1);

    let member = &party.members[0];
    assert_eq!(member.character_name, "Gran");
    assert_eq!(member.display_name, "Captain");
    assert_eq!(member.is_online, 1);
    assert_eq!(member.common_info, ActorRef::new("Pl0100", 0, 48879, 0));
    assert_eq!(member.weapon.weapon_id, 11);
    assert_eq!(member.weapon.skill1_level, 15);
    assert_eq!(member.weapon.skill3_level, 5);
    assert_eq!(member.weapon.bless_item, 9);
    assert_eq!(member.sigils.len(), 1);
    assert_eq!(member.sigils[0].second_trait_id, 200);
    assert_eq!(member.sigils[0].sigil_level, 15);
}

#[test]
fn test_decode_unknown_kind() {
    let err = decode_payload(r#"{"type": "leave_area", "time_ms": 1}"#).unwrap_err();
    match err {
        NormalizeError::UnrecognizedEventKind { kind } => assert_eq!(kind, "leave_area"),
        other => panic!("expected UnrecognizedEventKind, got {:?}", other),
    }
}

#[test]
fn test_decode_malformed_json() {
    let err = decode_payload("{not json").unwrap_err();
    assert!(matches!(err, NormalizeError::Decode(_)));
}

#[test]
fn test_decode_missing_discriminant() {
    let err = decode_payload(r#"{"time_ms": 1}"#).unwrap_err();
    assert!(matches!(err, NormalizeError::Decode(_)));
}

#[test]
fn test_decode_damage_with_wrong_shape() {
    // Actor info must be a 4-tuple
    let payload = DAMAGE_PAYLOAD.replace(r#"["Pl1000", 1, 5, 0]"#, r#"["Pl1000", 1]"#);
    let err = decode_payload(&payload).unwrap_err();
    assert!(matches!(err, NormalizeError::Decode(_)));
}

// normalize
#[test]
fn test_normalize_rejects_unknown_variant() {
    let err = normalize(RawEvent::Unknown).unwrap_err();
    assert!(matches!(err, NormalizeError::UnrecognizedEventKind { .. }));
}
