//! Plain-text rendering for terminal output

use std::fmt::Write;

use relink_act_core::Ledger;
use relink_act_core::wire::LoadParty;
use relink_act_types::CombatData;
use relink_act_types::formatting::{format_compact, format_pct};

/// Render a snapshot as a header line plus one row per actor.
pub fn combat_table(data: &CombatData) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} [{}]  party {}  dps {}  1m dps {}",
        data.title,
        data.duration.mmss,
        format_compact(data.party_damage),
        format_compact(data.party_dps),
        format_compact(data.party_trailing_dps),
    );
    let _ = writeln!(
        out,
        "{:>4} {:<8} {:<9} {:>9} {:>8} {:>7} {:>8}",
        "slot", "kind", "id", "damage", "dps", "share", "1m dps"
    );
    let _ = writeln!(out, "{}", "-".repeat(59));

    for actor in &data.actors {
        let _ = writeln!(
            out,
            "{:>4} {:<8} {:<9} {:>9} {:>8} {:>7} {:>8}",
            actor.actor.party_index,
            actor.actor.kind,
            actor.hex_id,
            format_compact(actor.damage),
            format_compact(actor.dps),
            format_pct(actor.share_percent),
            format_compact(actor.trailing_dps),
        );
    }
    out
}

/// One line per occupied roster slot
pub fn party_roster(party: &LoadParty) -> String {
    let mut out = String::new();
    for member in &party.members {
        let status = if member.is_online != 0 { "online" } else { "offline" };
        let _ = writeln!(
            out,
            "{:>4} {:<20} {:<20} {:<8} weapon {}",
            member.common_info.party_index,
            member.character_name,
            member.display_name,
            status,
            member.weapon.weapon_id,
        );
    }
    out
}

/// One mock snapshot as printed by the `mock` command.
///
/// Returns `None` when the snapshot cannot be serialized.
pub fn snapshot_line(data: &CombatData, json: bool) -> Option<String> {
    if !json {
        return Some(combat_table(data));
    }
    match serde_json::to_string(data) {
        Ok(line) => Some(line),
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize mock snapshot");
            None
        }
    }
}

/// Replay totals followed by one line per retained combat, oldest first.
pub fn replay_summary(ledger: &Ledger, accepted: usize, dropped: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "replayed {accepted} payloads ({dropped} dropped), {} combats started, {} retained",
        ledger.epoch_count(),
        ledger.len()
    );
    for epoch in ledger.epochs() {
        let _ = writeln!(
            out,
            "  combat {:>3}  {:>6} ms  {:>9} damage  {} actors",
            epoch.number(),
            epoch.duration_ms(),
            epoch.party_total_damage(),
            epoch.actors().len()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use relink_act_core::CombatMeter;

    use super::*;

    #[test]
    fn test_combat_table_rows() {
        let mut meter = CombatMeter::default();
        meter
            .handle_payload(r#"{"type":"damage","time_ms":0,"data":{"action_id":1,"damage":1500,"flags":0,"source":["Pl0400",0,305419896,0],"target":["Em2000",9,1,-1]}}"#)
            .unwrap();
        meter
            .handle_payload(r#"{"type":"damage","time_ms":2000,"data":{"action_id":1,"damage":500,"flags":0,"source":["Pl0700",1,255,1],"target":["Em2000",9,1,-1]}}"#)
            .unwrap();

        let table = combat_table(&meter.current_combat().unwrap());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "#1 [00:02]  party 2.00K  dps 1.00K  1m dps 1.00K");
        assert!(lines[3].contains("12345678"));
        assert!(lines[3].contains("1.50K"));
        assert!(lines[3].contains("75.0%"));
        assert!(lines[4].contains("ff000000"));
        assert!(lines[4].contains("25.0%"));
    }

    #[test]
    fn test_combat_table_without_actors() {
        let mut rng = StdRng::seed_from_u64(1);
        let data = relink_act_core::mock::fake_combat_data(&mut rng);
        let table = combat_table(&data);
        assert_eq!(table.lines().count(), 3);
        assert!(table.starts_with("Mock Combat ["));
    }

    #[test]
    fn test_snapshot_line_modes() {
        let data = relink_act_core::mock::fake_combat_data(&mut StdRng::seed_from_u64(3));

        let json = snapshot_line(&data, true).unwrap();
        let parsed: CombatData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, data);
        assert!(!json.contains('\n'));

        assert_eq!(snapshot_line(&data, false).unwrap(), combat_table(&data));
    }

    #[test]
    fn test_replay_summary_lists_retained_combats() {
        let config = relink_act_types::MeterConfig {
            max_combats: 3,
            ..Default::default()
        };
        let mut meter = CombatMeter::new(&config);
        for time_ms in [0, 1000, 2000] {
            meter
                .handle_payload(&format!(r#"{{"type":"enter_area","time_ms":{time_ms}}}"#))
                .unwrap();
        }
        meter
            .handle_payload(r#"{"type":"damage","time_ms":3000,"data":{"action_id":1,"damage":100,"flags":0,"source":["Pl0400",0,1,0],"target":["Em2000",9,1,-1]}}"#)
            .unwrap();

        let summary = replay_summary(meter.ledger(), 4, 1);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "replayed 4 payloads (1 dropped), 3 combats started, 2 retained");
        assert!(lines[1].starts_with("  combat   2"));
        assert!(lines[1].ends_with("0 actors"));
        assert!(lines[2].starts_with("  combat   3"));
        assert!(lines[2].contains(" 100 damage"));
        assert!(lines[2].ends_with("1 actors"));
    }
}
